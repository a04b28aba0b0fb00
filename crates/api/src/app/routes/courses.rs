use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use campus_core::{CourseId, DomainResult};
use campus_students::CoursePatch;

use crate::app::extract::Payload;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    let collection = get(list_courses).post(create_course);
    let item = get(get_course)
        .put(replace_course)
        .patch(update_course)
        .delete(delete_course);

    Router::new()
        .route("/courses", collection.clone())
        .route("/courses/", collection)
        .route("/courses/:id", item.clone())
        .route("/courses/:id/", item)
}

pub async fn list_courses(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::ListQuery>, QueryRejection>,
) -> axum::response::Response {
    let query = match query {
        Ok(Query(q)) => q,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_filter", e.body_text()),
    };
    let filter = match query.course_filter() {
        Ok(f) => f,
        Err(res) => return res,
    };

    match services.courses.list(&filter).await {
        Ok(courses) => {
            let items = courses.into_iter().map(dto::course_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_course(
    Extension(services): Extension<Arc<AppServices>>,
    Payload(body): Payload<dto::CourseRequest>,
) -> axum::response::Response {
    let new_course = match body.new_course() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.courses.create(new_course).await {
        Ok(course) => {
            tracing::info!(course_id = %course.id, "course created");
            (StatusCode::CREATED, Json(dto::course_to_json(course))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CourseId = match dto::parse_path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.courses.get(id).await {
        Ok(Some(course)) => (StatusCode::OK, Json(dto::course_to_json(course))).into_response(),
        Ok(None) => errors::not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Payload<dto::CourseRequest>, axum::response::Response>,
) -> axum::response::Response {
    apply_patch(&services, &id, body, dto::CourseRequest::patch).await
}

pub async fn replace_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Payload<dto::CourseRequest>, axum::response::Response>,
) -> axum::response::Response {
    apply_patch(&services, &id, body, dto::CourseRequest::replacement).await
}

async fn apply_patch(
    services: &AppServices,
    raw_id: &str,
    body: Result<Payload<dto::CourseRequest>, axum::response::Response>,
    to_patch: fn(&dto::CourseRequest) -> DomainResult<CoursePatch>,
) -> axum::response::Response {
    // Unknown ids win over unreadable or invalid bodies.
    let id: CourseId = match dto::parse_path_id(raw_id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.courses.get(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return errors::not_found(),
        Err(e) => return errors::store_error_to_response(e),
    }
    let patch = match body {
        Ok(Payload(body)) => to_patch(&body),
        Err(rejection) => return rejection,
    };
    let patch = match patch {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.courses.update(id, patch).await {
        Ok(Some(course)) => {
            tracing::info!(course_id = %course.id, "course updated");
            (StatusCode::OK, Json(dto::course_to_json(course))).into_response()
        }
        Ok(None) => errors::not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CourseId = match dto::parse_path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.courses.delete(id).await {
        Ok(true) => {
            tracing::info!(course_id = %id, "course deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => errors::not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}
