use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use campus_core::{DomainResult, StudentId};
use campus_students::StudentPatch;

use crate::app::extract::Payload;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    let collection = get(list_students).post(create_student);
    let item = get(get_student)
        .put(replace_student)
        .patch(update_student)
        .delete(delete_student);

    Router::new()
        .route("/students", collection.clone())
        .route("/students/", collection)
        .route("/students/:id", item.clone())
        .route("/students/:id/", item)
}

pub async fn list_students(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::ListQuery>, QueryRejection>,
) -> axum::response::Response {
    let query = match query {
        Ok(Query(q)) => q,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_filter", e.body_text()),
    };
    let filter = match query.student_filter() {
        Ok(f) => f,
        Err(res) => return res,
    };

    match services.students.list(&filter).await {
        Ok(students) => {
            let items = students.into_iter().map(dto::student_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_student(
    Extension(services): Extension<Arc<AppServices>>,
    Payload(body): Payload<dto::StudentRequest>,
) -> axum::response::Response {
    let new_student = match body.new_student() {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.students.create(new_student).await {
        Ok(student) => {
            tracing::info!(student_id = %student.id, "student created");
            (StatusCode::CREATED, Json(dto::student_to_json(student))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_student(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: StudentId = match dto::parse_path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.students.get(id).await {
        Ok(Some(student)) => (StatusCode::OK, Json(dto::student_to_json(student))).into_response(),
        Ok(None) => errors::not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_student(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Payload<dto::StudentRequest>, axum::response::Response>,
) -> axum::response::Response {
    apply_patch(&services, &id, body, dto::StudentRequest::patch).await
}

pub async fn replace_student(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Payload<dto::StudentRequest>, axum::response::Response>,
) -> axum::response::Response {
    apply_patch(&services, &id, body, dto::StudentRequest::replacement).await
}

async fn apply_patch(
    services: &AppServices,
    raw_id: &str,
    body: Result<Payload<dto::StudentRequest>, axum::response::Response>,
    to_patch: fn(&dto::StudentRequest) -> DomainResult<StudentPatch>,
) -> axum::response::Response {
    // Unknown ids win over unreadable or invalid bodies.
    let id: StudentId = match dto::parse_path_id(raw_id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.students.get(id).await {
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

    match services.students.update(id, patch).await {
        Ok(Some(student)) => {
            tracing::info!(student_id = %student.id, "student updated");
            (StatusCode::OK, Json(dto::student_to_json(student))).into_response()
        }
        Ok(None) => errors::not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_student(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: StudentId = match dto::parse_path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.students.delete(id).await {
        Ok(true) => {
            tracing::info!(student_id = %id, "student deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => errors::not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}
