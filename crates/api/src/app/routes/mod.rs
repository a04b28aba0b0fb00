use axum::Router;

pub mod courses;
pub mod students;
pub mod system;

/// Router for the versioned resource endpoints (mounted under `/api/v1`).
///
/// Every path is served with and without its trailing slash.
pub fn router() -> Router {
    Router::new()
        .merge(courses::router())
        .merge(students::router())
}
