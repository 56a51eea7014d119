use axum::Router;

pub mod system;
pub mod users;

/// Router for all enveloped (error-mapped) endpoints.
pub fn router() -> Router {
    Router::new().nest("/user", users::router())
}
