//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: the user service and store selection
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: the error envelope middleware and response shaping

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use usersvc_infra::UserStore;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router against the store selected by the
/// environment (public entrypoint used by `main.rs`).
pub async fn build_app() -> Router {
    build_app_with_store(services::build_store().await)
}

/// Build the full HTTP router against an explicit store.
///
/// Tests use this to run against a fresh in-memory store regardless of the
/// environment.
pub fn build_app_with_store(store: Arc<dyn UserStore>) -> Router {
    let service = Arc::new(services::UserService::new(store));

    // Enveloped routes: domain errors raised below are shaped into
    // StandardError bodies by the error_envelope layer.
    let api = routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(errors::error_envelope))
            .layer(Extension(service)),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(api)
}
