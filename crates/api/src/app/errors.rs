//! Error envelope: the single point converting typed domain failures into
//! wire-level `StandardError` bodies.
//!
//! Handlers return `Result<_, ApiError>`; the `ApiError` response carries
//! the underlying `DomainError` in its extensions, and the `error_envelope`
//! middleware wrapping every enveloped route pattern-matches the kind:
//! `NotFound` → 404, `Conflict` → 409, both with a `StandardError` body
//! built from the request path at handling time. Anything else escalates as
//! a bare 500 server fault.

use axum::Json;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;

use usersvc_core::DomainError;

/// Uniform error body returned to clients.
///
/// Built fresh per intercepted error — `timestamp` is the moment of
/// handling and `path` the exact triggering request path, never cached or
/// default values.
#[derive(Debug, Clone, Serialize)]
pub struct StandardError {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub path: String,
}

/// Carries a typed domain failure out of a handler so the envelope
/// middleware can shape the wire response.
#[derive(Debug)]
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The status alone, with the error stashed for the envelope layer;
        // the body is shaped there, where the request path is known.
        let mut res = status_for(&self.0).into_response();
        res.extensions_mut().insert(self.0);
        res
    }
}

fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Middleware wrapping every enveloped route.
pub async fn error_envelope(
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    let mut res = next.run(req).await;

    let Some(err) = res.extensions_mut().remove::<DomainError>() else {
        return res;
    };

    match err {
        DomainError::NotFound(msg) => standard_error(StatusCode::NOT_FOUND, msg, &path),
        DomainError::Conflict(msg) => standard_error(StatusCode::CONFLICT, msg, &path),
        other => {
            // Not part of the envelope contract: escalate as a generic
            // server fault, body-less.
            tracing::error!(error = %other, path = %path, "unhandled domain error");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn standard_error(status: StatusCode, message: String, path: &str) -> Response {
    let body = StandardError {
        timestamp: Utc::now(),
        status: status.as_u16(),
        error: message,
        path: path.to_string(),
    };
    (status, Json(body)).into_response()
}
