use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use usersvc_core::UserId;

use crate::app::dto::UserDto;
use crate::app::errors::ApiError;
use crate::app::services::UserService;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// `GET /user/{id}` → 200 with the mapped DTO.
pub async fn get_user(
    Extension(service): Extension<Arc<UserService>>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let user = service.find_by_id(UserId::new(id)).await?;
    Ok((StatusCode::OK, Json(UserDto::from(&user))).into_response())
}

/// `GET /user` → 200 with the element-wise mapped sequence (empty list,
/// never null).
pub async fn list_users(
    Extension(service): Extension<Arc<UserService>>,
) -> Result<Response, ApiError> {
    let users = service.find_all().await?;
    let items: Vec<UserDto> = users.iter().map(UserDto::from).collect();
    Ok((StatusCode::OK, Json(items)).into_response())
}

/// `POST /user` → 201, empty body, `Location: /user/{new_id}`.
pub async fn create_user(
    Extension(service): Extension<Arc<UserService>>,
    Json(body): Json<UserDto>,
) -> Result<Response, ApiError> {
    let user = service.create(body.into_draft()).await?;
    let location = format!("/user/{}", user.id());
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]).into_response())
}

/// `PUT /user/{id}` → 200 with the mapped updated DTO.
pub async fn update_user(
    Extension(service): Extension<Arc<UserService>>,
    Path(id): Path<i32>,
    Json(body): Json<UserDto>,
) -> Result<Response, ApiError> {
    let user = service.update(UserId::new(id), body.into_draft()).await?;
    Ok((StatusCode::OK, Json(UserDto::from(&user))).into_response())
}

/// `DELETE /user/{id}` → 204, empty body.
pub async fn delete_user(
    Extension(service): Extension<Arc<UserService>>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    service.delete(UserId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
