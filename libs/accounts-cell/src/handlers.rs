use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use shared_database::AppState;
use shared_models::accounts::User;
use shared_models::auth::Identity;
use shared_models::error::AppError;
use shared_models::pagination::Page;
use shared_utils::extractor::{JsonBody, QueryParams};

use crate::models::{CreateUserRequest, UpdateUserRequest, UserQuery};
use crate::services::UserService;

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<UserQuery>,
) -> Result<Json<Page<User>>, AppError> {
    let service = UserService::new(&state);

    let users = service.list_users(query).await?;

    Ok(Json(users))
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let service = UserService::new(&state);

    let user = service.create_user(request).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, AppError> {
    let service = UserService::new(&state);

    let user = service.get_user(user_id).await?;

    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    JsonBody(request): JsonBody<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    let service = UserService::new(&state);

    let user = service.update_user(user_id, request).await?;

    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = UserService::new(&state);

    service.delete_user(user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<User>, AppError> {
    let service = UserService::new(&state);

    let user = service.get_profile(&identity).await?;

    Ok(Json(user))
}
