use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::{JsonRejection, QueryRejection}, FromRequest, FromRequestParts, Query, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;

use shared_database::AppState;
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Rejects requests without a valid bearer token and attaches the caller's
/// `Identity` to the request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    let token = auth_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))?;

    let identity = validate_token(token, &state.config.jwt_secret)
        .map_err(AppError::Auth)?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// `Json` that reports malformed or incomplete bodies as `{error}` 400s.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection_to_error(rejection)),
        }
    }
}

/// `Query` that reports unparsable filters as `{error}` 400s.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(QueryParams(value)),
            Err(rejection) => Err(query_rejection_to_error(rejection)),
        }
    }
}

fn json_rejection_to_error(rejection: JsonRejection) -> AppError {
    AppError::ValidationError(rejection.body_text())
}

fn query_rejection_to_error(rejection: QueryRejection) -> AppError {
    AppError::ValidationError(rejection.body_text())
}
