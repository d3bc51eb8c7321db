use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The request is well-formed but the current record state forbids it.
    #[error("State conflict: {0}")]
    StateConflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            // Clients of the dispatch API treat an unavailable ambulance as a bad request.
            AppError::StateConflict(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Auth(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::ValidationError(msg)
            | AppError::StateConflict(msg)
            | AppError::Database(msg)
            | AppError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("Error: {}: {}", status, message);
        } else {
            tracing::warn!("Request rejected: {}: {}", status, message);
        }

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_share_the_bad_request_status() {
        assert_eq!(
            AppError::StateConflict("Ambulance is not available".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Auth("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Database("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
