use thiserror::Error;

use shared_models::accounts::Role;
use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{label} not found")]
    NotFound { label: &'static str, id: i64 },

    #[error("{label} with this {field} already exists")]
    UniqueViolation { label: &'static str, field: &'static str },

    #[error("Invalid {field} \"{id}\" - object does not exist")]
    MissingReference { field: &'static str, id: i64 },

    #[error("Invalid {field} \"{user_id}\" - user has role {actual}, expected {expected}")]
    RoleMismatch {
        field: &'static str,
        user_id: i64,
        expected: Role,
        actual: Role,
    },

    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
            StoreError::UniqueViolation { .. }
            | StoreError::MissingReference { .. }
            | StoreError::RoleMismatch { .. } => AppError::ValidationError(err.to_string()),
            StoreError::Io(_) | StoreError::Serialization(_) => AppError::Database(err.to_string()),
        }
    }
}
