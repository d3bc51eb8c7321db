use serde::{Deserialize, Serialize};

use shared_models::accounts::Role;
use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    pub phone: String,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub phone: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserQuery {
    pub role: Option<Role>,
    pub active: Option<bool>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UserError {
    #[error("User profile not found")]
    ProfileNotFound,

    #[error("{0} may not be blank")]
    Blank(&'static str),

    #[error("role cannot be changed once a user is created")]
    RoleChange,
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::ProfileNotFound => AppError::NotFound(err.to_string()),
            UserError::Blank(_) | UserError::RoleChange => AppError::ValidationError(err.to_string()),
        }
    }
}
