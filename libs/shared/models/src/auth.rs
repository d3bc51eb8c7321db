use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accounts::Role;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: Option<String>,
}

/// Claims issued by the identity provider. `sub` carries the numeric id of
/// the matching row in the users table.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub role: Option<String>,
    pub username: Option<String>,
    pub iat: Option<u64>,
}

/// Authenticated caller, attached to every protected request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: Option<String>,
    pub role: Option<Role>,
    pub issued_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}
