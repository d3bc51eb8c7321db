use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Dispatcher,
    Driver,
    Paramedic,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Dispatcher => "dispatcher",
            Role::Driver => "driver",
            Role::Paramedic => "paramedic",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Role::Admin),
            "dispatcher" => Ok(Role::Dispatcher),
            "driver" => Ok(Role::Driver),
            "paramedic" => Ok(Role::Paramedic),
            other => Err(format!("\"{}\" is not a valid role", other)),
        }
    }
}

/// Staff member known to the dispatch system. Credentials live with the
/// identity provider, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub phone: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Admin, Role::Dispatcher, Role::Driver, Role::Paramedic] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("nurse".parse::<Role>().is_err());
    }

    #[test]
    fn full_name_trims_missing_parts() {
        let user = User {
            id: 1,
            username: "jdoe".to_string(),
            email: None,
            first_name: "Jane".to_string(),
            last_name: String::new(),
            role: Role::Driver,
            phone: "555-0100".to_string(),
            active: true,
            created_at: Utc::now(),
        };

        assert_eq!(user.full_name(), "Jane");
    }
}
