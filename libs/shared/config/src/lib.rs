use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// How `UpdateCallStatus` treats status strings outside the call status set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusValidation {
    /// Any non-empty string is stored as-is.
    #[default]
    Lenient,
    /// Unknown statuses are rejected with a validation error.
    Strict,
}

impl FromStr for StatusValidation {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(StatusValidation::Lenient),
            "strict" => Ok(StatusValidation::Strict),
            other => Err(format!("unknown status validation mode: {}", other)),
        }
    }
}

impl fmt::Display for StatusValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusValidation::Lenient => write!(f, "lenient"),
            StatusValidation::Strict => write!(f, "strict"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub data_file: Option<PathBuf>,
    pub call_status_validation: StatusValidation,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            host: env::var("APP_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("APP_PORT")
                .ok()
                .and_then(|port| {
                    port.parse::<u16>().map_err(|_| {
                        warn!("APP_PORT is not a valid port number, using default");
                    }).ok()
                })
                .unwrap_or(3000),
            data_file: env::var("DATA_FILE")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            call_status_validation: env::var("CALL_STATUS_VALIDATION")
                .ok()
                .and_then(|mode| {
                    mode.parse::<StatusValidation>().map_err(|e| {
                        warn!("{}, using lenient", e);
                    }).ok()
                })
                .unwrap_or_default(),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        if config.data_file.is_none() {
            warn!("DATA_FILE not set, records will only be kept in memory");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_validation_parses_known_modes() {
        assert_eq!("strict".parse::<StatusValidation>(), Ok(StatusValidation::Strict));
        assert_eq!(" Lenient ".parse::<StatusValidation>(), Ok(StatusValidation::Lenient));
        assert!("sometimes".parse::<StatusValidation>().is_err());
    }

    #[test]
    fn unconfigured_without_secret() {
        let config = AppConfig {
            jwt_secret: String::new(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_file: None,
            call_status_validation: StatusValidation::default(),
        };

        assert!(!config.is_configured());
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.call_status_validation, StatusValidation::Lenient);
    }
}
