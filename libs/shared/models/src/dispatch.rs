use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallPriority {
    Critical,
    High,
    Medium,
    Low,
}

/// Call status as stored. Statuses outside the known set are kept verbatim
/// in `Other` so lenient status updates round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallStatus {
    Pending,
    Assigned,
    EnRoute,
    AtScene,
    Transporting,
    Completed,
    Cancelled,
    Other(String),
}

impl CallStatus {
    pub const KNOWN: [CallStatus; 7] = [
        CallStatus::Pending,
        CallStatus::Assigned,
        CallStatus::EnRoute,
        CallStatus::AtScene,
        CallStatus::Transporting,
        CallStatus::Completed,
        CallStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            CallStatus::Pending => "pending",
            CallStatus::Assigned => "assigned",
            CallStatus::EnRoute => "en_route",
            CallStatus::AtScene => "at_scene",
            CallStatus::Transporting => "transporting",
            CallStatus::Completed => "completed",
            CallStatus::Cancelled => "cancelled",
            CallStatus::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, CallStatus::Other(_))
    }
}

impl Default for CallStatus {
    fn default() -> Self {
        CallStatus::Pending
    }
}

impl From<&str> for CallStatus {
    fn from(value: &str) -> Self {
        match value {
            "pending" => CallStatus::Pending,
            "assigned" => CallStatus::Assigned,
            "en_route" => CallStatus::EnRoute,
            "at_scene" => CallStatus::AtScene,
            "transporting" => CallStatus::Transporting,
            "completed" => CallStatus::Completed,
            "cancelled" => CallStatus::Cancelled,
            other => CallStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for CallStatus {
    fn from(value: String) -> Self {
        CallStatus::from(value.as_str())
    }
}

impl From<CallStatus> for String {
    fn from(status: CallStatus) -> Self {
        match status {
            CallStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestSource {
    PhoneCall,
    System,
    MobileApp,
    WebPortal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequesterType {
    Individual,
    Hospital,
    Clinic,
    NursingHome,
    EmergencyServices,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyCall {
    pub id: i64,
    pub caller_name: String,
    pub caller_phone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub priority: CallPriority,
    pub status: CallStatus,
    pub description: String,
    pub assigned_ambulance: Option<i64>,
    pub dispatcher: Option<i64>,
    pub patient: Option<i64>,
    pub request_source: RequestSource,
    pub requester_type: RequesterType,
    pub requester_details: Value,
    pub created_at: DateTime<Utc>,
    /// Minutes between intake and arrival, recorded by the dispatcher.
    pub response_time: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Active,
    Completed,
}

impl Default for TripStatus {
    fn default() -> Self {
        TripStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: i64,
    pub call: i64,
    pub ambulance: i64,
    pub patient: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Kilometres, as reported by the crew.
    pub distance: f64,
    pub cost: f64,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_call_status_is_kept_verbatim() {
        let status: CallStatus = serde_json::from_value(json!("on_hold")).unwrap();
        assert_eq!(status, CallStatus::Other("on_hold".to_string()));
        assert!(!status.is_known());
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("on_hold"));
    }

    #[test]
    fn known_call_status_uses_snake_case() {
        let status: CallStatus = serde_json::from_value(json!("en_route")).unwrap();
        assert_eq!(status, CallStatus::EnRoute);
        assert_eq!(serde_json::to_value(CallStatus::AtScene).unwrap(), json!("at_scene"));
        assert!(CallStatus::KNOWN.iter().all(CallStatus::is_known));
    }
}
