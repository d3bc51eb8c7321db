use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use fleet_cell::AmbulanceDetail;
use shared_database::Tables;
use shared_models::accounts::User;
use shared_models::dispatch::{
    CallPriority, CallStatus, EmergencyCall, RequestSource, RequesterType, Trip, TripStatus,
};
use shared_models::error::AppError;
use shared_models::patch::nullable;
use shared_models::patients::Patient;

fn empty_details() -> Value {
    json!({})
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCallRequest {
    pub caller_name: String,
    pub caller_phone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub priority: CallPriority,
    pub description: String,
    pub request_source: RequestSource,
    pub requester_type: RequesterType,
    #[serde(default = "empty_details")]
    pub requester_details: Value,
    pub patient: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCallRequest {
    pub caller_name: Option<String>,
    pub caller_phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub priority: Option<CallPriority>,
    pub status: Option<CallStatus>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_ambulance: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub dispatcher: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub patient: Option<Option<i64>>,
    pub request_source: Option<RequestSource>,
    pub requester_type: Option<RequesterType>,
    pub requester_details: Option<Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub response_time: Option<Option<i32>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallQuery {
    pub status: Option<CallStatus>,
    pub priority: Option<CallPriority>,
    pub assigned_ambulance: Option<i64>,
    pub dispatcher: Option<i64>,
    pub patient: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignAmbulanceRequest {
    pub ambulance_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTripRequest {
    pub call: i64,
    pub ambulance: i64,
    pub patient: i64,
    pub start_time: DateTime<Utc>,
    pub distance: f64,
    pub cost: f64,
}

/// `end_time` and `status` belong to trip completion and are not editable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTripRequest {
    pub call: Option<i64>,
    pub ambulance: Option<i64>,
    pub patient: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
    pub distance: Option<f64>,
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripQuery {
    pub status: Option<TripStatus>,
    pub ambulance: Option<i64>,
    pub patient: Option<i64>,
    pub call: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallDetail {
    #[serde(flatten)]
    pub call: EmergencyCall,
    pub assigned_ambulance_details: Option<AmbulanceDetail>,
    pub dispatcher_details: Option<User>,
    pub patient_details: Option<Patient>,
}

impl CallDetail {
    pub fn build(tables: &Tables, call: EmergencyCall) -> Self {
        let assigned_ambulance_details = call
            .assigned_ambulance
            .and_then(|id| tables.ambulances.get(id))
            .map(|ambulance| AmbulanceDetail::build(tables, ambulance.clone()));
        let dispatcher_details = call.dispatcher.and_then(|id| tables.users.get(id)).cloned();
        let patient_details = call.patient.and_then(|id| tables.patients.get(id)).cloned();

        Self {
            call,
            assigned_ambulance_details,
            dispatcher_details,
            patient_details,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TripDetail {
    #[serde(flatten)]
    pub trip: Trip,
    pub call_details: Option<CallDetail>,
    pub ambulance_details: Option<AmbulanceDetail>,
    pub patient_details: Option<Patient>,
}

impl TripDetail {
    pub fn build(tables: &Tables, trip: Trip) -> Self {
        let call_details = tables
            .emergency_calls
            .get(trip.call)
            .map(|call| CallDetail::build(tables, call.clone()));
        let ambulance_details = tables
            .ambulances
            .get(trip.ambulance)
            .map(|ambulance| AmbulanceDetail::build(tables, ambulance.clone()));
        let patient_details = tables.patients.get(trip.patient).cloned();

        Self {
            trip,
            call_details,
            ambulance_details,
            patient_details,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DispatchError {
    #[error("ambulance_id is required")]
    AmbulanceIdRequired,

    #[error("Ambulance is not available")]
    AmbulanceUnavailable,

    #[error("status is required")]
    StatusRequired,

    #[error("\"{0}\" is not a valid call status")]
    UnknownStatus(String),

    #[error("Trip is already completed")]
    TripAlreadyCompleted,

    #[error("{0} may not be blank")]
    Blank(&'static str),
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::AmbulanceUnavailable | DispatchError::TripAlreadyCompleted => {
                AppError::StateConflict(err.to_string())
            }
            DispatchError::AmbulanceIdRequired
            | DispatchError::StatusRequired
            | DispatchError::UnknownStatus(_)
            | DispatchError::Blank(_) => AppError::ValidationError(err.to_string()),
        }
    }
}
