use serde::{Deserialize, Serialize};

use shared_models::error::AppError;
use shared_models::patients::Gender;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    #[serde(default)]
    pub phone: String,
    pub medical_condition: String,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relation: String,
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    pub pickup_address: String,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
    pub destination_address: String,
    pub hospital_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub medical_condition: Option<String>,
    pub allergies: Option<Vec<String>>,
    pub medications: Option<Vec<String>>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub pickup_latitude: Option<f64>,
    pub pickup_longitude: Option<f64>,
    pub pickup_address: Option<String>,
    pub destination_latitude: Option<f64>,
    pub destination_longitude: Option<f64>,
    pub destination_address: Option<String>,
    pub hospital_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientQuery {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PatientError {
    #[error("{0} may not be blank")]
    Blank(&'static str),

    #[error("age must not be negative")]
    NegativeAge,
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
