use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared_database::Tables;
use shared_models::error::AppError;
use shared_models::fleet::{Ambulance, AmbulanceStatus};
use shared_models::patch::nullable;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAmbulanceRequest {
    pub vehicle_number: String,
    pub license_number: String,
    pub model: String,
    pub year: i32,
    pub status: Option<AmbulanceStatus>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub assigned_driver: Option<i64>,
    pub assigned_paramedic: Option<i64>,
    pub last_maintenance: NaiveDate,
    pub next_maintenance: NaiveDate,
    pub insurance_expiry: NaiveDate,
    #[serde(default)]
    pub equipment: Vec<String>,
}

/// Partial update; nullable fields accept an explicit `null` to clear them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAmbulanceRequest {
    pub vehicle_number: Option<String>,
    pub license_number: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub status: Option<AmbulanceStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub longitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_driver: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_paramedic: Option<Option<i64>>,
    pub last_maintenance: Option<NaiveDate>,
    pub next_maintenance: Option<NaiveDate>,
    pub insurance_expiry: Option<NaiveDate>,
    pub equipment: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmbulanceQuery {
    pub status: Option<AmbulanceStatus>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Ambulance as returned by the API, with the assigned crew's names resolved.
#[derive(Debug, Clone, Serialize)]
pub struct AmbulanceDetail {
    #[serde(flatten)]
    pub ambulance: Ambulance,
    pub assigned_driver_name: Option<String>,
    pub assigned_paramedic_name: Option<String>,
}

impl AmbulanceDetail {
    pub fn build(tables: &Tables, ambulance: Ambulance) -> Self {
        let name_of = |id: Option<i64>| {
            id.and_then(|id| tables.users.get(id))
                .map(|user| user.full_name())
        };

        Self {
            assigned_driver_name: name_of(ambulance.assigned_driver),
            assigned_paramedic_name: name_of(ambulance.assigned_paramedic),
            ambulance,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum FleetError {
    #[error("{0} may not be blank")]
    Blank(&'static str),

    #[error("latitude must be between -90 and 90")]
    LatitudeOutOfRange,

    #[error("longitude must be between -180 and 180")]
    LongitudeOutOfRange,
}

impl From<FleetError> for AppError {
    fn from(err: FleetError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub(crate) fn check_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), FleetError> {
    if latitude.is_some_and(|lat| !(-90.0..=90.0).contains(&lat)) {
        return Err(FleetError::LatitudeOutOfRange);
    }
    if longitude.is_some_and(|lng| !(-180.0..=180.0).contains(&lng)) {
        return Err(FleetError::LongitudeOutOfRange);
    }
    Ok(())
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), FleetError> {
    if value.trim().is_empty() {
        return Err(FleetError::Blank(field));
    }
    Ok(())
}
