use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbulanceStatus {
    Available,
    Assigned,
    EnRoute,
    AtScene,
    Transporting,
    AtHospital,
    Maintenance,
}

impl AmbulanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmbulanceStatus::Available => "available",
            AmbulanceStatus::Assigned => "assigned",
            AmbulanceStatus::EnRoute => "en_route",
            AmbulanceStatus::AtScene => "at_scene",
            AmbulanceStatus::Transporting => "transporting",
            AmbulanceStatus::AtHospital => "at_hospital",
            AmbulanceStatus::Maintenance => "maintenance",
        }
    }
}

impl Default for AmbulanceStatus {
    fn default() -> Self {
        AmbulanceStatus::Available
    }
}

impl fmt::Display for AmbulanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmbulanceStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "available" => Ok(AmbulanceStatus::Available),
            "assigned" => Ok(AmbulanceStatus::Assigned),
            "en_route" => Ok(AmbulanceStatus::EnRoute),
            "at_scene" => Ok(AmbulanceStatus::AtScene),
            "transporting" => Ok(AmbulanceStatus::Transporting),
            "at_hospital" => Ok(AmbulanceStatus::AtHospital),
            "maintenance" => Ok(AmbulanceStatus::Maintenance),
            other => Err(format!("\"{}\" is not a valid ambulance status", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ambulance {
    pub id: i64,
    pub vehicle_number: String,
    pub license_number: String,
    pub model: String,
    pub year: i32,
    pub status: AmbulanceStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub assigned_driver: Option<i64>,
    pub assigned_paramedic: Option<i64>,
    pub last_maintenance: NaiveDate,
    pub next_maintenance: NaiveDate,
    pub insurance_expiry: NaiveDate,
    pub equipment: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ambulance {
    pub fn is_available(&self) -> bool {
        self.status == AmbulanceStatus::Available
    }

    pub fn is_maintenance_due(&self, today: NaiveDate) -> bool {
        self.next_maintenance <= today
    }
}
