use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    Morning,
    Afternoon,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Ready,
    NeedsAttention,
    OutOfService,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverInspection {
    pub id: i64,
    pub driver: i64,
    pub ambulance: i64,
    pub date: NaiveDate,
    pub shift: Shift,
    /// Checklist entries as submitted by the inspection form.
    pub vehicle_inspection: Vec<Value>,
    pub mileage: i32,
    pub fuel_level: i32,
    pub overall_status: InspectionStatus,
    pub additional_notes: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamedicInspection {
    pub id: i64,
    pub paramedic: i64,
    pub ambulance: i64,
    pub date: NaiveDate,
    pub shift: Shift,
    pub medical_equipment: Vec<Value>,
    pub overall_status: InspectionStatus,
    pub additional_notes: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    Routine,
    Repair,
    Inspection,
    Emergency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl Default for MaintenanceStatus {
    fn default() -> Self {
        MaintenanceStatus::Scheduled
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: i64,
    pub ambulance: i64,
    pub maintenance_type: MaintenanceType,
    pub status: MaintenanceStatus,
    pub scheduled_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub description: String,
    pub cost: Option<f64>,
    pub vendor: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceRecord {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == MaintenanceStatus::Scheduled && self.scheduled_date < today
    }
}
