use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use fleet_cell::AmbulanceDetail;
use shared_database::Tables;
use shared_models::accounts::User;
use shared_models::error::AppError;
use shared_models::fleet::AmbulanceStatus;
use shared_models::patch::nullable;
use shared_models::reports::{
    DriverInspection, InspectionStatus, MaintenanceRecord, MaintenanceStatus, MaintenanceType,
    ParamedicInspection, Shift,
};

// ==============================================================================
// INSPECTIONS
// ==============================================================================

/// Fields shared by driver and paramedic inspections, used for filtering
/// and for the inspection summary.
pub trait InspectionRow {
    fn staff(&self) -> i64;
    fn ambulance(&self) -> i64;
    fn date(&self) -> NaiveDate;
    fn overall_status(&self) -> InspectionStatus;
    fn submitted_at(&self) -> DateTime<Utc>;
}

impl InspectionRow for DriverInspection {
    fn staff(&self) -> i64 {
        self.driver
    }

    fn ambulance(&self) -> i64 {
        self.ambulance
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn overall_status(&self) -> InspectionStatus {
        self.overall_status
    }

    fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

impl InspectionRow for ParamedicInspection {
    fn staff(&self) -> i64 {
        self.paramedic
    }

    fn ambulance(&self) -> i64 {
        self.ambulance
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn overall_status(&self) -> InspectionStatus {
        self.overall_status
    }

    fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDriverInspectionRequest {
    pub driver: i64,
    pub ambulance: i64,
    pub date: NaiveDate,
    pub shift: Shift,
    #[serde(default)]
    pub vehicle_inspection: Vec<Value>,
    pub mileage: i32,
    pub fuel_level: i32,
    pub overall_status: InspectionStatus,
    #[serde(default)]
    pub additional_notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDriverInspectionRequest {
    pub driver: Option<i64>,
    pub ambulance: Option<i64>,
    pub date: Option<NaiveDate>,
    pub shift: Option<Shift>,
    pub vehicle_inspection: Option<Vec<Value>>,
    pub mileage: Option<i32>,
    pub fuel_level: Option<i32>,
    pub overall_status: Option<InspectionStatus>,
    pub additional_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateParamedicInspectionRequest {
    pub paramedic: i64,
    pub ambulance: i64,
    pub date: NaiveDate,
    pub shift: Shift,
    #[serde(default)]
    pub medical_equipment: Vec<Value>,
    pub overall_status: InspectionStatus,
    #[serde(default)]
    pub additional_notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateParamedicInspectionRequest {
    pub paramedic: Option<i64>,
    pub ambulance: Option<i64>,
    pub date: Option<NaiveDate>,
    pub shift: Option<Shift>,
    pub medical_equipment: Option<Vec<Value>>,
    pub overall_status: Option<InspectionStatus>,
    pub additional_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectionQuery {
    pub ambulance_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<InspectionStatus>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverInspectionDetail {
    #[serde(flatten)]
    pub inspection: DriverInspection,
    pub driver_details: Option<User>,
    pub ambulance_details: Option<AmbulanceDetail>,
}

impl DriverInspectionDetail {
    pub fn build(tables: &Tables, inspection: DriverInspection) -> Self {
        Self {
            driver_details: tables.users.get(inspection.driver).cloned(),
            ambulance_details: ambulance_details(tables, inspection.ambulance),
            inspection,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParamedicInspectionDetail {
    #[serde(flatten)]
    pub inspection: ParamedicInspection,
    pub paramedic_details: Option<User>,
    pub ambulance_details: Option<AmbulanceDetail>,
}

impl ParamedicInspectionDetail {
    pub fn build(tables: &Tables, inspection: ParamedicInspection) -> Self {
        Self {
            paramedic_details: tables.users.get(inspection.paramedic).cloned(),
            ambulance_details: ambulance_details(tables, inspection.ambulance),
            inspection,
        }
    }
}

// ==============================================================================
// MAINTENANCE
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMaintenanceRequest {
    pub ambulance: i64,
    pub maintenance_type: MaintenanceType,
    pub status: Option<MaintenanceStatus>,
    pub scheduled_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub description: String,
    pub cost: Option<f64>,
    #[serde(default)]
    pub vendor: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMaintenanceRequest {
    pub ambulance: Option<i64>,
    pub maintenance_type: Option<MaintenanceType>,
    pub status: Option<MaintenanceStatus>,
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    pub completed_date: Option<Option<NaiveDate>>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub cost: Option<Option<f64>>,
    pub vendor: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaintenanceQuery {
    pub ambulance_id: Option<i64>,
    pub maintenance_type: Option<MaintenanceType>,
    pub status: Option<MaintenanceStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceDetail {
    #[serde(flatten)]
    pub record: MaintenanceRecord,
    pub ambulance_details: Option<AmbulanceDetail>,
}

impl MaintenanceDetail {
    pub fn build(tables: &Tables, record: MaintenanceRecord) -> Self {
        Self {
            ambulance_details: ambulance_details(tables, record.ambulance),
            record,
        }
    }
}

fn ambulance_details(tables: &Tables, ambulance_id: i64) -> Option<AmbulanceDetail> {
    tables
        .ambulances
        .get(ambulance_id)
        .map(|ambulance| AmbulanceDetail::build(tables, ambulance.clone()))
}

// ==============================================================================
// REPORTS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub overall_status: InspectionStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionCounts {
    pub today: usize,
    pub week: usize,
    pub month: usize,
    pub status_breakdown: Vec<StatusCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionSummary {
    pub driver_inspections: InspectionCounts,
    pub paramedic_inspections: InspectionCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeCount {
    pub maintenance_type: MaintenanceType,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceSummary {
    pub pending_maintenance: usize,
    pub completed_this_month: usize,
    pub monthly_cost: f64,
    pub overdue_maintenance: usize,
    pub type_breakdown: Vec<TypeCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmbulanceUtilization {
    pub ambulance_id: i64,
    pub vehicle_number: String,
    pub model: String,
    pub status: AmbulanceStatus,
    pub trips_count: usize,
    pub total_distance: f64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueRecord {
    pub maintenance_id: i64,
    pub ambulance_id: i64,
    pub vehicle_number: String,
    pub maintenance_type: MaintenanceType,
    pub scheduled_date: NaiveDate,
    pub days_overdue: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmbulanceDue {
    pub ambulance_id: i64,
    pub vehicle_number: String,
    pub next_maintenance: NaiveDate,
    pub days_overdue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueMaintenanceReport {
    pub overdue_maintenance_records: Vec<OverdueRecord>,
    pub ambulances_due_for_maintenance: Vec<AmbulanceDue>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ReportsError {
    #[error("fuel_level must be between 0 and 100")]
    FuelLevelOutOfRange,

    #[error("mileage must not be negative")]
    NegativeMileage,

    #[error("cost must not be negative")]
    NegativeCost,
}

impl From<ReportsError> for AppError {
    fn from(err: ReportsError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
