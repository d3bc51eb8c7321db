use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use shared_database::AppState;
use shared_models::auth::Identity;
use shared_models::error::AppError;
use shared_models::pagination::Page;
use shared_utils::extractor::{JsonBody, QueryParams};

use crate::models::{
    AmbulanceUtilization, CreateDriverInspectionRequest, CreateMaintenanceRequest,
    CreateParamedicInspectionRequest, DriverInspectionDetail, InspectionQuery, InspectionSummary,
    MaintenanceDetail, MaintenanceQuery, MaintenanceSummary, OverdueMaintenanceReport,
    ParamedicInspectionDetail, UpdateDriverInspectionRequest, UpdateMaintenanceRequest,
    UpdateParamedicInspectionRequest,
};
use crate::services::{InspectionService, MaintenanceService, ReportService};

// ==============================================================================
// DRIVER INSPECTION HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_driver_inspections(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    QueryParams(query): QueryParams<InspectionQuery>,
) -> Result<Json<Page<DriverInspectionDetail>>, AppError> {
    let service = InspectionService::new(&state);

    let inspections = service.list_driver_inspections(query, &identity).await?;

    Ok(Json(inspections))
}

#[axum::debug_handler]
pub async fn create_driver_inspection(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CreateDriverInspectionRequest>,
) -> Result<(StatusCode, Json<DriverInspectionDetail>), AppError> {
    let service = InspectionService::new(&state);

    let inspection = service.create_driver_inspection(request).await?;

    Ok((StatusCode::CREATED, Json(inspection)))
}

#[axum::debug_handler]
pub async fn get_driver_inspection(
    State(state): State<Arc<AppState>>,
    Path(inspection_id): Path<i64>,
) -> Result<Json<DriverInspectionDetail>, AppError> {
    let service = InspectionService::new(&state);

    let inspection = service.get_driver_inspection(inspection_id).await?;

    Ok(Json(inspection))
}

#[axum::debug_handler]
pub async fn update_driver_inspection(
    State(state): State<Arc<AppState>>,
    Path(inspection_id): Path<i64>,
    JsonBody(request): JsonBody<UpdateDriverInspectionRequest>,
) -> Result<Json<DriverInspectionDetail>, AppError> {
    let service = InspectionService::new(&state);

    let inspection = service.update_driver_inspection(inspection_id, request).await?;

    Ok(Json(inspection))
}

#[axum::debug_handler]
pub async fn delete_driver_inspection(
    State(state): State<Arc<AppState>>,
    Path(inspection_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = InspectionService::new(&state);

    service.delete_driver_inspection(inspection_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ==============================================================================
// PARAMEDIC INSPECTION HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_paramedic_inspections(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    QueryParams(query): QueryParams<InspectionQuery>,
) -> Result<Json<Page<ParamedicInspectionDetail>>, AppError> {
    let service = InspectionService::new(&state);

    let inspections = service.list_paramedic_inspections(query, &identity).await?;

    Ok(Json(inspections))
}

#[axum::debug_handler]
pub async fn create_paramedic_inspection(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CreateParamedicInspectionRequest>,
) -> Result<(StatusCode, Json<ParamedicInspectionDetail>), AppError> {
    let service = InspectionService::new(&state);

    let inspection = service.create_paramedic_inspection(request).await?;

    Ok((StatusCode::CREATED, Json(inspection)))
}

#[axum::debug_handler]
pub async fn get_paramedic_inspection(
    State(state): State<Arc<AppState>>,
    Path(inspection_id): Path<i64>,
) -> Result<Json<ParamedicInspectionDetail>, AppError> {
    let service = InspectionService::new(&state);

    let inspection = service.get_paramedic_inspection(inspection_id).await?;

    Ok(Json(inspection))
}

#[axum::debug_handler]
pub async fn update_paramedic_inspection(
    State(state): State<Arc<AppState>>,
    Path(inspection_id): Path<i64>,
    JsonBody(request): JsonBody<UpdateParamedicInspectionRequest>,
) -> Result<Json<ParamedicInspectionDetail>, AppError> {
    let service = InspectionService::new(&state);

    let inspection = service.update_paramedic_inspection(inspection_id, request).await?;

    Ok(Json(inspection))
}

#[axum::debug_handler]
pub async fn delete_paramedic_inspection(
    State(state): State<Arc<AppState>>,
    Path(inspection_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = InspectionService::new(&state);

    service.delete_paramedic_inspection(inspection_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ==============================================================================
// MAINTENANCE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_maintenance_records(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<MaintenanceQuery>,
) -> Result<Json<Page<MaintenanceDetail>>, AppError> {
    let service = MaintenanceService::new(&state);

    let records = service.list_records(query).await?;

    Ok(Json(records))
}

#[axum::debug_handler]
pub async fn create_maintenance_record(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CreateMaintenanceRequest>,
) -> Result<(StatusCode, Json<MaintenanceDetail>), AppError> {
    let service = MaintenanceService::new(&state);

    let record = service.create_record(request).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

#[axum::debug_handler]
pub async fn get_maintenance_record(
    State(state): State<Arc<AppState>>,
    Path(record_id): Path<i64>,
) -> Result<Json<MaintenanceDetail>, AppError> {
    let service = MaintenanceService::new(&state);

    let record = service.get_record(record_id).await?;

    Ok(Json(record))
}

#[axum::debug_handler]
pub async fn update_maintenance_record(
    State(state): State<Arc<AppState>>,
    Path(record_id): Path<i64>,
    JsonBody(request): JsonBody<UpdateMaintenanceRequest>,
) -> Result<Json<MaintenanceDetail>, AppError> {
    let service = MaintenanceService::new(&state);

    let record = service.update_record(record_id, request).await?;

    Ok(Json(record))
}

#[axum::debug_handler]
pub async fn delete_maintenance_record(
    State(state): State<Arc<AppState>>,
    Path(record_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = MaintenanceService::new(&state);

    service.delete_record(record_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ==============================================================================
// REPORT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn inspection_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<InspectionSummary>, AppError> {
    let service = ReportService::new(&state);

    Ok(Json(service.inspection_summary().await?))
}

#[axum::debug_handler]
pub async fn maintenance_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MaintenanceSummary>, AppError> {
    let service = ReportService::new(&state);

    Ok(Json(service.maintenance_summary().await?))
}

#[axum::debug_handler]
pub async fn ambulance_utilization(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AmbulanceUtilization>>, AppError> {
    let service = ReportService::new(&state);

    Ok(Json(service.ambulance_utilization().await?))
}

#[axum::debug_handler]
pub async fn overdue_maintenance(
    State(state): State<Arc<AppState>>,
) -> Result<Json<OverdueMaintenanceReport>, AppError> {
    let service = ReportService::new(&state);

    Ok(Json(service.overdue_maintenance().await?))
}
