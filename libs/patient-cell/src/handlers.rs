use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use shared_database::AppState;
use shared_models::error::AppError;
use shared_models::pagination::Page;
use shared_models::patients::Patient;
use shared_utils::extractor::{JsonBody, QueryParams};

use crate::models::{CreatePatientRequest, PatientQuery, UpdatePatientRequest};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<PatientQuery>,
) -> Result<Json<Page<Patient>>, AppError> {
    let service = PatientService::new(&state);

    let patients = service.list_patients(query).await?;

    Ok(Json(patients))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Patient>), AppError> {
    let service = PatientService::new(&state);

    let patient = service.create_patient(request).await?;

    Ok((StatusCode::CREATED, Json(patient)))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Patient>, AppError> {
    let service = PatientService::new(&state);

    let patient = service.get_patient(patient_id).await?;

    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<i64>,
    JsonBody(request): JsonBody<UpdatePatientRequest>,
) -> Result<Json<Patient>, AppError> {
    let service = PatientService::new(&state);

    let patient = service.update_patient(patient_id, request).await?;

    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = PatientService::new(&state);

    service.delete_patient(patient_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
