use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use shared_database::AppState;
use shared_models::error::AppError;
use shared_models::pagination::Page;
use shared_utils::extractor::{JsonBody, QueryParams};

use crate::models::{
    AmbulanceDetail, AmbulanceQuery, CreateAmbulanceRequest, LocationUpdate, UpdateAmbulanceRequest,
};
use crate::services::AmbulanceService;

#[axum::debug_handler]
pub async fn list_ambulances(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<AmbulanceQuery>,
) -> Result<Json<Page<AmbulanceDetail>>, AppError> {
    let service = AmbulanceService::new(&state);

    let ambulances = service.list_ambulances(query).await?;

    Ok(Json(ambulances))
}

#[axum::debug_handler]
pub async fn available_ambulances(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AmbulanceDetail>>, AppError> {
    let service = AmbulanceService::new(&state);

    let ambulances = service.available_ambulances().await?;

    Ok(Json(ambulances))
}

#[axum::debug_handler]
pub async fn create_ambulance(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CreateAmbulanceRequest>,
) -> Result<(StatusCode, Json<AmbulanceDetail>), AppError> {
    let service = AmbulanceService::new(&state);

    let ambulance = service.create_ambulance(request).await?;

    Ok((StatusCode::CREATED, Json(ambulance)))
}

#[axum::debug_handler]
pub async fn get_ambulance(
    State(state): State<Arc<AppState>>,
    Path(ambulance_id): Path<i64>,
) -> Result<Json<AmbulanceDetail>, AppError> {
    let service = AmbulanceService::new(&state);

    let ambulance = service.get_ambulance(ambulance_id).await?;

    Ok(Json(ambulance))
}

#[axum::debug_handler]
pub async fn update_ambulance(
    State(state): State<Arc<AppState>>,
    Path(ambulance_id): Path<i64>,
    JsonBody(request): JsonBody<UpdateAmbulanceRequest>,
) -> Result<Json<AmbulanceDetail>, AppError> {
    let service = AmbulanceService::new(&state);

    let ambulance = service.update_ambulance(ambulance_id, request).await?;

    Ok(Json(ambulance))
}

#[axum::debug_handler]
pub async fn update_location(
    State(state): State<Arc<AppState>>,
    Path(ambulance_id): Path<i64>,
    JsonBody(location): JsonBody<LocationUpdate>,
) -> Result<Json<AmbulanceDetail>, AppError> {
    let service = AmbulanceService::new(&state);

    let ambulance = service.update_location(ambulance_id, location).await?;

    Ok(Json(ambulance))
}

#[axum::debug_handler]
pub async fn delete_ambulance(
    State(state): State<Arc<AppState>>,
    Path(ambulance_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = AmbulanceService::new(&state);

    service.delete_ambulance(ambulance_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
