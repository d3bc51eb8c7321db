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
    AssignAmbulanceRequest, CallDetail, CallQuery, CreateCallRequest, CreateTripRequest, TripDetail,
    TripQuery, UpdateCallRequest, UpdateStatusRequest, UpdateTripRequest,
};
use crate::services::{CallService, DispatchWorkflow, TripService};

// ==============================================================================
// EMERGENCY CALL HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_calls(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<CallQuery>,
) -> Result<Json<Page<CallDetail>>, AppError> {
    let service = CallService::new(&state);

    let calls = service.list_calls(query).await?;

    Ok(Json(calls))
}

#[axum::debug_handler]
pub async fn create_call(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    JsonBody(request): JsonBody<CreateCallRequest>,
) -> Result<(StatusCode, Json<CallDetail>), AppError> {
    let service = CallService::new(&state);

    let call = service.create_call(request, &identity).await?;

    Ok((StatusCode::CREATED, Json(call)))
}

#[axum::debug_handler]
pub async fn pending_calls(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CallDetail>>, AppError> {
    let workflow = DispatchWorkflow::new(&state);

    let calls = workflow.pending_calls().await?;

    Ok(Json(calls))
}

#[axum::debug_handler]
pub async fn get_call(
    State(state): State<Arc<AppState>>,
    Path(call_id): Path<i64>,
) -> Result<Json<CallDetail>, AppError> {
    let service = CallService::new(&state);

    let call = service.get_call(call_id).await?;

    Ok(Json(call))
}

#[axum::debug_handler]
pub async fn update_call(
    State(state): State<Arc<AppState>>,
    Path(call_id): Path<i64>,
    JsonBody(request): JsonBody<UpdateCallRequest>,
) -> Result<Json<CallDetail>, AppError> {
    let service = CallService::new(&state);

    let call = service.update_call(call_id, request).await?;

    Ok(Json(call))
}

#[axum::debug_handler]
pub async fn delete_call(
    State(state): State<Arc<AppState>>,
    Path(call_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = CallService::new(&state);

    service.delete_call(call_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn assign_ambulance(
    State(state): State<Arc<AppState>>,
    Path(call_id): Path<i64>,
    JsonBody(request): JsonBody<AssignAmbulanceRequest>,
) -> Result<Json<CallDetail>, AppError> {
    let workflow = DispatchWorkflow::new(&state);

    let call = workflow.assign_ambulance(call_id, request).await?;

    Ok(Json(call))
}

#[axum::debug_handler]
pub async fn update_call_status(
    State(state): State<Arc<AppState>>,
    Path(call_id): Path<i64>,
    JsonBody(request): JsonBody<UpdateStatusRequest>,
) -> Result<Json<CallDetail>, AppError> {
    let workflow = DispatchWorkflow::new(&state);

    let call = workflow.update_call_status(call_id, request).await?;

    Ok(Json(call))
}

// ==============================================================================
// TRIP HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_trips(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<TripQuery>,
) -> Result<Json<Page<TripDetail>>, AppError> {
    let service = TripService::new(&state);

    let trips = service.list_trips(query).await?;

    Ok(Json(trips))
}

#[axum::debug_handler]
pub async fn create_trip(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CreateTripRequest>,
) -> Result<(StatusCode, Json<TripDetail>), AppError> {
    let service = TripService::new(&state);

    let trip = service.create_trip(request).await?;

    Ok((StatusCode::CREATED, Json(trip)))
}

#[axum::debug_handler]
pub async fn active_trips(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TripDetail>>, AppError> {
    let workflow = DispatchWorkflow::new(&state);

    let trips = workflow.active_trips().await?;

    Ok(Json(trips))
}

#[axum::debug_handler]
pub async fn get_trip(
    State(state): State<Arc<AppState>>,
    Path(trip_id): Path<i64>,
) -> Result<Json<TripDetail>, AppError> {
    let service = TripService::new(&state);

    let trip = service.get_trip(trip_id).await?;

    Ok(Json(trip))
}

#[axum::debug_handler]
pub async fn update_trip(
    State(state): State<Arc<AppState>>,
    Path(trip_id): Path<i64>,
    JsonBody(request): JsonBody<UpdateTripRequest>,
) -> Result<Json<TripDetail>, AppError> {
    let service = TripService::new(&state);

    let trip = service.update_trip(trip_id, request).await?;

    Ok(Json(trip))
}

#[axum::debug_handler]
pub async fn delete_trip(
    State(state): State<Arc<AppState>>,
    Path(trip_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = TripService::new(&state);

    service.delete_trip(trip_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn complete_trip(
    State(state): State<Arc<AppState>>,
    Path(trip_id): Path<i64>,
) -> Result<Json<TripDetail>, AppError> {
    let workflow = DispatchWorkflow::new(&state);

    let trip = workflow.complete_trip(trip_id).await?;

    Ok(Json(trip))
}
