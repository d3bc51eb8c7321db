use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use accounts_cell::router::user_routes;
use dispatch_cell::dispatch_routes;
use fleet_cell::ambulance_routes;
use patient_cell::patient_routes;
use reports_cell::report_routes;
use shared_database::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api = user_routes(state.clone())
        .merge(ambulance_routes(state.clone()))
        .merge(patient_routes(state.clone()))
        .merge(dispatch_routes(state.clone()))
        .merge(report_routes(state));

    Router::new()
        .route("/health", get(health))
        .route("/api", get(api_root))
        .nest("/api", api)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Public index of the endpoint groups.
async fn api_root() -> Json<Value> {
    Json(json!({
        "message": "Ambulance Dispatch API",
        "endpoints": {
            "users": "/api/users",
            "profile": "/api/profile",
            "ambulances": "/api/ambulances",
            "patients": "/api/patients",
            "emergency_calls": "/api/emergency-calls",
            "trips": "/api/trips",
            "driver_inspections": "/api/driver-inspections",
            "paramedic_inspections": "/api/paramedic-inspections",
            "maintenance_records": "/api/maintenance-records",
            "reports": {
                "inspection_summary": "/api/reports/inspection-summary",
                "maintenance_summary": "/api/reports/maintenance-summary",
                "ambulance_utilization": "/api/reports/ambulance-utilization",
                "overdue_maintenance": "/api/reports/overdue-maintenance"
            }
        },
        "authentication": "Authorization: Bearer <token>"
    }))
}
