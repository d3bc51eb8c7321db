use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn report_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Inspections
        .route(
            "/driver-inspections",
            get(handlers::list_driver_inspections).post(handlers::create_driver_inspection),
        )
        .route(
            "/driver-inspections/{inspection_id}",
            get(handlers::get_driver_inspection)
                .put(handlers::update_driver_inspection)
                .patch(handlers::update_driver_inspection)
                .delete(handlers::delete_driver_inspection),
        )
        .route(
            "/paramedic-inspections",
            get(handlers::list_paramedic_inspections).post(handlers::create_paramedic_inspection),
        )
        .route(
            "/paramedic-inspections/{inspection_id}",
            get(handlers::get_paramedic_inspection)
                .put(handlers::update_paramedic_inspection)
                .patch(handlers::update_paramedic_inspection)
                .delete(handlers::delete_paramedic_inspection),
        )
        // Maintenance
        .route(
            "/maintenance-records",
            get(handlers::list_maintenance_records).post(handlers::create_maintenance_record),
        )
        .route(
            "/maintenance-records/{record_id}",
            get(handlers::get_maintenance_record)
                .put(handlers::update_maintenance_record)
                .patch(handlers::update_maintenance_record)
                .delete(handlers::delete_maintenance_record),
        )
        // Aggregated reports
        .route("/reports/inspection-summary", get(handlers::inspection_summary))
        .route("/reports/maintenance-summary", get(handlers::maintenance_summary))
        .route("/reports/ambulance-utilization", get(handlers::ambulance_utilization))
        .route("/reports/overdue-maintenance", get(handlers::overdue_maintenance))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
