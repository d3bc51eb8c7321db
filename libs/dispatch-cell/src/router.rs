use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn dispatch_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Emergency calls
        .route("/emergency-calls", get(handlers::list_calls).post(handlers::create_call))
        .route("/emergency-calls/pending", get(handlers::pending_calls))
        .route(
            "/emergency-calls/{call_id}",
            get(handlers::get_call)
                .put(handlers::update_call)
                .patch(handlers::update_call)
                .delete(handlers::delete_call),
        )
        .route("/emergency-calls/{call_id}/assign", post(handlers::assign_ambulance))
        .route("/emergency-calls/{call_id}/status", post(handlers::update_call_status))
        // Trips
        .route("/trips", get(handlers::list_trips).post(handlers::create_trip))
        .route("/trips/active", get(handlers::active_trips))
        .route(
            "/trips/{trip_id}",
            get(handlers::get_trip)
                .put(handlers::update_trip)
                .patch(handlers::update_trip)
                .delete(handlers::delete_trip),
        )
        .route("/trips/{trip_id}/complete", post(handlers::complete_trip))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
