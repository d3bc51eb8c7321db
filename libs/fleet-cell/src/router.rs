use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn ambulance_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ambulances", get(handlers::list_ambulances).post(handlers::create_ambulance))
        .route("/ambulances/available", get(handlers::available_ambulances))
        .route(
            "/ambulances/{ambulance_id}",
            get(handlers::get_ambulance)
                .put(handlers::update_ambulance)
                .patch(handlers::update_ambulance)
                .delete(handlers::delete_ambulance),
        )
        .route("/ambulances/{ambulance_id}/location", patch(handlers::update_location))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
