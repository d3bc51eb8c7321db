use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn patient_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/patients", get(handlers::list_patients).post(handlers::create_patient))
        .route(
            "/patients/{patient_id}",
            get(handlers::get_patient)
                .put(handlers::update_patient)
                .patch(handlers::update_patient)
                .delete(handlers::delete_patient),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
