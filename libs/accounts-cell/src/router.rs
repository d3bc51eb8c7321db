use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn user_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/users/{user_id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/profile", get(handlers::get_profile))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
