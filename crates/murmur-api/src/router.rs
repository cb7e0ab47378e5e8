use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::statuses;

/// All REST routes. Transport layers (CORS, tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/activate", get(auth::activate))
        .route("/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route(
            "/statuses/{status_id}/shares",
            post(statuses::share_status).get(statuses::list_sharers),
        )
        .route("/statuses/{status_id}/shared", get(statuses::has_been_shared))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
