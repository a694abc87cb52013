use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    let api = Router::new()
        // Fees
        .route("/api/fees/quote", post(handlers::fees::quote))
        .route("/api/fees/schedule", get(handlers::fees::schedule))
        // Levels
        .route("/api/levels", get(handlers::levels::table))
        .route("/api/levels/:total_xp", get(handlers::levels::resolve))
        // Card evolution
        .route("/api/evolution", post(handlers::evolution::evaluate))
        // Collections
        .route("/api/collections/sets", get(handlers::collections::sets))
        .route("/api/collections/sets/:id", get(handlers::collections::set_detail))
        .route("/api/collections/stats", post(handlers::collections::stats));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
