use axum::{
    middleware::from_fn,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Recommendations
        .route(
            "/recommendations",
            get(handlers::get_recent).post(handlers::create_recommendation),
        )
        .route("/recommendations/random", get(handlers::get_random))
        .route("/recommendations/top/:amount", get(handlers::get_top))
        .route("/recommendations/e2eReset", delete(handlers::reset))
        .route("/recommendations/:id", get(handlers::get_by_id))
        // Voting
        .route("/recommendations/:id/upvote", post(handlers::upvote))
        .route("/recommendations/:id/downvote", post(handlers::downvote))
        .layer(
            ServiceBuilder::new()
                // Outermost first: the id must exist before the trace span is made
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
