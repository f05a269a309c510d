use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Display surface
        .route("/session/status", get(handlers::get_status))
        .route("/session/voice-activity", post(handlers::set_voice_activity))
        // Listening control
        .route("/session/toggle", post(handlers::toggle_listening))
        // Browser-based displays run on another origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
