use super::handlers;
use super::state::AppState;
use crate::stream;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Streaming protocol
        .route("/ws", get(stream::ws_upgrade))
        // Provider capability queries
        .route("/providers/capabilities", get(handlers::list_capabilities))
        .route(
            "/providers/:name/capabilities",
            get(handlers::get_capabilities),
        )
        // Transcription queries
        .route(
            "/meetings/:meeting_id/transcriptions",
            get(handlers::list_meeting_transcriptions),
        )
        .route(
            "/transcriptions/:transcription_id/segments",
            get(handlers::get_transcription_segments),
        )
        .route(
            "/transcriptions/:transcription_id/analytics",
            get(handlers::get_transcription_analytics),
        )
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
