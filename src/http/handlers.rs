use super::state::AppState;
use crate::analytics;
use crate::error::TranscriptionError;
use crate::provider::{all_capabilities, provider_capabilities};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /providers/capabilities
/// Capability table for every registered provider
pub async fn list_capabilities() -> impl IntoResponse {
    (StatusCode::OK, Json(all_capabilities()))
}

/// GET /providers/:name/capabilities
/// Capabilities of one provider; 404 for unknown names
pub async fn get_capabilities(Path(name): Path<String>) -> impl IntoResponse {
    match provider_capabilities(&name) {
        Ok(capabilities) => (StatusCode::OK, Json(capabilities)).into_response(),
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /meetings/:meeting_id/transcriptions
/// All transcriptions recorded for a meeting
pub async fn list_meeting_transcriptions(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> impl IntoResponse {
    match state.repository.find_by_meeting_id(&meeting_id).await {
        Ok(transcriptions) => (StatusCode::OK, Json(transcriptions)).into_response(),
        Err(e) => {
            error!("Failed to load transcriptions for {}: {}", meeting_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to load transcriptions: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /transcriptions/:transcription_id/segments
/// Stored segments for a transcription, in sequence order
pub async fn get_transcription_segments(
    State(state): State<AppState>,
    Path(transcription_id): Path<String>,
) -> impl IntoResponse {
    match state.repository.find_segments(&transcription_id).await {
        Ok(segments) => (StatusCode::OK, Json(segments)).into_response(),
        Err(e) => {
            error!("Failed to load segments for {}: {}", transcription_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to load segments: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /transcriptions/:transcription_id/analytics
/// Analytics derived on demand from the stored segments
pub async fn get_transcription_analytics(
    State(state): State<AppState>,
    Path(transcription_id): Path<String>,
) -> impl IntoResponse {
    let segments = match state.repository.find_segments(&transcription_id).await {
        Ok(segments) => segments,
        Err(e) => {
            error!("Failed to load segments for {}: {}", transcription_id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to load segments: {}", e),
                }),
            )
                .into_response();
        }
    };

    match analytics::analyze(&transcription_id, &segments) {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e @ TranscriptionError::NoSegments(_)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}
