//! HTTP router - thin layer that validates input and delegates to the pipeline.
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | `POST` | `/api/summarize/text` | `{ content, mode?, save? }` |
//! | `POST` | `/api/summarize/transcript` | `{ transcript, mode?, save? }` |
//! | `POST` | `/api/summarize/video` | `{ videoId, mode?, save? }` |
//! | `GET`  | `/api/history` | - |
//! | `POST` | `/api/history` | any JSON object |
//! | `DELETE` | `/api/history/{id}` | - (returns `{ success, removed }`) |
//! | `GET`  | `/health` | - |

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::helpers::{ApiError, bad_request, rejected_body};
use crate::core::history::HistoryItem;
use crate::core::models::{
    ContentRequest, LengthMode, SourceKind, SummaryOutcome, VideoMetadata,
};
use crate::features::Pipeline;

#[derive(Clone)]
struct AppState {
    pipeline: Arc<Pipeline>,
}

/// Builds the router around a shared pipeline.
pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/summarize/text", post(summarize_text))
        .route("/api/summarize/transcript", post(summarize_transcript))
        .route("/api/summarize/video", post(summarize_video))
        .route("/api/history", get(list_history).post(save_history))
        .route("/api/history/{id}", delete(delete_history))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(AppState { pipeline })
}

// ============================================================================
// Summarization
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummarizeBody {
    content: Option<String>,
    transcript: Option<String>,
    video_id: Option<String>,
    mode: Option<String>,
    #[serde(default)]
    save: bool,
}

impl SummarizeBody {
    fn payload(&self, kind: SourceKind) -> Option<&str> {
        match kind {
            SourceKind::Text => self.content.as_deref(),
            SourceKind::Transcript => self.transcript.as_deref(),
            SourceKind::Video => self.video_id.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    video_data: Option<VideoMetadata>,
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    item: Option<HistoryItem>,
}

impl SummaryResponse {
    fn new(outcome: SummaryOutcome, item: Option<HistoryItem>) -> Self {
        Self {
            video_data: outcome.metadata,
            summary: outcome.summary,
            transcript: outcome.transcript,
            item,
        }
    }
}

async fn summarize_text(
    State(state): State<AppState>,
    body: Result<Json<SummarizeBody>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    summarize(&state, SourceKind::Text, body).await
}

async fn summarize_transcript(
    State(state): State<AppState>,
    body: Result<Json<SummarizeBody>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    summarize(&state, SourceKind::Transcript, body).await
}

async fn summarize_video(
    State(state): State<AppState>,
    body: Result<Json<SummarizeBody>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    summarize(&state, SourceKind::Video, body).await
}

/// Shared path for all three sources; only the payload field differs.
async fn summarize(
    state: &AppState,
    kind: SourceKind,
    body: Result<Json<SummarizeBody>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(body) = body.map_err(|r| rejected_body("summarize", Some(kind.as_str()), &r))?;

    let request = ContentRequest::new(kind, body.payload(kind)).map_err(|e| {
        warn!(
            operation = "summarize",
            source_kind = kind.as_str(),
            error = %e,
            "Rejected summarize request"
        );
        ApiError::from(e)
    })?;
    let mode = LengthMode::from_option(body.mode.as_deref());

    let response = if body.save {
        let (outcome, item) = state.pipeline.summarize_and_save(&request, mode).await?;
        SummaryResponse::new(outcome, Some(item))
    } else {
        let outcome = state.pipeline.summarize(&request, mode).await?;
        SummaryResponse::new(outcome, None)
    };

    Ok(Json(response))
}

// ============================================================================
// History
// ============================================================================

#[derive(Debug, Serialize)]
struct HistoryListResponse {
    history: Vec<HistoryItem>,
}

#[derive(Debug, Serialize)]
struct HistorySaveResponse {
    item: HistoryItem,
}

/// Deleting an unknown id is a no-op, not a failure: `success` is always
/// true and `removed` tells whether anything was there.
#[derive(Debug, Serialize)]
struct HistoryDeleteResponse {
    success: bool,
    removed: bool,
}

async fn list_history(State(state): State<AppState>) -> Json<HistoryListResponse> {
    Json(HistoryListResponse {
        history: state.pipeline.history().list(),
    })
}

async fn save_history(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<HistorySaveResponse>, ApiError> {
    let Json(body) = body.map_err(|r| rejected_body("save_history", None, &r))?;
    let Value::Object(fields) = body else {
        warn!(operation = "save_history", "History record is not a JSON object");
        return Err(bad_request("history record must be a JSON object"));
    };

    let item = state.pipeline.history().save(fields);
    info!(history_id = %item.id, "Saved history item");
    Ok(Json(HistorySaveResponse { item }))
}

async fn delete_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<HistoryDeleteResponse> {
    let removed = state.pipeline.history().delete_by_id(&id);
    info!(history_id = %id, removed, "Processed history delete");
    Json(HistoryDeleteResponse {
        success: true,
        removed,
    })
}
