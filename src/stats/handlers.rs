use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::str::FromStr;
use tracing::{info, instrument};

use super::{
    models::{ApplyOutcome, IncomingMessage, ParticipantRecord, RankingRow, RankingView},
    types::AdjustmentRequest,
};
use crate::shared::{AppError, AppState};

/// Admin routes over the stats service
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/messages", post(apply_message))
        .route("/participants", get(list_participants).delete(reset_all))
        .route("/participants/:id/handicap", post(set_handicap))
        .route("/participants/:id/replace-lowest", post(replace_lowest_score))
        .route("/rankings/:view", get(rankings))
        .with_state(state)
}

/// POST /messages
/// Applies a chat message; non-announcements come back with `applicable: false`
#[instrument(name = "apply_message", skip(state, message), fields(message_id = %message.message_id))]
pub async fn apply_message(
    State(state): State<AppState>,
    Json(message): Json<IncomingMessage>,
) -> Result<Json<ApplyOutcome>, AppError> {
    if message.message_id.trim().is_empty() {
        return Err(AppError::BadRequest("message_id must not be empty".to_string()));
    }

    let outcome = state
        .stats_service
        .apply_message(&message, state.directory.as_ref())
        .await;

    Ok(Json(outcome))
}

/// POST /participants/:id/handicap
#[instrument(name = "set_handicap", skip(state))]
pub async fn set_handicap(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
    Json(request): Json<AdjustmentRequest>,
) -> Result<Json<ParticipantRecord>, AppError> {
    let record = state
        .stats_service
        .set_handicap(&participant_id, request.value)
        .await?;
    Ok(Json(record))
}

/// POST /participants/:id/replace-lowest
#[instrument(name = "replace_lowest_score", skip(state))]
pub async fn replace_lowest_score(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
    Json(request): Json<AdjustmentRequest>,
) -> Result<Json<ParticipantRecord>, AppError> {
    let record = state
        .stats_service
        .replace_lowest_score(&participant_id, request.value)
        .await?;
    Ok(Json(record))
}

/// GET /rankings/:view
/// `view` is `overall` or `streak`
#[instrument(name = "rankings", skip(state))]
pub async fn rankings(
    State(state): State<AppState>,
    Path(view): Path<String>,
) -> Result<Json<Vec<RankingRow>>, AppError> {
    let view = RankingView::from_str(&view)
        .map_err(|_| AppError::BadRequest(format!("unknown ranking view: {view}")))?;

    let rows = state.stats_service.rank(view).await;
    info!(%view, rows = rows.len(), "Ranking computed");

    Ok(Json(rows))
}

/// GET /participants
#[instrument(name = "list_participants", skip(state))]
pub async fn list_participants(
    State(state): State<AppState>,
) -> Result<Json<Vec<ParticipantRecord>>, AppError> {
    Ok(Json(state.stats_service.records().await))
}

/// DELETE /participants
/// Wipes the whole ledger and the processed-message set
#[instrument(name = "reset_all", skip(state))]
pub async fn reset_all(State(state): State<AppState>) -> StatusCode {
    state.stats_service.reset_all().await;
    StatusCode::NO_CONTENT
}
