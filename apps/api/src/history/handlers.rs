use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};

use crate::errors::AppError;
use crate::export::export_response;
use crate::models::history::HistoryEntry;
use crate::questions::handlers::ExportQuery;
use crate::state::AppState;

/// GET /api/v1/history
pub async fn handle_list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    Ok(Json(state.history.load().await?))
}

/// GET /api/v1/history/:id
pub async fn handle_get_history_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryEntry>, AppError> {
    let entry = state
        .history
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("History entry {id} not found")))?;
    Ok(Json(entry))
}

/// DELETE /api/v1/history/:id
pub async fn handle_remove_history_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.history.remove(&id).await? {
        return Err(AppError::NotFound(format!("History entry {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/history
pub async fn handle_clear_history(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.history.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/history/:id/export?format=json|csv|text
pub async fn handle_export_history_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let entry = state
        .history
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("History entry {id} not found")))?;
    export_response(query.format, &entry.questions)
}
