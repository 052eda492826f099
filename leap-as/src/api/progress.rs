//! Progress read API

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{
    db::progress as progress_db,
    error::{ApiError, ApiResult},
    models::{AssessmentHistoryEntry, UserProgress},
    AppState,
};

/// Number of history entries returned with a progress read
const HISTORY_LIMIT: u32 = 20;

/// GET /progress/{user_id} response
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub ok: bool,
    pub progress: UserProgress,
    pub history: Vec<AssessmentHistoryEntry>,
}

/// GET /progress/:user_id
///
/// Read the stored progress snapshot plus recent assessment history.
pub async fn get_progress(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ProgressResponse>> {
    let progress = progress_db::load_progress(&state.db, &user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No progress for user: {}", user_id)))?;

    let history = progress_db::list_history(&state.db, &user_id, HISTORY_LIMIT).await?;

    Ok(Json(ProgressResponse {
        ok: true,
        progress,
        history,
    }))
}

/// Build progress routes
pub fn progress_routes() -> Router<AppState> {
    Router::new().route("/progress/:user_id", get(get_progress))
}
