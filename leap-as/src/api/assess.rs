//! Assessment API handlers
//!
//! POST /assess/speaking, POST /assess/writing, POST /assess/placement,
//! GET /placement/questions
//!
//! Each assessment runs the full pipeline within the request: (transcribe)
//! → evaluate → reconcile. Input validation happens before any side effect;
//! provider failures abort with no partial persistence.

use axum::{
    body::Bytes,
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    models::{placement_questions, AssessmentKind, AssessmentResult, UserProgress},
    models::question::QuestionView,
    services::progress_reconciler,
    AppState,
};

/// Successful assessment envelope
#[derive(Debug, Serialize)]
pub struct AssessResponse {
    pub ok: bool,
    pub result: AssessmentResult,
    pub progress: UserProgress,
}

/// POST /assess/speaking query parameters
#[derive(Debug, Deserialize)]
pub struct SpeakingParams {
    pub user_id: String,
}

/// POST /assess/writing request
///
/// Required fields arrive as options so their absence reports 400 rather
/// than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct WritingRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// POST /assess/placement request
#[derive(Debug, Deserialize)]
pub struct PlacementRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub claimed_level: Option<String>,
    /// Answers aligned positionally with the server's question bank
    #[serde(default)]
    pub answers: Vec<Option<String>>,
}

/// Extract a non-blank required field or report 400
fn required_field(value: Option<&str>, name: &str) -> Result<String, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ApiError::BadRequest(format!("{} is required", name))),
    }
}

/// POST /assess/speaking?user_id=...
///
/// Raw audio bytes in the request body. Drives the transcription job to a
/// terminal state, evaluates the transcript, then reconciles progress.
pub async fn assess_speaking(
    State(state): State<AppState>,
    Query(params): Query<SpeakingParams>,
    body: Bytes,
) -> ApiResult<Json<AssessResponse>> {
    if params.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("user_id is required".to_string()));
    }
    if body.is_empty() {
        return Err(ApiError::BadRequest(
            "request body must contain audio data".to_string(),
        ));
    }

    tracing::info!(user_id = %params.user_id, bytes = body.len(), "Speaking assessment started");

    let transcript = state.transcription.transcribe(&body).await?;
    let result = state
        .evaluator
        .evaluate_sample(AssessmentKind::Speaking, &transcript)
        .await?;

    let progress = progress_reconciler::reconcile(
        &state.db,
        &params.user_id,
        AssessmentKind::Speaking,
        serde_json::json!({ "transcript": transcript }),
        &result,
    )
    .await?;

    Ok(Json(AssessResponse {
        ok: true,
        result,
        progress,
    }))
}

/// POST /assess/writing
pub async fn assess_writing(
    State(state): State<AppState>,
    Json(request): Json<WritingRequest>,
) -> ApiResult<Json<AssessResponse>> {
    let user_id = required_field(request.user_id.as_deref(), "user_id")?;
    let text = match request.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(ApiError::BadRequest("text is required".to_string())),
    };

    tracing::info!(user_id = %user_id, chars = text.len(), "Writing assessment started");

    let result = state
        .evaluator
        .evaluate_sample(AssessmentKind::Writing, &text)
        .await?;

    let progress = progress_reconciler::reconcile(
        &state.db,
        &user_id,
        AssessmentKind::Writing,
        serde_json::json!({ "text": text }),
        &result,
    )
    .await?;

    Ok(Json(AssessResponse {
        ok: true,
        result,
        progress,
    }))
}

/// POST /assess/placement
///
/// Multiple-choice answers grade deterministically; a model failure during
/// the optional free-writing pass degrades instead of failing the request.
pub async fn assess_placement(
    State(state): State<AppState>,
    Json(request): Json<PlacementRequest>,
) -> ApiResult<Json<AssessResponse>> {
    let user_id = required_field(request.user_id.as_deref(), "user_id")?;

    tracing::info!(
        user_id = %user_id,
        answers = request.answers.len(),
        "Placement assessment started"
    );

    let result = state
        .evaluator
        .evaluate_placement(&request.answers, request.claimed_level.as_deref())
        .await;

    let progress = progress_reconciler::reconcile(
        &state.db,
        &user_id,
        AssessmentKind::Placement,
        serde_json::json!({
            "claimed_level": request.claimed_level,
            "answers": request.answers,
        }),
        &result,
    )
    .await?;

    Ok(Json(AssessResponse {
        ok: true,
        result,
        progress,
    }))
}

/// GET /placement/questions
///
/// The question bank as presented to clients; answer keys never leave the
/// server.
pub async fn get_placement_questions() -> Json<serde_json::Value> {
    let questions: Vec<QuestionView> = placement_questions().iter().map(QuestionView::from).collect();
    Json(serde_json::json!({ "ok": true, "questions": questions }))
}

/// Build assessment routes
pub fn assess_routes() -> Router<AppState> {
    Router::new()
        .route("/assess/speaking", post(assess_speaking))
        .route("/assess/writing", post(assess_writing))
        .route("/assess/placement", post(assess_placement))
        .route("/placement/questions", get(get_placement_questions))
}
