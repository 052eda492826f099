//! leap-as library interface for testing
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::{Evaluator, TranscriptionClient};

/// Application state shared across handlers
///
/// Provider clients are constructed once at startup and injected here; no
/// component reaches for global state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Transcription provider client
    pub transcription: Arc<TranscriptionClient>,
    /// Evaluation orchestrator (owns the generation client)
    pub evaluator: Arc<Evaluator>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, transcription: TranscriptionClient, evaluator: Evaluator) -> Self {
        Self {
            db,
            transcription: Arc::new(transcription),
            evaluator: Arc::new(evaluator),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::assess_routes())
        .merge(api::progress_routes())
        .merge(api::health_routes())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
