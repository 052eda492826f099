//! leap-as - Assessment Microservice
//!
//! **Module Identity:**
//! - Name: leap-as (Assessment)
//! - Port: 5741
//!
//! Assesses a learner's English proficiency from spoken or written samples
//! and maintains the per-user progress record (level, confidence, daily
//! streak, earned badges).

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use leap_as::config::resolve_provider_settings;
use leap_as::services::{Evaluator, GenerationClient, TranscriptionClient};
use leap_as::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting leap-as (Assessment) microservice");
    info!("Port: 5741");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Step 1: Resolve root folder (CLI arg → ENV → TOML → OS default)
    let cli_root = std::env::args().nth(1);
    let root_folder =
        leap_common::config::resolve_root_folder(cli_root.as_deref(), "LEAP_ROOT_FOLDER");

    // Step 2: Open or create database
    let db_path = root_folder.join("leap.db");
    info!("Database: {}", db_path.display());

    let db_pool = leap_as::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Step 3: Resolve provider settings (ENV → TOML) and build clients once;
    // handlers receive them through AppState.
    let toml_config = leap_common::config::load_toml_config().unwrap_or_default();
    let settings = resolve_provider_settings(&toml_config)
        .map_err(|e| anyhow::anyhow!("Provider configuration failed: {}", e))?;

    let transcription = TranscriptionClient::new(
        settings.assemblyai_api_key.clone(),
        settings.assemblyai_base_url.clone(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to create transcription client: {}", e))?;

    let generation = GenerationClient::new(
        settings.genlang_api_key.clone(),
        settings.genlang_base_url.clone(),
        settings.genlang_model.clone(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to create generation client: {}", e))?;

    let evaluator = Evaluator::new(std::sync::Arc::new(generation));

    // Create application state
    let state = AppState::new(db_pool, transcription, evaluator);

    // Build router
    let app = leap_as::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind("127.0.0.1:5741").await?;
    info!("Listening on http://127.0.0.1:5741");
    info!("Health check: http://127.0.0.1:5741/health");

    axum::serve(listener, app).await?;

    Ok(())
}
