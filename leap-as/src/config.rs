//! Provider configuration resolution for leap-as
//!
//! Provides two-tier configuration resolution with ENV → TOML priority for
//! each provider setting. API keys are required; base URLs and the model
//! name fall back to the clients' compiled defaults.

use leap_common::config::TomlConfig;
use leap_common::{Error, Result};
use tracing::{info, warn};

/// Resolved provider settings, injected into the clients at startup
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub assemblyai_api_key: String,
    pub assemblyai_base_url: Option<String>,
    pub genlang_api_key: String,
    pub genlang_base_url: Option<String>,
    pub genlang_model: Option<String>,
}

/// Resolve all provider settings from environment and TOML config
pub fn resolve_provider_settings(toml_config: &TomlConfig) -> Result<ProviderSettings> {
    let assemblyai_api_key = resolve_required_key(
        "AssemblyAI API key",
        "LEAP_ASSEMBLYAI_API_KEY",
        toml_config.assemblyai_api_key.as_deref(),
        "assemblyai_api_key",
    )?;

    let genlang_api_key = resolve_required_key(
        "Generative Language API key",
        "LEAP_GENLANG_API_KEY",
        toml_config.genlang_api_key.as_deref(),
        "genlang_api_key",
    )?;

    Ok(ProviderSettings {
        assemblyai_api_key,
        assemblyai_base_url: resolve_optional(
            "LEAP_ASSEMBLYAI_BASE_URL",
            toml_config.assemblyai_base_url.as_deref(),
        ),
        genlang_api_key,
        genlang_base_url: resolve_optional(
            "LEAP_GENLANG_BASE_URL",
            toml_config.genlang_base_url.as_deref(),
        ),
        genlang_model: resolve_optional("LEAP_GENLANG_MODEL", toml_config.genlang_model.as_deref()),
    })
}

/// Resolve a required key with ENV → TOML priority
fn resolve_required_key(
    label: &str,
    env_var: &str,
    toml_value: Option<&str>,
    toml_key: &str,
) -> Result<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| is_valid_key(v));
    let toml_value = toml_value.filter(|v| is_valid_key(v));

    // Warn if multiple sources (potential misconfiguration)
    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment and TOML. Using environment (highest priority).",
            label
        );
    }

    if let Some(key) = env_value {
        info!("{} loaded from environment variable", label);
        return Ok(key);
    }

    if let Some(key) = toml_value {
        info!("{} loaded from TOML config", label);
        return Ok(key.to_string());
    }

    Err(Error::Config(format!(
        "{} not configured. Please configure using one of:\n\
         1. Environment: {}=your-key-here\n\
         2. TOML config: ~/.config/leap/leap-as.toml ({} = \"your-key\")",
        label, env_var, toml_key
    )))
}

/// Resolve an optional setting with ENV → TOML priority
fn resolve_optional(env_var: &str, toml_value: Option<&str>) -> Option<String> {
    std::env::var(env_var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| toml_value.map(str::to_string))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
