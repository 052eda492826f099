//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// TOML configuration file contents (`~/.config/leap/leap-as.toml`)
///
/// All fields optional; environment variables take priority over TOML values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder for service data (database lives here)
    pub root_folder: Option<String>,
    /// Transcription provider (AssemblyAI) API key
    pub assemblyai_api_key: Option<String>,
    /// Transcription provider base URL override
    pub assemblyai_base_url: Option<String>,
    /// Generative Language provider API key
    pub genlang_api_key: Option<String>,
    /// Generative Language provider base URL override
    pub genlang_base_url: Option<String>,
    /// Generative Language model name
    pub genlang_model: Option<String>,
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        tracing::debug!(path, "Root folder from command-line argument");
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        tracing::debug!(path, "Root folder from environment variable");
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Ok(config) = load_toml_config() {
        if let Some(root_folder) = config.root_folder {
            tracing::debug!(path = root_folder, "Root folder from TOML config");
            return PathBuf::from(root_folder);
        }
    }

    // Priority 4: OS-dependent compiled default
    get_default_root_folder()
}

/// Get default configuration file path for the platform
pub fn config_file_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir()
        .map(|d| d.join("leap").join("leap-as.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if user_config.exists() {
        return Ok(user_config);
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/leap/leap-as.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config(format!(
        "Config file not found: {}",
        user_config.display()
    )))
}

/// Load TOML configuration from the platform config path
pub fn load_toml_config() -> Result<TomlConfig> {
    let path = config_file_path()?;
    load_toml_config_from(&path)
}

/// Load TOML configuration from an explicit path
pub fn load_toml_config_from(path: &std::path::Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Get OS-dependent default root folder path
fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("leap"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/leap"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("leap"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/leap"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("leap"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\leap"))
    } else {
        PathBuf::from("./leap_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_arg_takes_priority() {
        let resolved = resolve_root_folder(Some("/tmp/leap-test"), "LEAP_TEST_UNSET_VAR");
        assert_eq!(resolved, PathBuf::from("/tmp/leap-test"));
    }

    #[test]
    fn env_var_used_when_no_cli_arg() {
        std::env::set_var("LEAP_TEST_ROOT_VAR", "/tmp/leap-env");
        let resolved = resolve_root_folder(None, "LEAP_TEST_ROOT_VAR");
        std::env::remove_var("LEAP_TEST_ROOT_VAR");
        assert_eq!(resolved, PathBuf::from("/tmp/leap-env"));
    }

    #[test]
    fn toml_config_parses_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leap-as.toml");
        std::fs::write(
            &path,
            r#"
root_folder = "/srv/leap"
assemblyai_api_key = "aai-key"
genlang_api_key = "gl-key"
genlang_model = "text-bison-001"
"#,
        )
        .unwrap();

        let config = load_toml_config_from(&path).unwrap();
        assert_eq!(config.root_folder.as_deref(), Some("/srv/leap"));
        assert_eq!(config.assemblyai_api_key.as_deref(), Some("aai-key"));
        assert_eq!(config.genlang_api_key.as_deref(), Some("gl-key"));
        assert_eq!(config.genlang_model.as_deref(), Some("text-bison-001"));
        assert!(config.assemblyai_base_url.is_none());
    }

    #[test]
    fn toml_config_tolerates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leap-as.toml");
        std::fs::write(&path, "").unwrap();

        let config = load_toml_config_from(&path).unwrap();
        assert!(config.root_folder.is_none());
    }
}
