//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.atpinsight/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AtpConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub strict_verify: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AccessConfig {
    pub require_code: Option<bool>,
    pub code: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_file: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_LOG_FILE: &str = "atpinsight.log";

// ============================================================================
// CLI overrides
// ============================================================================

/// Values supplied on the command line. `None` / `false` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub access_code: Option<String>,
    pub no_gate: bool,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<String>,
}

// ============================================================================
// Resolved Config (concrete values, no Options where a default exists)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub base_url: String,
    /// Transport timeout. `None` leaves it to reqwest (no timeout).
    pub request_timeout: Option<Duration>,
    /// When true, only 2xx from `/verify` counts as accepted.
    pub strict_verify: bool,
    pub require_access_code: bool,
    /// Pre-supplied access code, verified automatically at start-up.
    pub access_code: Option<String>,
    pub log_file: PathBuf,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.atpinsight/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".atpinsight").join("config.toml"))
}

/// Load config from `~/.atpinsight/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `AtpConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<AtpConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(AtpConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(AtpConfig::default());
    }

    load_config_from(&path)
}

/// Parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<AtpConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AtpConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    // The access code is a shared secret; keep it out of the log
    debug!(
        "Config: backend={:?}, require_code={:?}, log_file={:?}",
        config.backend, config.access.require_code, config.general.log_file
    );
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# ATPInsight Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [backend]
# base_url = "http://127.0.0.1:8000"   # Or set ATPINSIGHT_API_URL env var
# request_timeout_secs = 30            # Unset = no client-side timeout
# strict_verify = false                # true: only 2xx from /verify is accepted

# [access]
# require_code = true                  # false: skip the access gate entirely
# code = "..."                         # Or set ATPINSIGHT_ACCESS_CODE env var

# [general]
# log_file = "atpinsight.log"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &AtpConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], with the environment lookup injected.
pub fn resolve_with_env<F>(config: &AtpConfig, cli: &CliOverrides, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Base URL: CLI → env → config → default
    let base_url = cli
        .api_url
        .clone()
        .or_else(|| env("ATPINSIGHT_API_URL"))
        .or_else(|| env("API_URL"))
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let base_url = base_url.trim_end_matches('/').to_string();

    let request_timeout = cli
        .timeout_secs
        .or(config.backend.request_timeout_secs)
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs);

    // Gate: --no-gate wins, otherwise config, default on
    let require_access_code = !cli.no_gate && config.access.require_code.unwrap_or(true);

    // Access code: CLI → env → config. Blank values count as unset.
    let access_code = cli
        .access_code
        .clone()
        .or_else(|| env("ATPINSIGHT_ACCESS_CODE"))
        .or_else(|| config.access.code.clone())
        .filter(|code| !code.trim().is_empty());

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| env("ATPINSIGHT_LOG_FILE"))
        .or_else(|| config.general.log_file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    ResolvedConfig {
        base_url,
        request_timeout,
        strict_verify: config.backend.strict_verify.unwrap_or(false),
        require_access_code,
        access_code,
        log_file: PathBuf::from(log_file),
    }
}
