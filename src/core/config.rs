//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.tally/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    pub data_dir: Option<String>,
    pub key: Option<String>,
    pub save_retries: Option<u32>,
    pub retry_backoff_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_STORAGE_KEY: &str = "todo-lists";
pub const DEFAULT_SAVE_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 200;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;
const DEFAULT_LOG_FILE: &str = "tally.log";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub save_retries: u32,
    pub retry_backoff_ms: u64,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
    /// Keep everything in memory; nothing is read from or written to disk.
    pub ephemeral: bool,
}

/// Values taken from command-line flags (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub ephemeral: bool,
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

/// Returns `~/.tally/`, the home of config, data and logs.
pub fn tally_home() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".tally"))
}

/// Returns the path to `~/.tally/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    tally_home().map(|h| h.join("config.toml"))
}

/// Load config from `~/.tally/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `TallyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<TallyConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(TallyConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<TallyConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(TallyConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: TallyConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Tally Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [storage]
# data_dir = "~/.tally/data"         # Or set TALLY_DATA_DIR, or pass --data-dir
# key = "todo-lists"                 # Storage key holding the list collection
# save_retries = 3                   # Attempts per snapshot before giving up
# retry_backoff_ms = 200             # First retry delay, doubled each attempt

# [logging]
# level = "info"                     # "off", "error", "warn", "info", "debug", "trace"
# file = "~/.tally/tally.log"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &TallyConfig, cli: &CliOverrides) -> ResolvedConfig {
    let home = tally_home().unwrap_or_else(|| PathBuf::from(".tally"));

    // Data dir: CLI → env → config → default
    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| std::env::var("TALLY_DATA_DIR").ok().map(PathBuf::from))
        .or_else(|| config.storage.data_dir.as_deref().map(expand_home))
        .unwrap_or_else(|| home.join("data"));

    // Log level: CLI → env → config → default. Unknown names fall back.
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| std::env::var("TALLY_LOG_LEVEL").ok())
        .or_else(|| config.logging.level.clone())
        .and_then(|s| parse_level(&s))
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let log_file = config
        .logging
        .file
        .as_deref()
        .map(expand_home)
        .unwrap_or_else(|| home.join(DEFAULT_LOG_FILE));

    ResolvedConfig {
        data_dir,
        storage_key: config
            .storage
            .key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
        save_retries: config
            .storage
            .save_retries
            .unwrap_or(DEFAULT_SAVE_RETRIES)
            .max(1),
        retry_backoff_ms: config
            .storage
            .retry_backoff_ms
            .unwrap_or(DEFAULT_RETRY_BACKOFF_MS),
        log_level,
        log_file,
        ephemeral: cli.ephemeral,
    }
}

fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.parse() {
        Ok(level) => Some(level),
        Err(_) => {
            warn!("Unknown log level '{}', using default", name);
            None
        }
    }
}

/// Expand a leading `~/` against the home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
