//! Configuration loading and dataset path resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Dataset location used when nothing else is configured
pub const DEFAULT_DATASET_PATH: &str = "data/dofus_posts_no_sub_clean_labeled.csv";

/// Environment variable overriding the dataset location
pub const DATASET_ENV_VAR: &str = "FPX_DATASET";

pub const DEFAULT_PORT: u16 = 5790;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";

/// Authors need strictly more posts than this to appear in the author chart
pub const DEFAULT_AUTHOR_MIN_POSTS: usize = 2;

/// What to do with a row whose `tags` cell does not decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Abort the load on the first malformed row
    #[default]
    Strict,
    /// Log a warning, drop the row and keep loading
    Skip,
}

/// Bootstrap configuration loaded from TOML file
///
/// Read once at startup. Every field has a default so a missing or partial
/// file still starts the dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Path to the labeled CSV dataset
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default)]
    pub decode_policy: DecodePolicy,

    #[serde(default = "default_author_min_posts")]
    pub author_min_posts: usize,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_author_min_posts() -> usize {
    DEFAULT_AUTHOR_MIN_POSTS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            port: default_port(),
            bind_address: default_bind_address(),
            decode_policy: DecodePolicy::default(),
            author_min_posts: default_author_min_posts(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the platform config file is
    /// used when present, otherwise compiled defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                info!("No config file found, using compiled defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Platform config file location (`~/.config/fpx/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fpx").join("config.toml"))
}

/// Dataset path resolution, in priority order:
/// 1. Command-line argument
/// 2. Environment variable
/// 3. TOML config file
/// 4. Compiled default
pub fn resolve_dataset_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.dataset_path {
        return path.clone();
    }

    PathBuf::from(DEFAULT_DATASET_PATH)
}

/// Everything [`crate::Session::init`] needs
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub dataset_path: PathBuf,
    pub decode_policy: DecodePolicy,
    pub author_min_posts: usize,
}

impl SessionConfig {
    /// Session settings for a dataset with default policies
    pub fn new(dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            decode_policy: DecodePolicy::default(),
            author_min_posts: DEFAULT_AUTHOR_MIN_POSTS,
        }
    }

    /// Session settings from resolved path plus TOML policies
    pub fn from_toml(dataset_path: PathBuf, config: &TomlConfig) -> Self {
        Self {
            dataset_path,
            decode_policy: config.decode_policy,
            author_min_posts: config.author_min_posts,
        }
    }
}
