//! Configuration for the `taskboard` client.
//!
//! Settings are layered, highest priority first:
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attributes)
//! 3. TOML config file (`~/.config/taskboard/config.toml`)
//! 4. Compiled defaults
//!
//! A missing default config file is not an error. An explicit `--config`
//! path that doesn't exist is.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::http::{DEFAULT_BASE_URL, HttpConfig};
use crate::notify::DEFAULT_NOTIFICATION_LIMIT;
use crate::runtime::DEFAULT_CHANNEL_CAPACITY;
use taskboard_proto::task::MAX_TASK_TITLE_LENGTH;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    api: ApiFileConfig,
    session: SessionFileConfig,
    board: BoardFileConfig,
    ui: UiFileConfig,
}

/// `[api]`
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ApiFileConfig {
    base_url: Option<String>,
    token: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// `[session]`
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SessionFileConfig {
    user_id: Option<String>,
}

/// `[board]`
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct BoardFileConfig {
    project_id: Option<String>,
    channel_capacity: Option<usize>,
}

/// `[ui]`
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
    max_task_title_len: Option<usize>,
    notification_limit: Option<usize>,
    timestamp_format: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -- API --
    /// API base URL.
    pub base_url: String,
    /// Bearer token for every request.
    pub token: Option<String>,
    /// Per-request timeout.
    pub request_timeout: Duration,

    // -- Session --
    /// ID of the signed-in user, used by the task-creation gate.
    pub user_id: Option<String>,

    // -- Board --
    /// Project shown on the board.
    pub project_id: Option<String>,
    /// Capacity of the board event channel.
    pub channel_capacity: usize,
    /// Run against the in-process demo backend.
    pub offline: bool,

    // -- UI --
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
    /// Maximum task title length in characters.
    pub max_task_title_len: usize,
    /// Notifications kept for display.
    pub notification_limit: usize,
    /// Timestamp display format string (chrono).
    pub timestamp_format: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            request_timeout: Duration::from_secs(15),
            user_id: None,
            project_id: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            offline: false,
            poll_timeout: Duration::from_millis(50),
            max_task_title_len: MAX_TASK_TITLE_LENGTH,
            notification_limit: DEFAULT_NOTIFICATION_LIMIT,
            timestamp_format: "%H:%M:%S".to_string(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration by merging CLI args, env vars and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file exists but can't be read
    /// or parsed, or if an explicit `--config` path doesn't exist.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            base_url: cli
                .api_url
                .clone()
                .or_else(|| file.api.base_url.clone())
                .unwrap_or(defaults.base_url),
            token: cli.token.clone().or_else(|| file.api.token.clone()),
            request_timeout: file
                .api
                .request_timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
            user_id: cli
                .user_id
                .clone()
                .or_else(|| file.session.user_id.clone()),
            project_id: cli
                .project
                .clone()
                .or_else(|| file.board.project_id.clone()),
            channel_capacity: file
                .board
                .channel_capacity
                .unwrap_or(defaults.channel_capacity),
            offline: cli.offline,
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            max_task_title_len: file
                .ui
                .max_task_title_len
                .unwrap_or(defaults.max_task_title_len),
            notification_limit: file
                .ui
                .notification_limit
                .unwrap_or(defaults.notification_limit),
            timestamp_format: file
                .ui
                .timestamp_format
                .clone()
                .unwrap_or(defaults.timestamp_format),
        }
    }

    /// Settings for the HTTP backend.
    #[must_use]
    pub fn to_http_config(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            timeout: self.request_timeout,
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal kanban board for a task-management backend")]
pub struct CliArgs {
    /// Project whose board to open.
    #[arg(short, long, env = "TASKBOARD_PROJECT")]
    pub project: Option<String>,

    /// API base URL (default: `http://localhost:3001/api`).
    #[arg(long, env = "TASKBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token sent with every request.
    #[arg(long, env = "TASKBOARD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// ID of the signed-in user.
    #[arg(long, env = "TASKBOARD_USER_ID")]
    pub user_id: Option<String>,

    /// Path to config file (default: `~/.config/taskboard/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKBOARD_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/taskboard.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Use the built-in demo backend instead of the API.
    #[arg(long)]
    pub offline: bool,
}

/// Loads and parses a TOML config file.
///
/// An explicit path must exist; the default path may be missing.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    let path = config_dir.join("taskboard").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
