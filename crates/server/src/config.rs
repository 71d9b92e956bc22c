//! Server configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_AI_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 10;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Enables the command fallback when set.
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    /// Upper bound on the single fallback attempt.
    pub ai_timeout: Duration,
    /// Command history file; `None` keeps history in memory.
    pub history_file: Option<PathBuf>,
    /// Scene autosave file; `None` disables autosave.
    pub autosave_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let autosave = lookup("AUTOSAVE")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Self {
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            ai_api_key: lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty()),
            ai_model: lookup("AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.into()),
            ai_timeout: Duration::from_secs(
                lookup("AI_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_AI_TIMEOUT_SECS),
            ),
            history_file: lookup("HISTORY_FILE")
                .map(PathBuf::from)
                .or_else(doodle_engine::command::history::JsonFileHistory::default_path),
            autosave_file: if autosave {
                doodle_engine::scene::SceneState::default_autosave_path()
            } else {
                None
            },
        }
    }
}
