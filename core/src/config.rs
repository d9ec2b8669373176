use std::io::Write;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default endpoint of the hosted brain service.
pub const DEFAULT_ENDPOINT: &str = "https://mcp.axon-collective.net";

/// API keys issued by the registration endpoint all carry this prefix.
pub const API_KEY_PREFIX: &str = "axon_mcp_";

/// Mentor-chat invocations permitted per agent run before the hard block.
pub const DEFAULT_MAX_MENTOR_TURNS: u32 = 4;

/// How the transport authenticates and addresses the remote server.
/// Both conventions are live in the wild, so both must be supported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionMode {
    /// POST `<endpoint>/mcp` with the key in an `X-API-Key` header.
    #[default]
    HeaderKey,
    /// POST `<endpoint>/<apiKey>/mcp` with the key embedded in the path.
    PathKey,
}

impl ConnectionMode {
    /// Per-mode request deadline, used when no explicit timeout is configured.
    pub fn default_timeout(self) -> Duration {
        match self {
            ConnectionMode::HeaderKey => Duration::from_secs(120),
            ConnectionMode::PathKey => Duration::from_secs(10),
        }
    }
}

/// Plugin configuration, persisted at `<config_dir>/axon/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Search the brain automatically before each agent run (default: on).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_search: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_mentor_turns: Option<u32>,
    #[serde(default, skip_serializing_if = "is_default_mode")]
    pub connection_mode: ConnectionMode,
    /// Request deadline override in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

fn is_default_mode(mode: &ConnectionMode) -> bool {
    *mode == ConnectionMode::default()
}

impl PluginConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            agent_name: None,
            endpoint: None,
            auto_search: None,
            max_mentor_turns: None,
            connection_mode: ConnectionMode::default(),
            timeout_ms: None,
        }
    }

    /// Structural validation mirroring the registration contract.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_empty() {
            return Err("api_key is required".to_string());
        }
        if !self.api_key.starts_with(API_KEY_PREFIX) {
            return Err(format!("api_key must start with \"{API_KEY_PREFIX}\""));
        }
        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn auto_search(&self) -> bool {
        self.auto_search.unwrap_or(true)
    }

    pub fn max_mentor_turns(&self) -> u32 {
        self.max_mentor_turns.unwrap_or(DEFAULT_MAX_MENTOR_TURNS)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.connection_mode.default_timeout())
    }
}

pub fn config_path() -> std::path::PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("axon");
    config_dir.join("config.json")
}

pub fn load_config() -> Option<PluginConfig> {
    let path = config_path();
    let data = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&data).ok()
}

pub fn save_config(config: &PluginConfig) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let data = serde_json::to_string_pretty(config)?;

    // Write with restricted permissions (0o600) — the file holds the API key.
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(&path)?;
    file.write_all(data.as_bytes())?;

    Ok(())
}

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

#[cfg(not(unix))]
trait OpenOptionsExt {
    fn mode(&mut self, _mode: u32) -> &mut Self;
}

#[cfg(not(unix))]
impl OpenOptionsExt for std::fs::OpenOptions {
    fn mode(&mut self, _mode: u32) -> &mut Self {
        self
    }
}
