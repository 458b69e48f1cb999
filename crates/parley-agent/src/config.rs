//! Worker process configuration from file and environment variables.

use parley_session::RoomServiceConfig;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level worker configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Liveness endpoint settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// LiveKit room service connection.
    #[serde(default)]
    pub livekit: RoomServiceConfig,

    /// Agent identity and capability providers.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the liveness HTTP endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_health_port")]
    pub port: u16,
}

/// Agent identity and provider selection.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Name reported by the liveness endpoint.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Hosted STT provider id.
    #[serde(default = "default_stt")]
    pub stt: String,

    /// Hosted LLM provider id.
    #[serde(default = "default_llm")]
    pub llm: String,

    /// Hosted TTS provider id (model plus voice).
    #[serde(default = "default_tts")]
    pub tts: String,

    /// Seconds between room dispatch polls.
    #[serde(default = "default_dispatch_interval_seconds")]
    pub dispatch_interval_seconds: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "parley_session=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_health_port() -> u16 {
    8080
}

fn default_service_name() -> String {
    "parley-voice-agent".to_string()
}

fn default_stt() -> String {
    "assemblyai/universal-streaming:en".to_string()
}

fn default_llm() -> String {
    "openai/gpt-4.1-mini".to_string()
}

fn default_tts() -> String {
    "cartesia/sonic-2:9626c31c-bec5-4cca-baa8-f8ba9e84c8bc".to_string()
}

fn default_dispatch_interval_seconds() -> u64 {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_health_port(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            stt: default_stt(),
            llm: default_llm(),
            tts: default_tts(),
            dispatch_interval_seconds: default_dispatch_interval_seconds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `LIVEKIT_URL` overrides `livekit.url`
/// - `LIVEKIT_API_KEY` overrides `livekit.api_key`
/// - `LIVEKIT_API_SECRET` overrides `livekit.api_secret`
/// - `PARLEY_HEALTH_PORT` overrides `server.port`
/// - `PARLEY_LOG_LEVEL` overrides `logging.level`
/// - `PARLEY_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// The `LIVEKIT_*` variables are the ones an `.env` file populates.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(url) = std::env::var("LIVEKIT_URL") {
        config.livekit.url = url;
    }
    if let Ok(key) = std::env::var("LIVEKIT_API_KEY") {
        config.livekit.api_key = key;
    }
    if let Ok(secret) = std::env::var("LIVEKIT_API_SECRET") {
        config.livekit.api_secret = secret;
    }
    if let Ok(port) = std::env::var("PARLEY_HEALTH_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(level) = std::env::var("PARLEY_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("PARLEY_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    Ok(config)
}
