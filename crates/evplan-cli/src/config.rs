//! Configuration file management for evplan.
//!
//! Provides a TOML-based config file at `~/.config/evplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default. A `.env`
//! file in the working directory is loaded into the environment first.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use evplan_core::source::GeminiConfig;

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_MODEL: &str = "EVPLAN_MODEL";
pub const ENV_MODEL_BASE_URL: &str = "EVPLAN_MODEL_BASE_URL";
pub const ENV_MODEL_TIMEOUT_SECS: &str = "EVPLAN_MODEL_TIMEOUT_SECS";
pub const ENV_BIND: &str = "EVPLAN_BIND";
pub const ENV_PORT: &str = "EVPLAN_PORT";
pub const ENV_SERVER_URL: &str = "EVPLAN_SERVER_URL";
pub const ENV_CLIENT_TIMEOUT_SECS: &str = "EVPLAN_CLIENT_TIMEOUT_SECS";
pub const ENV_MOCK_DELAY_MS: &str = "EVPLAN_MOCK_DELAY_MS";

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
pub const DEFAULT_CLIENT_TIMEOUT_SECS: u64 = 90;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub model: ModelSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub client: ClientSection,
    #[serde(default)]
    pub mock: MockSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ModelSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ClientSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MockSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the evplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/evplan` or `~/.config/evplan`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("evplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("evplan")
}

/// Return the path to the evplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(config)
}

/// Load the config file if one exists. A present but malformed file is an
/// error.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    if !path.exists() {
        return Ok(None);
    }
    load_config_from(&path).map(Some)
}

/// Serialize and write `config` to `path`, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

/// Load `.env` from the working directory into the process environment.
/// Returns the file's path when one was found.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

// -----------------------------------------------------------------------
// Resolution helpers
// -----------------------------------------------------------------------

/// Non-empty value of env var `key`.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn pick_string(cli: Option<&str>, env_key: &str, file: Option<&str>, default: &str) -> String {
    cli.map(str::to_string)
        .or_else(|| env_value(env_key))
        .or_else(|| file.map(str::to_string))
        .unwrap_or_else(|| default.to_string())
}

fn pick_parsed<T>(cli: Option<T>, env_key: &str, file: Option<T>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    if let Some(v) = cli {
        return Ok(v);
    }
    if let Some(raw) = env_value(env_key) {
        return raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid {env_key}={raw:?}: {e}"));
    }
    Ok(file.unwrap_or(default))
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line, which win over everything else.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub server_url: Option<String>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone)]
pub struct EvplanConfig {
    pub gemini: GeminiConfig,
    pub bind: String,
    pub port: u16,
    pub server_url: String,
    pub client_timeout: Duration,
    pub mock_delay: Duration,
}

impl EvplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let file = load_config()?.unwrap_or_default();
        Self::resolve_with(cli, &file)
    }

    /// [`EvplanConfig::resolve`] against an already loaded config file.
    pub fn resolve_with(cli: &CliOverrides, file: &ConfigFile) -> Result<Self> {
        let api_key = env_value(ENV_API_KEY).or_else(|| {
            file.model
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
        });

        let gemini = GeminiConfig {
            api_key,
            model: pick_string(
                None,
                ENV_MODEL,
                file.model.name.as_deref(),
                GeminiConfig::DEFAULT_MODEL,
            ),
            base_url: pick_string(
                None,
                ENV_MODEL_BASE_URL,
                file.model.base_url.as_deref(),
                GeminiConfig::DEFAULT_BASE_URL,
            ),
            timeout: Duration::from_secs(pick_parsed(
                None,
                ENV_MODEL_TIMEOUT_SECS,
                file.model.timeout_secs,
                GeminiConfig::DEFAULT_TIMEOUT_SECS,
            )?),
        };

        let bind = pick_string(
            cli.bind.as_deref(),
            ENV_BIND,
            file.server.bind.as_deref(),
            DEFAULT_BIND,
        );
        let port = pick_parsed(cli.port, ENV_PORT, file.server.port, DEFAULT_PORT)?;
        let server_url = pick_string(
            cli.server_url.as_deref(),
            ENV_SERVER_URL,
            file.client.server_url.as_deref(),
            DEFAULT_SERVER_URL,
        );
        let client_timeout = Duration::from_secs(pick_parsed(
            None,
            ENV_CLIENT_TIMEOUT_SECS,
            file.client.timeout_secs,
            DEFAULT_CLIENT_TIMEOUT_SECS,
        )?);
        let mock_delay = Duration::from_millis(pick_parsed(
            None,
            ENV_MOCK_DELAY_MS,
            file.mock.delay_ms,
            0,
        )?);

        Ok(Self {
            gemini,
            bind,
            port,
            server_url,
            client_timeout,
            mock_delay,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.gemini.api_key.is_some()
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
