// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI configuration.
//!
//! Configuration is read from `<state_dir>/config.toml`. Every section is
//! optional:
//! - `[api]`: where operations are delivered (`url`, `timeout_secs`, `token_env`)
//! - `[queue]`: retry ceiling for newly queued operations
//! - `[connectivity]`: how `punch watch` probes the network

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use punch_core::{QueueConfig, DEFAULT_MAX_RETRIES};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::env;
use crate::error::{Error, Result};

const CONFIG_FILE_NAME: &str = "config.toml";
const STATE_DIR_NAME: &str = "punch";

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub queue: QueueSection,
    pub connectivity: ConnectivityConfig,
}

/// Delivery endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; operations are POSTed to `<url>/attendance/<type>`.
    pub url: Option<String>,
    /// Upper bound on one delivery request, in seconds.
    pub timeout_secs: u64,
    /// Name of the environment variable holding the bearer token.
    pub token_env: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            url: None,
            timeout_secs: 30,
            token_env: env::vars::PUNCH_API_TOKEN.to_string(),
        }
    }
}

/// Queue settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSection {
    pub max_retries: u32,
}

impl Default for QueueSection {
    fn default() -> Self {
        QueueSection {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Connectivity probe settings for `punch watch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    /// `host:port` to probe. Derived from the API url when absent.
    pub probe: Option<String>,
    pub interval_ms: u64,
    pub timeout_ms: u64,
    /// Seconds between periodic drain passes while online. 0 disables them.
    pub sweep_secs: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        ConnectivityConfig {
            probe: None,
            interval_ms: 5_000,
            timeout_ms: 2_000,
            sweep_secs: 60,
        }
    }
}

impl Config {
    /// Loads `config.toml` from the state directory.
    ///
    /// A missing file yields the defaults.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let path = config_path(state_dir);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(Error::Config(format!("failed to read config: {}", e))),
        };
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {}", e)))
    }

    /// Applies environment overrides (`PUNCH_API_URL`).
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = env::api_url() {
            self.api.url = Some(url);
        }
        self
    }

    /// The validated API base url, if one is configured.
    pub fn api_url(&self) -> Result<Option<Url>> {
        self.api.url.as_deref().map(parse_api_url).transpose()
    }

    /// Bearer token from the configured environment variable.
    pub fn api_token(&self) -> Option<String> {
        env::api_token(&self.api.token_env)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Settings for the core queue.
    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            max_retries: self.queue.max_retries,
            call_timeout: self.request_timeout(),
            ..QueueConfig::default()
        }
    }

    /// Address the connectivity monitor probes.
    ///
    /// Uses `[connectivity] probe` when set, otherwise the API url's host and
    /// port (scheme default when the url has none).
    pub fn probe_address(&self) -> Result<Option<String>> {
        if let Some(probe) = &self.connectivity.probe {
            return validate_probe(probe).map(Some);
        }
        let Some(url) = self.api_url()? else {
            return Ok(None);
        };
        let host = url.host_str().ok_or_else(|| Error::InvalidUrl {
            url: url.to_string(),
            reason: "no host".into(),
        })?;
        let port = url.port_or_known_default().unwrap_or(80);
        Ok(Some(format!("{}:{}", host, port)))
    }
}

/// Path of `config.toml` inside a state directory.
pub fn config_path(state_dir: &Path) -> PathBuf {
    state_dir.join(CONFIG_FILE_NAME)
}

/// Resolves the state directory: `--state-dir`, then `PUNCH_STATE_DIR`, then
/// `$XDG_STATE_HOME/punch`, then `~/.local/state/punch`.
pub fn resolve_state_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    state_dir_from(flag, env::state_dir(), env::xdg_state_home(), dirs::home_dir())
}

pub(crate) fn state_dir_from(
    flag: Option<PathBuf>,
    env_dir: Option<PathBuf>,
    xdg_state: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = flag.or(env_dir) {
        return Ok(dir);
    }
    if let Some(dir) = xdg_state {
        return Ok(dir.join(STATE_DIR_NAME));
    }
    home.map(|h| h.join(".local/state").join(STATE_DIR_NAME))
        .ok_or(Error::NoStateDir)
}

fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| Error::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

fn validate_probe(probe: &str) -> Result<String> {
    let valid = probe
        .rsplit_once(':')
        .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
    if valid {
        Ok(probe.to_string())
    } else {
        Err(Error::InvalidProbe(probe.to_string()))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
