//! Configuration management
//!
//! Settings live in `settings.json` inside the coinport directory:
//! ```json
//! {
//!   "apiUrl": "http://localhost:3000",
//!   "environment": "development",
//!   "frontendOrigin": "http://localhost:3001",
//!   "pollIntervalSecs": 30,
//!   "requestTimeoutSecs": 30
//! }
//! ```
//! Only values changed through the setters are written on save; env
//! overrides and defaults never reach the file, and unmanaged keys are kept.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::result::{Error, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3001";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding `apiUrl`
pub const API_URL_ENV: &str = "COINPORT_API_URL";
/// Environment variable overriding `environment`
pub const ENVIRONMENT_ENV: &str = "COINPORT_ENV";

const SETTINGS_FILE: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frontend_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    poll_interval_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_timeout_secs: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Coinport configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub environment: String,
    pub frontend_origin: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    /// Values set through this handle, pending `save`
    edits: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            environment: "development".to_string(),
            frontend_origin: DEFAULT_FRONTEND_ORIGIN.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            edits: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the coinport directory
    ///
    /// Precedence: environment variable > settings.json > default.
    pub fn load(coinport_dir: &Path) -> Result<Self> {
        let raw = read_settings(&coinport_dir.join(SETTINGS_FILE))?;
        let defaults = Config::default();

        let api_url = env_override(API_URL_ENV)
            .or(raw.api_url)
            .unwrap_or(defaults.api_url);
        let environment = env_override(ENVIRONMENT_ENV)
            .or(raw.environment)
            .unwrap_or(defaults.environment);

        let config = Self {
            api_url: normalize_url(&api_url)?,
            environment,
            frontend_origin: raw
                .frontend_origin
                .map(|origin| normalize_url(&origin))
                .transpose()?
                .unwrap_or(defaults.frontend_origin),
            poll_interval: raw
                .poll_interval_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            request_timeout: raw
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            edits: SettingsFile::default(),
        };

        tracing::debug!(api_url = %config.api_url, environment = %config.environment, "configuration loaded");
        Ok(config)
    }

    /// Write the edited values into settings.json, leaving everything else as is
    pub fn save(&self, coinport_dir: &Path) -> Result<()> {
        let settings_path = coinport_dir.join(SETTINGS_FILE);
        let mut settings = read_settings(&settings_path)?;

        let edits = self.edits.clone();
        settings.api_url = edits.api_url.or(settings.api_url);
        settings.environment = edits.environment.or(settings.environment);
        settings.frontend_origin = edits.frontend_origin.or(settings.frontend_origin);
        settings.poll_interval_secs = edits.poll_interval_secs.or(settings.poll_interval_secs);
        settings.request_timeout_secs = edits
            .request_timeout_secs
            .or(settings.request_timeout_secs);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Point the client at another backend
    pub fn set_api_url(&mut self, api_url: &str) -> Result<()> {
        self.api_url = normalize_url(api_url)?;
        self.edits.api_url = Some(self.api_url.clone());
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn read_settings(path: &Path) -> Result<SettingsFile> {
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(path)?;
    // A corrupt settings file falls back to defaults rather than blocking the CLI
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Validate an http(s) URL and strip the trailing slash
fn normalize_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw.trim())
        .map_err(|e| Error::config(format!("Invalid URL '{}': {}", raw, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::config(format!(
            "Unsupported URL scheme '{}' in '{}'",
            parsed.scheme(),
            raw
        )));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
