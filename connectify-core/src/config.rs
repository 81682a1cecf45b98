use anyhow::{Context, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use crate::{
    error::{ConnectifyError, Result},
    model::Units,
    retry::{DEFAULT_BACKOFF_BASE, DEFAULT_RETRIES, RetryPolicy},
};

pub const API_KEY_ENV: &str = "CONNECTIFY_OPENWEATHER_API_KEY";
pub const TIMEOUT_ENV: &str = "CONNECTIFY_TIMEOUT";
pub const RETRIES_ENV: &str = "CONNECTIFY_RETRIES";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Immutable per-client configuration.
///
/// Resolution order for every value: explicit argument, `CONNECTIFY_*` environment
/// variable, [`Settings`] file, built-in default.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    timeout: Duration,
    retry: RetryPolicy,
    base_url: String,
}

impl ClientConfig {
    /// Configuration with an explicit key and default timeout/retries.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = non_empty(Some(api_key.into())).ok_or_else(missing_api_key)?;
        Ok(Self {
            api_key,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            base_url: OPENWEATHER_URL.to_string(),
        })
    }

    /// Resolve from an optional explicit key and the process environment.
    pub fn resolve(explicit_key: Option<&str>) -> Result<Self> {
        Self::resolve_with_settings(explicit_key, &Settings::default())
    }

    /// Like [`resolve`](Self::resolve), falling back to a loaded settings file.
    pub fn resolve_with_settings(explicit_key: Option<&str>, settings: &Settings) -> Result<Self> {
        Self::from_sources(explicit_key, settings, |name| env::var(name).ok())
    }

    fn from_sources<E>(explicit_key: Option<&str>, settings: &Settings, env: E) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let api_key = non_empty(explicit_key.map(str::to_owned))
            .or_else(|| non_empty(env(API_KEY_ENV)))
            .or_else(|| non_empty(settings.api_key.clone()))
            .ok_or_else(missing_api_key)?;

        let timeout = match parse_env::<u64>(&env, TIMEOUT_ENV)? {
            Some(secs) => Duration::from_secs(secs),
            None => settings.timeout_secs.map_or(DEFAULT_TIMEOUT, Duration::from_secs),
        };
        let retries = parse_env::<u32>(&env, RETRIES_ENV)?
            .or(settings.retries)
            .unwrap_or(DEFAULT_RETRIES);

        Ok(Self {
            api_key,
            timeout,
            retry: RetryPolicy::new(retries, DEFAULT_BACKOFF_BASE),
            base_url: OPENWEATHER_URL.to_string(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retry.retries = retries;
        self
    }

    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.retry.backoff_base = backoff_base;
        self
    }

    /// Point the client at another endpoint, e.g. a proxy or a local test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retries(&self) -> u32 {
        self.retry.retries
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// Keeps the key out of logs and panic messages.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn missing_api_key() -> ConnectifyError {
    ConnectifyError::new(format!(
        "OpenWeather API key not provided. Set env var {API_KEY_ENV}, \
         run `connectify configure`, or pass an API key explicitly"
    ))
}

fn parse_env<T>(env: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ConnectifyError::new(format!("invalid value for {name} ('{raw}'): {e}"))),
    }
}

/// Optional defaults stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// lang = "en"
/// timeout_secs = 10
/// retries = 2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

impl Settings {
    /// Load settings from the platform config dir, or defaults if the file doesn't exist yet.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save settings to the platform config dir, creating parent directories as needed.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    pub fn config_file_path() -> anyhow::Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "connectify", "connectify")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
