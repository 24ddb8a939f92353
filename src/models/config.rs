//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Target page and fetch behavior settings
    #[serde(default)]
    pub watch: WatchConfig,

    /// Notification channel settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Filesystem paths
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if !self.watch.base_url.starts_with("http") {
            return Err(AppError::validation("watch.base_url must be an http(s) URL"));
        }
        if !self.watch.dates_path.starts_with('/') {
            return Err(AppError::validation("watch.dates_path must start with '/'"));
        }
        if self.watch.user_agent.trim().is_empty() {
            return Err(AppError::validation("watch.user_agent is empty"));
        }
        if self.watch.timeout_secs == 0 {
            return Err(AppError::validation("watch.timeout_secs must be > 0"));
        }
        if self.notify.email_to.trim().is_empty() {
            return Err(AppError::validation("notify.email_to is empty"));
        }
        if self.notify.email_from.trim().is_empty() {
            return Err(AppError::validation("notify.email_from is empty"));
        }
        if self.paths.state_file.as_os_str().is_empty() {
            return Err(AppError::validation("paths.state_file is empty"));
        }
        Ok(())
    }
}

/// Target page and fetch behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Site base URL
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Path of the appointment-openings page
    #[serde(default = "defaults::dates_path")]
    pub dates_path: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds, per attempt
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Retries after the first failed attempt
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Fixed wait between attempts in seconds
    #[serde(default = "defaults::retry_backoff")]
    pub retry_backoff_secs: u64,
}

impl WatchConfig {
    /// Full URL of the appointment-openings page.
    pub fn dates_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.dates_path)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            dates_path: defaults::dates_path(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_retries: defaults::max_retries(),
            retry_backoff_secs: defaults::retry_backoff(),
        }
    }
}

/// Notification channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Recipient address for the email channel
    #[serde(default)]
    pub email_to: String,

    /// Sender address for the email channel
    #[serde(default)]
    pub email_from: String,

    /// Deliver Telegram messages without a client-side alert sound
    #[serde(default = "defaults::telegram_silent")]
    pub telegram_silent: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            email_to: String::new(),
            email_from: String::new(),
            telegram_silent: defaults::telegram_silent(),
        }
    }
}

/// Filesystem paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Location of the last-observed-record state file
    #[serde(default = "defaults::state_file")]
    pub state_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_file: defaults::state_file(),
        }
    }
}

/// Channel credentials, kept in a separate TOML file outside the repo.
///
/// Unlike [`Config`], secrets have no usable defaults and must load cleanly.
#[derive(Debug, Clone, Deserialize)]
pub struct Secrets {
    pub gmail: GmailSecrets,
    pub telegram: TelegramSecrets,
}

/// Gmail API credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct GmailSecrets {
    /// OAuth bearer token, provisioned and refreshed externally
    pub access_token: String,
}

/// Telegram bot credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSecrets {
    /// Bot token from BotFather
    pub token: String,

    /// Target chat id the bot posts into
    pub chat_id: String,
}

impl Secrets {
    /// Load secrets from a TOML file. No default fallback.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            AppError::config(format!(
                "Cannot read secrets file {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Check that every credential is present and non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.gmail.access_token.trim().is_empty() {
            return Err(AppError::validation("gmail.access_token is empty"));
        }
        if self.telegram.token.trim().is_empty() {
            return Err(AppError::validation("telegram.token is empty"));
        }
        if self.telegram.chat_id.trim().is_empty() {
            return Err(AppError::validation("telegram.chat_id is empty"));
        }
        Ok(())
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn base_url() -> String {
        "https://www.cgeonline.com.ar".into()
    }
    pub fn dates_path() -> String {
        "/informacion/apertura-de-citas.html".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; citawatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn max_retries() -> u32 {
        5
    }
    pub fn retry_backoff() -> u64 {
        30
    }
    pub fn telegram_silent() -> bool {
        true
    }
    pub fn state_file() -> PathBuf {
        PathBuf::from("data/last_record.json")
    }
}
