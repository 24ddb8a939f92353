// src/error.rs

//! Unified error handling for the watcher application.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Page fetch failed after exhausting retries
    #[error("Fetch failed after retries: {reason}")]
    Transport {
        status: Option<u16>,
        reason: String,
        raw: String,
    },

    /// No table row matched the target service pattern
    #[error("No row for the target service found at {url} ({body_len} bytes fetched)")]
    RowNotFound { url: String, body_len: usize },

    /// Matched row does not have the expected cell layout
    #[error("Row data is not as expected: {row_text}")]
    RowShape { row_text: String },

    /// Request cell of the matched row carries no link
    #[error("Row has no request link: {row_text}")]
    MissingLink { row_text: String },

    /// A notification channel failed to send
    #[error("Channel '{channel}' error: {message}")]
    Channel { channel: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a channel send error.
    pub fn channel(channel: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Channel {
            channel: channel.into(),
            message: message.to_string(),
        }
    }

    /// Raw diagnostic context carried by scrape errors, for inclusion in
    /// error notifications without re-fetching the page.
    pub fn raw_context(&self) -> String {
        match self {
            Self::Transport { status, raw, .. } => match status {
                Some(code) => format!("last status: {code}\nlast body:\n{raw}"),
                None => raw.clone(),
            },
            Self::RowNotFound { url, body_len } => {
                format!("fetched {body_len} bytes from {url}, no matching row")
            }
            Self::RowShape { row_text } | Self::MissingLink { row_text } => row_text.clone(),
            other => other.to_string(),
        }
    }
}
