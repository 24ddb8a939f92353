// src/models/mod.rs

//! Domain models for the watcher application.

mod config;
mod outcome;
mod record;

// Re-export all public types
pub use config::{Config, GmailSecrets, NotifyConfig, PathsConfig, Secrets, TelegramSecrets, WatchConfig};
pub use outcome::{Notification, ScrapeOutcome};
pub use record::AppointmentRecord;
