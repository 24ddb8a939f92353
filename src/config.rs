// src/config.rs

//! Configuration loading utilities.
//!
//! Convenience functions for loading the application config and the
//! channel secrets from their TOML files.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{Config, Secrets};

/// Load configuration from a TOML file.
///
/// Falls back to defaults if loading fails; validation still runs on the
/// result so an unusable default set is caught before any network work.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load_or_default(path);
    config.validate()?;
    Ok(config)
}

/// Load channel secrets from a TOML file. Secrets never fall back to
/// defaults; a missing or incomplete file is an error.
pub fn load_secrets(path: &Path) -> Result<Secrets> {
    let secrets = Secrets::load(path)?;
    secrets
        .validate()
        .map_err(|e| AppError::config(format!("Invalid secrets in {path:?}: {e}")))?;
    Ok(secrets)
}

/// Load and validate both config and secrets.
pub fn load_all(config_path: &Path, secrets_path: &Path) -> Result<(Config, Secrets)> {
    let config = load_config(config_path)?;
    let secrets = load_secrets(secrets_path)?;
    Ok((config, secrets))
}
