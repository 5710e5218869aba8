//! Ledger settings loaded from the environment and an optional TOML file.
//!
//! `DATABASE_URL`, `MONTHLY_DUE`, and `CACHE_TTL_SECS` may be set in the
//! environment (usually via `.env`). A `config.toml` next to the binary can
//! provide the same values; environment variables win when both are present.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default flat monthly due per household, in whole currency units.
pub const DEFAULT_MONTHLY_DUE: i64 = 100_000;

/// Default read-cache time box in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Resolved application settings.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Database connection URL
    pub database_url: String,
    /// Flat assumed monthly due used by the arrears report
    pub monthly_due: i64,
    /// Read-cache time box in seconds
    pub cache_ttl_secs: u64,
}

/// Optional `config.toml` contents.
#[derive(Debug, Deserialize, Default)]
struct FileSettings {
    database_url: Option<String>,
    monthly_due: Option<i64>,
    cache_ttl_secs: Option<u64>,
}

/// Loads settings from `config.toml` (if present at `path`) and the
/// environment. Environment variables take precedence over file values.
///
/// # Errors
/// Returns `Error::Config` when the file exists but cannot be read or parsed,
/// or when a numeric override fails to parse.
pub fn load_settings(path: impl AsRef<Path>) -> Result<AppSettings> {
    let file = load_file_settings(path.as_ref())?;

    let database_url = std::env::var("DATABASE_URL")
        .ok()
        .or(file.database_url)
        .unwrap_or_else(|| "sqlite://data/ledger.sqlite?mode=rwc".to_string());

    let monthly_due = match std::env::var("MONTHLY_DUE") {
        Ok(raw) => raw.parse().map_err(|_| Error::Config {
            message: format!("MONTHLY_DUE is not a valid integer: {raw}"),
        })?,
        Err(_) => file.monthly_due.unwrap_or(DEFAULT_MONTHLY_DUE),
    };

    let cache_ttl_secs = match std::env::var("CACHE_TTL_SECS") {
        Ok(raw) => raw.parse().map_err(|_| Error::Config {
            message: format!("CACHE_TTL_SECS is not a valid integer: {raw}"),
        })?,
        Err(_) => file.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS),
    };

    if monthly_due <= 0 {
        return Err(Error::Config {
            message: format!("monthly due must be positive, got {monthly_due}"),
        });
    }

    Ok(AppSettings {
        database_url,
        monthly_due,
        cache_ttl_secs,
    })
}

fn load_file_settings(path: &Path) -> Result<FileSettings> {
    if !path.exists() {
        return Ok(FileSettings::default());
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("failed to parse {}: {e}", path.display()),
    })
}
