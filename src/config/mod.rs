/// Database configuration and connection management
pub mod database;

/// Ledger settings from environment variables and config.toml
pub mod settings;
