//! Unified error types for the ledger.
//!
//! Every component-boundary failure is converted into this enum; store-level
//! errors never escape as raw `DbErr` except through the `Database` variant.
//! A failed operation leaves prior state unchanged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A payment row already exists for this (household, month, year).
    #[error("a payment for period {month}/{year} already exists for this household")]
    DuplicatePeriod { month: i32, year: i32 },

    /// House code collision on household creation or update.
    #[error("house code '{code}' is already registered")]
    DuplicateHouseCode { code: String },

    /// Username collision on user creation or update.
    #[error("username '{username}' is already taken")]
    DuplicateUsername { username: String },

    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: i64 },

    /// Billing month outside 1-12.
    #[error("invalid month: {month}")]
    InvalidMonth { month: i32 },

    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Attempted to move a payment between terminal statuses.
    #[error("payment {id} is already {status}; terminal statuses cannot be changed")]
    InvalidTransition { id: i64, status: String },

    #[error("household {id} not found")]
    HouseholdNotFound { id: i64 },

    #[error("payment {id} not found")]
    PaymentNotFound { id: i64 },

    #[error("expenditure {id} not found")]
    ExpenditureNotFound { id: i64 },

    #[error("user {id} not found")]
    UserNotFound { id: i64 },

    #[error("change request {id} not found")]
    ChangeNotFound { id: i64 },

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("account is disabled")]
    AccountDisabled,

    /// Write-capable operation attempted without the admin role.
    #[error("operation requires the admin role")]
    AdminRequired,

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
