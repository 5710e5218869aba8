//! Shared test utilities for the ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities and sessions with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{expenditure, household, payment, user},
    entities,
    errors::Result,
    session::Session,
};
use sea_orm::DatabaseConnection;
use sea_orm::prelude::Date;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A fixed calendar date for deterministic rows.
pub fn test_date() -> Date {
    Date::from_ymd_opt(2026, 1, 15).unwrap()
}

/// An admin session (user id 1). Sessions are plain context objects, so tests
/// construct them directly instead of going through login.
pub fn admin_session() -> Session {
    Session {
        user_id: 1,
        username: "admin".to_string(),
        display_name: "Super Admin".to_string(),
        role: "admin".to_string(),
    }
}

/// A regular user session (user id 2).
pub fn user_session() -> Session {
    Session {
        user_id: 2,
        username: "warga".to_string(),
        display_name: "Warga Test".to_string(),
        role: "user".to_string(),
    }
}

/// Household input with sensible defaults.
///
/// # Defaults
/// * `head_name`: "Test Head"
/// * `member_count`: 3
/// * `phone`/`email`: None
/// * `status`: "active"
pub fn test_household_input(house_code: &str) -> household::HouseholdInput {
    household::HouseholdInput {
        house_code: house_code.to_string(),
        head_name: "Test Head".to_string(),
        member_count: 3,
        phone: None,
        email: None,
        joined_on: test_date(),
        status: "active".to_string(),
    }
}

/// Creates a test household with sensible defaults.
pub async fn create_test_household(
    db: &DatabaseConnection,
    house_code: &str,
) -> Result<entities::household::Model> {
    household::create_household(db, &admin_session(), test_household_input(house_code)).await
}

/// Payment input with sensible defaults.
///
/// # Defaults
/// * `amount`: 100000
/// * `method`: "transfer"
/// * `reference`: "TRX-001"
/// * `note`: empty
/// * `requested_status`: pending
pub fn test_payment_input(household_id: i64, month: i32, year: i32) -> payment::NewPayment {
    payment::NewPayment {
        household_id,
        month,
        year,
        amount: 100_000,
        paid_on: test_date(),
        method: "transfer".to_string(),
        reference: "TRX-001".to_string(),
        note: String::new(),
        requested_status: payment::PaymentStatus::Pending,
    }
}

/// Creates a test user with password "rahasia" and the given role.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    role: &str,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        &admin_session(),
        user::NewUser {
            username: username.to_string(),
            password: "rahasia".to_string(),
            display_name: format!("User {username}"),
            role: role.to_string(),
        },
    )
    .await
}

/// Expenditure input with sensible defaults.
pub fn test_expenditure_input(
    category: expenditure::ExpenseCategory,
    amount: i64,
) -> expenditure::NewExpenditure {
    expenditure::NewExpenditure {
        category,
        description: "Test expenditure".to_string(),
        amount,
        spent_on: test_date(),
        reference: Some("KW-001".to_string()),
    }
}

/// Sets up a complete test environment with a household.
/// Returns (db, household) for common test scenarios.
pub async fn setup_with_household() -> Result<(DatabaseConnection, entities::household::Model)> {
    let db = setup_test_db().await?;
    let household = create_test_household(&db, "A-01").await?;
    Ok((db, household))
}
