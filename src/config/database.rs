//! Database configuration module for the ledger.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary
//! tables based on the entity definitions. The module uses `SeaORM`'s
//! `Schema::create_table_from_entity` method to automatically generate SQL statements from
//! the entity models, ensuring that the database schema matches the Rust struct definitions
//! without requiring manual SQL. The composite uniqueness rule on
//! (`household_id`, `month`, `year`) is created here as a separate unique index, since it
//! spans multiple columns and cannot be expressed on a single entity field.

use crate::entities::{Expenditure, Household, Payment, PendingChange, User, payment, user};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait,
    Schema, Set,
};

/// Establishes a connection to the database at `url`.
///
/// # Errors
/// Returns the underlying connection error wrapped in [`crate::errors::Error`].
pub async fn create_connection(url: &str) -> Result<DatabaseConnection> {
    Database::connect(url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from
/// entity definitions, plus the composite unique index on payments.
///
/// Foreign keys (household -> payment with cascade delete) come from the entity
/// relation definitions. The unique index enforces at most one payment row per
/// (household, month, year); a second insert for the same triple fails at the
/// store level and is surfaced by the payment component as a duplicate-period
/// error.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let household_table = schema.create_table_from_entity(Household);
    let payment_table = schema.create_table_from_entity(Payment);
    let expenditure_table = schema.create_table_from_entity(Expenditure);
    let user_table = schema.create_table_from_entity(User);
    let pending_change_table = schema.create_table_from_entity(PendingChange);

    db.execute(builder.build(&household_table)).await?;
    db.execute(builder.build(&payment_table)).await?;
    db.execute(builder.build(&expenditure_table)).await?;
    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&pending_change_table)).await?;

    let period_index = Index::create()
        .name("idx_payments_household_period")
        .table(payment::Entity)
        .col(payment::Column::HouseholdId)
        .col(payment::Column::Month)
        .col(payment::Column::Year)
        .unique()
        .to_owned();
    db.execute(builder.build(&period_index)).await?;

    Ok(())
}

/// Inserts the bootstrap administrator account when the users table is empty.
///
/// Returns true when an account was created. Subsequent runs find the existing
/// account and do nothing, so the bootstrap stays idempotent across restarts.
pub async fn seed_default_admin(db: &DatabaseConnection) -> Result<bool> {
    let existing = User::find().count(db).await?;
    if existing > 0 {
        return Ok(false);
    }

    let admin = user::ActiveModel {
        username: Set("admin".to_string()),
        password: Set("admin123".to_string()),
        display_name: Set("Super Admin".to_string()),
        role: Set("admin".to_string()),
        status: Set("active".to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    admin.insert(db).await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        expenditure::Model as ExpenditureModel, household::Model as HouseholdModel,
        payment::Model as PaymentModel, pending_change::Model as PendingChangeModel,
        user::Model as UserModel,
    };
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<HouseholdModel> = Household::find().limit(1).all(&db).await?;
        let _: Vec<PaymentModel> = Payment::find().limit(1).all(&db).await?;
        let _: Vec<ExpenditureModel> = Expenditure::find().limit(1).all(&db).await?;
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<PendingChangeModel> = PendingChange::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_default_admin_once() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        assert!(seed_default_admin(&db).await?);
        // Second run finds the existing account and does nothing.
        assert!(!seed_default_admin(&db).await?);

        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "admin");
        assert_eq!(users[0].role, "admin");

        Ok(())
    }
}
