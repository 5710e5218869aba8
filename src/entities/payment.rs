//! Payment entity - Represents one monthly dues payment for a household.
//!
//! Each payment targets a billing period (month 1-12 plus year) and carries an
//! approval status: `"pending"`, `"verified"`, or `"rejected"`. At most one row
//! may exist per (household, month, year); the composite unique index is
//! created in [`crate::config::database::create_tables`]. Verified rows carry
//! the verifier id and timestamp; rejected rows keep the status only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the household this payment belongs to
    pub household_id: i64,
    /// Billing month, 1 through 12
    pub month: i32,
    /// Billing year
    pub year: i32,
    /// Amount in whole currency units
    pub amount: i64,
    /// Date the payment was made
    pub paid_on: Date,
    /// Payment method (e.g., "transfer", "cash")
    pub method: String,
    /// Proof/reference string for the payment
    pub reference: String,
    /// Approval status: `"pending"`, `"verified"`, or `"rejected"`
    pub status: String,
    /// Free-text note
    pub note: String,
    /// User id of the verifying admin, set only on verification
    pub verified_by: Option<i64>,
    /// When the payment was verified, set only on verification
    pub verified_at: Option<DateTimeUtc>,
    /// When this row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Payment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one household; household deletion cascades
    #[sea_orm(
        belongs_to = "super::household::Entity",
        from = "Column::HouseholdId",
        to = "super::household::Column::Id",
        on_delete = "Cascade"
    )]
    Household,
}

impl Related<super::household::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Household.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
