//! Household entity - Represents a residential unit tracked for monthly dues.
//!
//! Each household has a unique `house_code`, a head-of-household name, member
//! count, optional contact fields, a join date, and an active/inactive status.
//! Deleting a household cascades to its payment rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Household database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "households")]
pub struct Model {
    /// Unique identifier for the household
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique house number/code (e.g., "A-01")
    #[sea_orm(unique)]
    pub house_code: String,
    /// Name of the head of household
    pub head_name: String,
    /// Number of household members
    pub member_count: i32,
    /// Contact phone number, if known
    pub phone: Option<String>,
    /// Contact email address, if known
    pub email: Option<String>,
    /// Date the household joined the community
    pub joined_on: Date,
    /// Household status: `"active"` or `"inactive"`
    pub status: String,
    /// When this row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Household and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One household has many monthly payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
