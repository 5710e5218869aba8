//! User entity - Account records with two privilege tiers.
//!
//! Role is `"admin"` or `"user"`; status is `"active"` or `"inactive"`.
//! Passwords are stored in clear text, matching the system this schema
//! models. See DESIGN.md.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique login name
    #[sea_orm(unique)]
    pub username: String,
    /// Clear-text password
    pub password: String,
    /// Display name shown in the UI
    pub display_name: String,
    /// Privilege tier: `"admin"` or `"user"`
    pub role: String,
    /// Account status: `"active"` or `"inactive"`
    pub status: String,
    /// When this row was created
    pub created_at: DateTimeUtc,
}

/// Users have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
