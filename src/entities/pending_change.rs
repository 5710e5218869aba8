//! Pending change entity - Audit/approval envelope for proposed mutations.
//!
//! A pending change records a proposed insert, update, or delete against a
//! household, payment, or user row without applying it. `old_data` and
//! `new_data` hold the JSON-serialized [`crate::core::change::ChangePayload`]
//! for the before and after state. Admin review stamps `reviewed_by` and
//! `review_date`; approval does not replay the payload onto the target table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Pending change database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pending_changes")]
pub struct Model {
    /// Unique identifier for the change request
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Target entity kind: `"household"`, `"payment"`, or `"user"`
    pub target: String,
    /// Id of the targeted row; None for proposed inserts
    pub record_id: Option<i64>,
    /// Proposed action: `"insert"`, `"update"`, or `"delete"`
    pub action: String,
    /// JSON-serialized before-state; None for inserts
    pub old_data: Option<String>,
    /// JSON-serialized after-state; None for deletes
    pub new_data: Option<String>,
    /// User id of the requester
    pub requested_by: i64,
    /// Review status: `"pending"`, `"approved"`, or `"rejected"`
    pub status: String,
    /// User id of the reviewing admin, set on resolution
    pub reviewed_by: Option<i64>,
    /// When the change was resolved
    pub review_date: Option<DateTimeUtc>,
    /// When this row was created
    pub created_at: DateTimeUtc,
}

/// Pending changes reference other rows only by id and kind
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
