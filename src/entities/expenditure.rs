//! Expenditure entity - Represents money spent from the community fund.
//!
//! Expenditures are created and deleted freely by admins; there is no
//! approval workflow. The `category` field is restricted to the closed set in
//! [`crate::core::expenditure::ExpenseCategory`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expenditure database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenditures")]
pub struct Model {
    /// Unique identifier for the expenditure
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Expense category (e.g., `"cleaning"`, `"security"`)
    pub category: String,
    /// What the money was spent on
    pub description: String,
    /// Amount in whole currency units
    pub amount: i64,
    /// Date of the expense
    pub spent_on: Date,
    /// Receipt/reference string, if any
    pub reference: Option<String>,
    /// User id of the approving admin
    pub approved_by: Option<i64>,
    /// When this row was created
    pub created_at: DateTimeUtc,
}

/// Expenditures have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
