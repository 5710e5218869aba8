//! Expenditure business logic.
//!
//! Money spent from the community fund. Admins create and delete rows freely;
//! there is no approval workflow for expenditures. Categories are a closed
//! set so reports can group reliably.

use crate::{
    entities::{Expenditure, expenditure},
    errors::{Error, Result},
    session::Session,
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::BTreeMap;
use tracing::info;

/// Closed set of community expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExpenseCategory {
    Cleaning,
    Security,
    Maintenance,
    Administration,
    Electricity,
    Water,
    Supplies,
    Other,
}

impl ExpenseCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 8] = [
        Self::Cleaning,
        Self::Security,
        Self::Maintenance,
        Self::Administration,
        Self::Electricity,
        Self::Water,
        Self::Supplies,
        Self::Other,
    ];

    /// The category string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cleaning => "cleaning",
            Self::Security => "security",
            Self::Maintenance => "maintenance",
            Self::Administration => "administration",
            Self::Electricity => "electricity",
            Self::Water => "water",
            Self::Supplies => "supplies",
            Self::Other => "other",
        }
    }

    /// Parses a stored category string.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw)
    }
}

/// Input for recording an expenditure.
#[derive(Debug, Clone)]
pub struct NewExpenditure {
    pub category: ExpenseCategory,
    pub description: String,
    /// Amount in whole currency units, must be positive
    pub amount: i64,
    pub spent_on: Date,
    /// Receipt/reference string, if any
    pub reference: Option<String>,
}

/// Records an expenditure, stamped with the acting admin as approver.
/// Admin only.
pub async fn add_expenditure(
    db: &DatabaseConnection,
    session: &Session,
    input: NewExpenditure,
) -> Result<expenditure::Model> {
    session.require_admin()?;

    if input.amount <= 0 {
        return Err(Error::InvalidAmount {
            amount: input.amount,
        });
    }
    if input.description.trim().is_empty() {
        return Err(Error::Validation {
            message: "expenditure description cannot be empty".to_string(),
        });
    }

    let model = expenditure::ActiveModel {
        category: Set(input.category.as_str().to_string()),
        description: Set(input.description.trim().to_string()),
        amount: Set(input.amount),
        spent_on: Set(input.spent_on),
        reference: Set(input.reference),
        approved_by: Set(Some(session.user_id)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!(
        expenditure_id = created.id,
        category = %created.category,
        amount = created.amount,
        "recorded expenditure"
    );
    Ok(created)
}

/// Deletes an expenditure by id. Admin only.
///
/// # Errors
/// `ExpenditureNotFound` for an unknown id.
pub async fn delete_expenditure(
    db: &DatabaseConnection,
    session: &Session,
    expenditure_id: i64,
) -> Result<()> {
    session.require_admin()?;

    let result = Expenditure::delete_by_id(expenditure_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ExpenditureNotFound { id: expenditure_id });
    }
    Ok(())
}

/// Expenditures newest first, optionally restricted to one category.
pub async fn list_expenditures(
    db: &DatabaseConnection,
    category: Option<ExpenseCategory>,
) -> Result<Vec<expenditure::Model>> {
    let mut query = Expenditure::find().order_by_desc(expenditure::Column::SpentOn);
    if let Some(category) = category {
        query = query.filter(expenditure::Column::Category.eq(category.as_str()));
    }
    query.all(db).await.map_err(Into::into)
}

/// Total spent per category, over all time. Categories with no rows are
/// omitted.
pub async fn category_totals(
    db: &DatabaseConnection,
) -> Result<BTreeMap<ExpenseCategory, i64>> {
    let rows = Expenditure::find().all(db).await?;

    let mut totals = BTreeMap::new();
    for row in rows {
        // Unrecognized category strings can only come from out-of-band edits;
        // fold them into Other rather than failing the report.
        let category = ExpenseCategory::parse(&row.category).unwrap_or(ExpenseCategory::Other);
        *totals.entry(category).or_insert(0) += row.amount;
    }
    Ok(totals)
}
