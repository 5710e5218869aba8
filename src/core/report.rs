//! Report generation business logic.
//!
//! Read-side projections over the ledger: monthly and yearly collection
//! totals, the arrears estimate, and status counts. Every function here is a
//! derived, side-effect-free query; nothing mutates state. Financial totals
//! count verified rows only unless a split by status is explicitly part of
//! the report.

use crate::{
    core::household::get_all_households,
    core::payment::PaymentStatus,
    entities::{Payment, household, payment},
    errors::Result,
};
use sea_orm::{QueryOrder, QuerySelect, prelude::*};
use std::collections::{BTreeMap, HashMap};

/// Billing periods per year.
const PERIODS_PER_YEAR: i64 = 12;

/// Collection totals for one month of a year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTotal {
    /// Month 1-12
    pub month: i32,
    /// Sum over all rows regardless of status
    pub total: i64,
    /// Number of payment rows
    pub count: usize,
    /// Sum over verified rows only
    pub verified_total: i64,
    /// Sum over pending rows only
    pub pending_total: i64,
}

/// Verified collection totals for one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearlyTotal {
    pub year: i32,
    /// Sum over verified rows
    pub total: i64,
    /// Number of verified rows
    pub count: usize,
}

/// Arrears estimate for one active household in a given year.
///
/// The amount is outstanding periods times the flat monthly due - an
/// approximation, since no per-household due amount is modeled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseholdArrears {
    pub household_id: i64,
    pub house_code: String,
    pub head_name: String,
    /// Periods of the year covered by a verified payment
    pub paid_periods: i64,
    /// Periods with no verified payment
    pub outstanding_periods: i64,
    /// `outstanding_periods * monthly_due`
    pub estimated_amount: i64,
}

/// Payment row counts per approval status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusDistribution {
    pub pending: u64,
    pub verified: u64,
    pub rejected: u64,
}

/// Per-month totals for `year`, ascending by month. Months with no payment
/// rows are omitted.
pub async fn monthly_totals(db: &DatabaseConnection, year: i32) -> Result<Vec<MonthlyTotal>> {
    let rows = Payment::find()
        .filter(payment::Column::Year.eq(year))
        .all(db)
        .await?;

    let mut by_month: BTreeMap<i32, MonthlyTotal> = BTreeMap::new();
    for row in rows {
        let entry = by_month.entry(row.month).or_insert(MonthlyTotal {
            month: row.month,
            total: 0,
            count: 0,
            verified_total: 0,
            pending_total: 0,
        });
        entry.total += row.amount;
        entry.count += 1;
        if row.status == PaymentStatus::Verified.as_str() {
            entry.verified_total += row.amount;
        } else if row.status == PaymentStatus::Pending.as_str() {
            entry.pending_total += row.amount;
        }
    }

    Ok(by_month.into_values().collect())
}

/// Per-year verified totals, most recent year first.
pub async fn yearly_totals(db: &DatabaseConnection) -> Result<Vec<YearlyTotal>> {
    let rows = Payment::find()
        .filter(payment::Column::Status.eq(PaymentStatus::Verified.as_str()))
        .all(db)
        .await?;

    let mut by_year: BTreeMap<i32, YearlyTotal> = BTreeMap::new();
    for row in rows {
        let entry = by_year.entry(row.year).or_insert(YearlyTotal {
            year: row.year,
            total: 0,
            count: 0,
        });
        entry.total += row.amount;
        entry.count += 1;
    }

    Ok(by_year.into_values().rev().collect())
}

/// Arrears estimate for every active household in `year`, worst first.
///
/// A household's expected periods are the twelve months of the year; each
/// verified payment covers one. The uniqueness rule on (household, month,
/// year) guarantees the verified count never exceeds twelve.
pub async fn arrears(
    db: &DatabaseConnection,
    year: i32,
    monthly_due: i64,
) -> Result<Vec<HouseholdArrears>> {
    let households = get_all_households(db, true).await?;
    let verified = Payment::find()
        .filter(payment::Column::Year.eq(year))
        .filter(payment::Column::Status.eq(PaymentStatus::Verified.as_str()))
        .all(db)
        .await?;

    let mut paid_by_household: HashMap<i64, i64> = HashMap::new();
    for row in verified {
        *paid_by_household.entry(row.household_id).or_insert(0) += 1;
    }

    let mut result: Vec<HouseholdArrears> = households
        .into_iter()
        .map(|h| arrears_for_household(&h, &paid_by_household, monthly_due))
        .collect();
    result.sort_by(|a, b| {
        b.outstanding_periods
            .cmp(&a.outstanding_periods)
            .then_with(|| a.house_code.cmp(&b.house_code))
    });
    Ok(result)
}

fn arrears_for_household(
    household: &household::Model,
    paid_by_household: &HashMap<i64, i64>,
    monthly_due: i64,
) -> HouseholdArrears {
    let paid = paid_by_household.get(&household.id).copied().unwrap_or(0);
    let outstanding = PERIODS_PER_YEAR - paid;
    HouseholdArrears {
        household_id: household.id,
        house_code: household.house_code.clone(),
        head_name: household.head_name.clone(),
        paid_periods: paid,
        outstanding_periods: outstanding,
        estimated_amount: outstanding * monthly_due,
    }
}

/// Row counts per payment status, over all years.
pub async fn status_distribution(db: &DatabaseConnection) -> Result<StatusDistribution> {
    let mut distribution = StatusDistribution::default();
    for (status, slot) in [
        (PaymentStatus::Pending, &mut distribution.pending),
        (PaymentStatus::Verified, &mut distribution.verified),
        (PaymentStatus::Rejected, &mut distribution.rejected),
    ] {
        *slot = Payment::find()
            .filter(payment::Column::Status.eq(status.as_str()))
            .count(db)
            .await?;
    }
    Ok(distribution)
}

/// Newest pending payments, capped at `limit`. Feeds the dashboard's review
/// reminder.
pub async fn recent_pending(db: &DatabaseConnection, limit: u64) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::Status.eq(PaymentStatus::Pending.as_str()))
        .order_by_desc(payment::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}
