//! Payment lifecycle business logic.
//!
//! This module accepts new payment submissions and drives the approval state
//! machine: `pending` -> `verified` or `rejected`, both terminal. Self-service
//! submissions always land as `pending`; an admin may record a payment
//! directly as `verified`, which stamps the verifier id and timestamp at
//! creation time. The store enforces at most one payment row per
//! (household, month, year); a second submission for the same triple surfaces
//! as [`Error::DuplicatePeriod`] and leaves the original row untouched.

use crate::{
    entities::{Household, Payment, household, payment},
    errors::{Error, Result},
    session::Session,
};
use sea_orm::{QueryOrder, Set, SqlErr, prelude::*};
use tracing::info;

/// Payment approval states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// Awaiting admin review (initial state for self-service submissions)
    Pending,
    /// Confirmed by an admin; terminal
    Verified,
    /// Declined by an admin; terminal
    Rejected,
}

impl PaymentStatus {
    /// The status string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an admin review action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentVerdict {
    /// Accept the payment
    Verified,
    /// Decline the payment
    Rejected,
}

impl PaymentVerdict {
    const fn status(self) -> PaymentStatus {
        match self {
            Self::Verified => PaymentStatus::Verified,
            Self::Rejected => PaymentStatus::Rejected,
        }
    }
}

/// Input for a payment submission.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Household the payment is for
    pub household_id: i64,
    /// Billing month, 1 through 12
    pub month: i32,
    /// Billing year
    pub year: i32,
    /// Amount in whole currency units, must be positive
    pub amount: i64,
    /// Date the payment was made
    pub paid_on: Date,
    /// Payment method (e.g., "transfer")
    pub method: String,
    /// Proof/reference string, required
    pub reference: String,
    /// Free-text note
    pub note: String,
    /// Requested status; `Verified` takes effect only for admin sessions
    pub requested_status: PaymentStatus,
}

/// Submits a payment for a billing period.
///
/// Validation happens before any store access: the month must be in 1-12, the
/// amount positive, and the reference non-empty. The requested `verified`
/// status is honored only when the submitting session is an admin; every
/// other combination lands as `pending` with no verifier stamp.
///
/// # Errors
/// `DuplicatePeriod` when a row already exists for this household and period;
/// `HouseholdNotFound` for an unknown household id.
pub async fn submit_payment(
    db: &DatabaseConnection,
    session: &Session,
    input: NewPayment,
) -> Result<payment::Model> {
    if !(1..=12).contains(&input.month) {
        return Err(Error::InvalidMonth { month: input.month });
    }
    if input.amount <= 0 {
        return Err(Error::InvalidAmount {
            amount: input.amount,
        });
    }
    if input.reference.trim().is_empty() {
        return Err(Error::Validation {
            message: "payment reference cannot be empty".to_string(),
        });
    }

    let _household = Household::find_by_id(input.household_id)
        .one(db)
        .await?
        .ok_or(Error::HouseholdNotFound {
            id: input.household_id,
        })?;

    let now = chrono::Utc::now();
    // Admin fast path: trusted actors may record a payment directly as verified.
    let verified_now =
        session.is_admin() && input.requested_status == PaymentStatus::Verified;
    let (status, verified_by, verified_at) = if verified_now {
        (PaymentStatus::Verified, Some(session.user_id), Some(now))
    } else {
        (PaymentStatus::Pending, None, None)
    };

    let model = payment::ActiveModel {
        household_id: Set(input.household_id),
        month: Set(input.month),
        year: Set(input.year),
        amount: Set(input.amount),
        paid_on: Set(input.paid_on),
        method: Set(input.method),
        reference: Set(input.reference.trim().to_string()),
        status: Set(status.as_str().to_string()),
        note: Set(input.note),
        verified_by: Set(verified_by),
        verified_at: Set(verified_at),
        created_at: Set(now),
        ..Default::default()
    };

    match model.insert(db).await {
        Ok(created) => {
            info!(
                payment_id = created.id,
                household_id = created.household_id,
                month = created.month,
                year = created.year,
                status = %created.status,
                "recorded payment"
            );
            Ok(created)
        }
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(Error::DuplicatePeriod {
                month: input.month,
                year: input.year,
            }),
            _ => Err(err.into()),
        },
    }
}

/// Reviews a pending payment. Admin only.
///
/// A `Verified` verdict sets the status plus the verifier id and timestamp;
/// a `Rejected` verdict sets the status only. Re-applying the verdict a
/// payment already carries rewrites the same fields. Moving a payment from
/// one terminal status to the other is refused with `InvalidTransition`;
/// reversal requires a new payment row.
///
/// # Errors
/// `PaymentNotFound` for an unknown id; no row is created or modified.
pub async fn review_payment(
    db: &DatabaseConnection,
    session: &Session,
    payment_id: i64,
    verdict: PaymentVerdict,
) -> Result<payment::Model> {
    session.require_admin()?;

    let existing = Payment::find_by_id(payment_id)
        .one(db)
        .await?
        .ok_or(Error::PaymentNotFound { id: payment_id })?;

    let target = verdict.status();
    if existing.status != PaymentStatus::Pending.as_str() && existing.status != target.as_str() {
        return Err(Error::InvalidTransition {
            id: payment_id,
            status: existing.status,
        });
    }

    let mut active: payment::ActiveModel = existing.into();
    active.status = Set(target.as_str().to_string());
    if verdict == PaymentVerdict::Verified {
        active.verified_by = Set(Some(session.user_id));
        active.verified_at = Set(Some(chrono::Utc::now()));
    }

    let updated = active.update(db).await?;
    info!(
        payment_id,
        status = %updated.status,
        reviewer = session.user_id,
        "reviewed payment"
    );
    Ok(updated)
}

/// Finds a payment by its unique ID.
pub async fn get_payment_by_id(
    db: &DatabaseConnection,
    payment_id: i64,
) -> Result<Option<payment::Model>> {
    Payment::find_by_id(payment_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all payments for one household, newest period first.
pub async fn get_payments_for_household(
    db: &DatabaseConnection,
    household_id: i64,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::HouseholdId.eq(household_id))
        .order_by_desc(payment::Column::Year)
        .order_by_desc(payment::Column::Month)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all payments joined with their household, newest first.
///
/// The household side is `None` only if the row was orphaned by out-of-band
/// store surgery; the cascade rule prevents that in normal operation.
pub async fn list_payments(
    db: &DatabaseConnection,
) -> Result<Vec<(payment::Model, Option<household::Model>)>> {
    Payment::find()
        .find_also_related(Household)
        .order_by_desc(payment::Column::Year)
        .order_by_desc(payment::Column::Month)
        .order_by_desc(payment::Column::PaidOn)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The admin verification queue: pending payments, oldest submission first.
pub async fn pending_payments(db: &DatabaseConnection) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::Status.eq(PaymentStatus::Pending.as_str()))
        .order_by_asc(payment::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_submit_payment_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let session = user_session();

        let mut input = test_payment_input(1, 3, 2026);
        input.month = 0;
        let result = submit_payment(&db, &session, input).await;
        assert!(matches!(result, Err(Error::InvalidMonth { month: 0 })));

        let mut input = test_payment_input(1, 3, 2026);
        input.month = 13;
        let result = submit_payment(&db, &session, input).await;
        assert!(matches!(result, Err(Error::InvalidMonth { month: 13 })));

        let mut input = test_payment_input(1, 3, 2026);
        input.amount = 0;
        let result = submit_payment(&db, &session, input).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: 0 })));

        let mut input = test_payment_input(1, 3, 2026);
        input.amount = -50_000;
        let result = submit_payment(&db, &session, input).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: -50_000 })));

        let mut input = test_payment_input(1, 3, 2026);
        input.reference = "  ".to_string();
        let result = submit_payment(&db, &session, input).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_submit_payment_unknown_household() -> Result<()> {
        let db = setup_test_db().await?;
        let result = submit_payment(&db, &user_session(), test_payment_input(999, 3, 2026)).await;
        assert!(matches!(result, Err(Error::HouseholdNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_self_service_submission_lands_pending() -> Result<()> {
        let (db, household) = setup_with_household().await?;

        let payment =
            submit_payment(&db, &user_session(), test_payment_input(household.id, 3, 2026))
                .await?;

        assert_eq!(payment.status, "pending");
        assert_eq!(payment.verified_by, None);
        assert_eq!(payment.verified_at, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_admin_cannot_request_verified() -> Result<()> {
        let (db, household) = setup_with_household().await?;

        let mut input = test_payment_input(household.id, 3, 2026);
        input.requested_status = PaymentStatus::Verified;
        let payment = submit_payment(&db, &user_session(), input).await?;

        // The request is quietly downgraded: no stamp, pending status.
        assert_eq!(payment.status, "pending");
        assert_eq!(payment.verified_by, None);
        assert_eq!(payment.verified_at, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_fast_path_stamps_verifier() -> Result<()> {
        let (db, household) = setup_with_household().await?;
        let session = admin_session();

        let mut input = test_payment_input(household.id, 3, 2026);
        input.requested_status = PaymentStatus::Verified;
        let payment = submit_payment(&db, &session, input).await?;

        assert_eq!(payment.status, "verified");
        assert_eq!(payment.verified_by, Some(session.user_id));
        assert!(payment.verified_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_period_rejected_and_original_untouched() -> Result<()> {
        let (db, household) = setup_with_household().await?;
        let session = user_session();

        let original =
            submit_payment(&db, &session, test_payment_input(household.id, 3, 2026)).await?;

        let mut second = test_payment_input(household.id, 3, 2026);
        second.amount = 999_999;
        let result = submit_payment(&db, &session, second).await;
        assert!(matches!(
            result,
            Err(Error::DuplicatePeriod {
                month: 3,
                year: 2026
            })
        ));

        // Original row unmodified, and still the only row for the triple.
        let stored = get_payment_by_id(&db, original.id).await?.unwrap();
        assert_eq!(stored, original);
        assert_eq!(get_payments_for_household(&db, household.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_same_period_different_month_allowed() -> Result<()> {
        let (db, household) = setup_with_household().await?;
        let session = user_session();

        submit_payment(&db, &session, test_payment_input(household.id, 3, 2026)).await?;
        submit_payment(&db, &session, test_payment_input(household.id, 4, 2026)).await?;
        submit_payment(&db, &session, test_payment_input(household.id, 3, 2027)).await?;

        assert_eq!(get_payments_for_household(&db, household.id).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_review_verifies_with_stamp() -> Result<()> {
        let (db, household) = setup_with_household().await?;
        let payment =
            submit_payment(&db, &user_session(), test_payment_input(household.id, 3, 2026))
                .await?;

        let admin = admin_session();
        let reviewed = review_payment(&db, &admin, payment.id, PaymentVerdict::Verified).await?;

        assert_eq!(reviewed.status, "verified");
        assert_eq!(reviewed.verified_by, Some(admin.user_id));
        assert!(reviewed.verified_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_rejection_sets_status_only() -> Result<()> {
        let (db, household) = setup_with_household().await?;
        let payment =
            submit_payment(&db, &user_session(), test_payment_input(household.id, 3, 2026))
                .await?;

        let reviewed =
            review_payment(&db, &admin_session(), payment.id, PaymentVerdict::Rejected).await?;

        assert_eq!(reviewed.status, "rejected");
        // No reviewer stamp on rejection; the stamp is reserved for verified rows.
        assert_eq!(reviewed.verified_by, None);
        assert_eq!(reviewed.verified_at, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_review_requires_admin() -> Result<()> {
        let (db, household) = setup_with_household().await?;
        let payment =
            submit_payment(&db, &user_session(), test_payment_input(household.id, 3, 2026))
                .await?;

        let result =
            review_payment(&db, &user_session(), payment.id, PaymentVerdict::Verified).await;
        assert!(matches!(result, Err(Error::AdminRequired)));
        Ok(())
    }

    #[tokio::test]
    async fn test_review_unknown_payment_is_noop_failure() -> Result<()> {
        let db = setup_test_db().await?;

        let result =
            review_payment(&db, &admin_session(), 999, PaymentVerdict::Verified).await;
        assert!(matches!(result, Err(Error::PaymentNotFound { id: 999 })));

        // No row was created by the failed review.
        assert_eq!(Payment::find().all(&db).await?.len(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_review_same_verdict_is_idempotent() -> Result<()> {
        let (db, household) = setup_with_household().await?;
        let payment =
            submit_payment(&db, &user_session(), test_payment_input(household.id, 3, 2026))
                .await?;

        let admin = admin_session();
        review_payment(&db, &admin, payment.id, PaymentVerdict::Verified).await?;
        let again = review_payment(&db, &admin, payment.id, PaymentVerdict::Verified).await?;

        assert_eq!(again.status, "verified");
        assert_eq!(again.verified_by, Some(admin.user_id));
        Ok(())
    }

    #[tokio::test]
    async fn test_terminal_statuses_cannot_flip() -> Result<()> {
        let (db, household) = setup_with_household().await?;
        let payment =
            submit_payment(&db, &user_session(), test_payment_input(household.id, 3, 2026))
                .await?;

        let admin = admin_session();
        review_payment(&db, &admin, payment.id, PaymentVerdict::Verified).await?;

        let result = review_payment(&db, &admin, payment.id, PaymentVerdict::Rejected).await;
        assert!(matches!(result, Err(Error::InvalidTransition { .. })));

        // Status unchanged by the refused flip.
        let stored = get_payment_by_id(&db, payment.id).await?.unwrap();
        assert_eq!(stored.status, "verified");
        Ok(())
    }

    #[tokio::test]
    async fn test_household_delete_cascades_to_payments() -> Result<()> {
        let (db, household) = setup_with_household().await?;
        let session = user_session();

        submit_payment(&db, &session, test_payment_input(household.id, 3, 2026)).await?;
        submit_payment(&db, &session, test_payment_input(household.id, 4, 2026)).await?;

        crate::core::household::delete_household(&db, &admin_session(), household.id).await?;

        // No orphaned payment survives the household.
        assert_eq!(Payment::find().all(&db).await?.len(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_pending_queue_and_recent_pending() -> Result<()> {
        let (db, household) = setup_with_household().await?;
        let session = user_session();

        for month in 1..=3 {
            submit_payment(&db, &session, test_payment_input(household.id, month, 2026))
                .await?;
        }
        let admin = admin_session();
        let queue = pending_payments(&db).await?;
        assert_eq!(queue.len(), 3);
        review_payment(&db, &admin, queue[0].id, PaymentVerdict::Verified).await?;

        assert_eq!(pending_payments(&db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_payments_carries_household() -> Result<()> {
        let (db, household) = setup_with_household().await?;
        submit_payment(&db, &user_session(), test_payment_input(household.id, 3, 2026))
            .await?;

        let rows = list_payments(&db).await?;
        assert_eq!(rows.len(), 1);
        let (payment, joined) = &rows[0];
        assert_eq!(payment.household_id, household.id);
        assert_eq!(joined.as_ref().unwrap().house_code, household.house_code);
        Ok(())
    }
}
