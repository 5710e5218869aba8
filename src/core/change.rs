//! Change-approval workflow business logic.
//!
//! Lets any active user propose a mutation against a household, payment, or
//! user row without applying it. The proposal is stored as a pending-change
//! row carrying strongly-typed before/after payloads (serialized to JSON),
//! and an admin later resolves it to `approved` or `rejected`. Resolution
//! stamps the reviewer and review time on the change row only; the payload is
//! never replayed onto the target table. The envelope is an audit trail, not
//! a deferred-execution queue.

use crate::{
    entities::{PendingChange, household, payment, pending_change, user},
    errors::{Error, Result},
    session::Session,
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

const STATUS_PENDING: &str = "pending";

/// Entity kinds a change request may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeTarget {
    Household,
    Payment,
    User,
}

impl ChangeTarget {
    /// The target string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Household => "household",
            Self::Payment => "payment",
            Self::User => "user",
        }
    }
}

/// Resolution of a pending change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeResolution {
    Approved,
    Rejected,
}

impl ChangeResolution {
    /// The status string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// A typed before- or after-state snapshot of a targeted row.
///
/// Replaces the untyped serialized blobs of a generic audit table: the
/// variant fixes the target entity kind at compile time, and the payload is
/// the full row model, so a future replay step could be added without a
/// schema change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "row", rename_all = "snake_case")]
pub enum ChangePayload {
    Household(household::Model),
    Payment(payment::Model),
    User(user::Model),
}

impl ChangePayload {
    /// The entity kind this payload snapshots.
    #[must_use]
    pub const fn target(&self) -> ChangeTarget {
        match self {
            Self::Household(_) => ChangeTarget::Household,
            Self::Payment(_) => ChangeTarget::Payment,
            Self::User(_) => ChangeTarget::User,
        }
    }
}

/// A proposed mutation, prior to review.
#[derive(Debug, Clone)]
pub enum ChangeProposal {
    /// Create a new row; no existing record, no before-state.
    Insert { after: ChangePayload },
    /// Rewrite an existing row; carries both states.
    Update {
        record_id: i64,
        before: ChangePayload,
        after: ChangePayload,
    },
    /// Remove an existing row; no after-state.
    Delete { record_id: i64, before: ChangePayload },
}

impl ChangeProposal {
    const fn action(&self) -> &'static str {
        match self {
            Self::Insert { .. } => "insert",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }

    fn target(&self) -> Result<ChangeTarget> {
        match self {
            Self::Insert { after } => Ok(after.target()),
            Self::Delete { before, .. } => Ok(before.target()),
            Self::Update { before, after, .. } => {
                if before.target() == after.target() {
                    Ok(after.target())
                } else {
                    Err(Error::Validation {
                        message: format!(
                            "update proposal mixes target kinds: {} vs {}",
                            before.target().as_str(),
                            after.target().as_str()
                        ),
                    })
                }
            }
        }
    }
}

/// Records a proposed mutation as a pending change. Any active user may
/// propose; nothing is applied to the target table.
pub async fn propose_change(
    db: &DatabaseConnection,
    session: &Session,
    proposal: ChangeProposal,
) -> Result<pending_change::Model> {
    let target = proposal.target()?;
    let action = proposal.action();

    let (record_id, before, after) = match &proposal {
        ChangeProposal::Insert { after } => (None, None, Some(after)),
        ChangeProposal::Update {
            record_id,
            before,
            after,
        } => (Some(*record_id), Some(before), Some(after)),
        ChangeProposal::Delete { record_id, before } => (Some(*record_id), Some(before), None),
    };

    let old_data = before.map(serde_json::to_string).transpose()?;
    let new_data = after.map(serde_json::to_string).transpose()?;

    let model = pending_change::ActiveModel {
        target: Set(target.as_str().to_string()),
        record_id: Set(record_id),
        action: Set(action.to_string()),
        old_data: Set(old_data),
        new_data: Set(new_data),
        requested_by: Set(session.user_id),
        status: Set(STATUS_PENDING.to_string()),
        reviewed_by: Set(None),
        review_date: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!(
        change_id = created.id,
        target = %created.target,
        action = %created.action,
        requested_by = session.user_id,
        "queued change request"
    );
    Ok(created)
}

/// Resolves a pending change to approved or rejected. Admin only.
///
/// Sets the status, reviewer id, and review timestamp on the change row.
/// The stored payload is not replayed onto the target table. Resolution is
/// last-write-wins: resolving an already-resolved change overwrites the
/// previous outcome and reviewer stamp.
///
/// # Errors
/// `ChangeNotFound` for an unknown id.
pub async fn resolve_change(
    db: &DatabaseConnection,
    session: &Session,
    change_id: i64,
    resolution: ChangeResolution,
) -> Result<pending_change::Model> {
    session.require_admin()?;

    let existing = PendingChange::find_by_id(change_id)
        .one(db)
        .await?
        .ok_or(Error::ChangeNotFound { id: change_id })?;

    let mut active: pending_change::ActiveModel = existing.into();
    active.status = Set(resolution.as_str().to_string());
    active.reviewed_by = Set(Some(session.user_id));
    active.review_date = Set(Some(chrono::Utc::now()));

    let updated = active.update(db).await?;
    info!(
        change_id,
        status = %updated.status,
        reviewer = session.user_id,
        "resolved change request"
    );
    Ok(updated)
}

/// Approves every pending change with the same reviewer, returning the count.
/// Same non-replaying semantics as [`resolve_change`]. Admin only.
pub async fn approve_all_pending(db: &DatabaseConnection, session: &Session) -> Result<usize> {
    session.require_admin()?;

    let pending = pending_changes(db).await?;
    let count = pending.len();
    for change in pending {
        let mut active: pending_change::ActiveModel = change.into();
        active.status = Set(ChangeResolution::Approved.as_str().to_string());
        active.reviewed_by = Set(Some(session.user_id));
        active.review_date = Set(Some(chrono::Utc::now()));
        active.update(db).await?;
    }

    info!(count, reviewer = session.user_id, "approved all pending changes");
    Ok(count)
}

/// The admin review queue: unresolved changes, newest first.
pub async fn pending_changes(db: &DatabaseConnection) -> Result<Vec<pending_change::Model>> {
    PendingChange::find()
        .filter(pending_change::Column::Status.eq(STATUS_PENDING))
        .order_by_desc(pending_change::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Resolved changes, most recently reviewed first.
pub async fn change_history(db: &DatabaseConnection) -> Result<Vec<pending_change::Model>> {
    PendingChange::find()
        .filter(pending_change::Column::Status.ne(STATUS_PENDING))
        .order_by_desc(pending_change::Column::ReviewDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Decodes the stored before/after payloads of a change row.
pub fn decode_payloads(
    change: &pending_change::Model,
) -> Result<(Option<ChangePayload>, Option<ChangePayload>)> {
    let before = change
        .old_data
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?;
    let after = change
        .new_data
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?;
    Ok((before, after))
}
