//! Time-boxed read cache for the hot list queries.
//!
//! Each [`CacheSlot`] holds one snapshot with an insertion time; a snapshot
//! older than the TTL is treated as absent. Slots are only ever cleared
//! through [`ReadCache::clear_all`], which the store's write interceptor
//! calls after every successful mutation - invalidation is not scattered
//! across individual write paths.

use crate::entities::{expenditure, household, payment};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::trace;

struct Entry<T> {
    value: T,
    inserted_at: Instant,
}

/// One cached snapshot with a time box.
pub struct CacheSlot<T> {
    inner: RwLock<Option<Entry<T>>>,
    ttl: Duration,
}

impl<T: Clone> CacheSlot<T> {
    /// Creates an empty slot with the given time box.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(None),
            ttl,
        }
    }

    /// Returns the cached snapshot, or None when empty or expired.
    pub async fn get(&self) -> Option<T> {
        let guard = self.inner.read().await;
        match guard.as_ref() {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.value.clone()),
            _ => None,
        }
    }

    /// Replaces the snapshot and restarts its clock.
    pub async fn put(&self, value: T) {
        let mut guard = self.inner.write().await;
        *guard = Some(Entry {
            value,
            inserted_at: Instant::now(),
        });
    }

    /// Drops the snapshot.
    pub async fn clear(&self) {
        let mut guard = self.inner.write().await;
        *guard = None;
    }
}

/// The ledger's read cache: one slot per hot list query.
pub struct ReadCache {
    /// Full household listing, ordered by house code
    pub households: CacheSlot<Vec<household::Model>>,
    /// Payments joined with their household, newest first
    pub payments: CacheSlot<Vec<(payment::Model, Option<household::Model>)>>,
    /// Expenditures, newest first
    pub expenditures: CacheSlot<Vec<expenditure::Model>>,
}

impl ReadCache {
    /// Creates an empty cache whose slots share one TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            households: CacheSlot::new(ttl),
            payments: CacheSlot::new(ttl),
            expenditures: CacheSlot::new(ttl),
        }
    }

    /// Drops every snapshot. Called synchronously after each write.
    pub async fn clear_all(&self) {
        self.households.clear().await;
        self.payments.clear().await;
        self.expenditures.clear().await;
        trace!("read cache cleared");
    }
}
