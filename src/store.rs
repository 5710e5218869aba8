//! Store façade: cached reads plus a single write interceptor.
//!
//! Interactive callers go through [`Store`] rather than the core functions
//! directly. Reads of the hot lists are served from the [`ReadCache`] and
//! repopulated on miss; every mutation funnels through one private `write`
//! hook that clears the cache synchronously on success, so no write path can
//! forget invalidation. Each operation is one short-lived interaction - there
//! are no long-lived transactions spanning calls.

use crate::{
    cache::ReadCache,
    config::settings::AppSettings,
    core::{change, expenditure, household, payment, report, user},
    entities,
    errors::Result,
    session::Session,
};
use sea_orm::DatabaseConnection;
use std::time::Duration;

/// The ledger store: database connection, read cache, and ledger settings.
pub struct Store {
    db: DatabaseConnection,
    cache: ReadCache,
    monthly_due: i64,
}

impl Store {
    /// Wraps an open connection with a cache sized from settings.
    #[must_use]
    pub fn new(db: DatabaseConnection, settings: &AppSettings) -> Self {
        Self {
            db,
            cache: ReadCache::new(Duration::from_secs(settings.cache_ttl_secs)),
            monthly_due: settings.monthly_due,
        }
    }

    /// Direct access to the underlying connection, for callers that need
    /// queries the façade does not expose.
    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Runs a mutation and, on success, clears the read cache before
    /// returning. Every write path below goes through here.
    async fn write<'a, T, F, Fut>(&'a self, op: F) -> Result<T>
    where
        F: FnOnce(&'a DatabaseConnection) -> Fut,
        Fut: Future<Output = Result<T>> + 'a,
    {
        let result = op(&self.db).await?;
        // A failed op changed nothing, so the cache stays valid; a successful
        // one invalidates synchronously before the caller sees the result.
        self.cache.clear_all().await;
        Ok(result)
    }

    // ---- cached reads ----

    /// Every household, ordered by house code. Cached.
    pub async fn households(&self) -> Result<Vec<entities::household::Model>> {
        if let Some(cached) = self.cache.households.get().await {
            return Ok(cached);
        }
        let fresh = household::get_all_households(&self.db, false).await?;
        self.cache.households.put(fresh.clone()).await;
        Ok(fresh)
    }

    /// Active households only, served from the same snapshot.
    pub async fn active_households(&self) -> Result<Vec<entities::household::Model>> {
        let all = self.households().await?;
        Ok(all.into_iter().filter(|h| h.status == "active").collect())
    }

    /// All payments joined with their household, newest first. Cached.
    pub async fn payments(
        &self,
    ) -> Result<Vec<(entities::payment::Model, Option<entities::household::Model>)>> {
        if let Some(cached) = self.cache.payments.get().await {
            return Ok(cached);
        }
        let fresh = payment::list_payments(&self.db).await?;
        self.cache.payments.put(fresh.clone()).await;
        Ok(fresh)
    }

    /// All expenditures, newest first. Cached.
    pub async fn expenditures(&self) -> Result<Vec<entities::expenditure::Model>> {
        if let Some(cached) = self.cache.expenditures.get().await {
            return Ok(cached);
        }
        let fresh = expenditure::list_expenditures(&self.db, None).await?;
        self.cache.expenditures.put(fresh.clone()).await;
        Ok(fresh)
    }

    // ---- households ----

    pub async fn create_household(
        &self,
        session: &Session,
        input: household::HouseholdInput,
    ) -> Result<entities::household::Model> {
        let session = session.clone();
        self.write(move |db| async move {
            household::create_household(db, &session, input).await
        })
        .await
    }

    pub async fn update_household(
        &self,
        session: &Session,
        household_id: i64,
        input: household::HouseholdInput,
    ) -> Result<entities::household::Model> {
        let session = session.clone();
        self.write(move |db| async move {
            household::update_household(db, &session, household_id, input).await
        })
        .await
    }

    pub async fn delete_household(&self, session: &Session, household_id: i64) -> Result<()> {
        let session = session.clone();
        self.write(move |db| async move {
            household::delete_household(db, &session, household_id).await
        })
        .await
    }

    // ---- payments ----

    pub async fn submit_payment(
        &self,
        session: &Session,
        input: payment::NewPayment,
    ) -> Result<entities::payment::Model> {
        let session = session.clone();
        self.write(move |db| async move { payment::submit_payment(db, &session, input).await })
            .await
    }

    pub async fn review_payment(
        &self,
        session: &Session,
        payment_id: i64,
        verdict: payment::PaymentVerdict,
    ) -> Result<entities::payment::Model> {
        let session = session.clone();
        self.write(move |db| async move {
            payment::review_payment(db, &session, payment_id, verdict).await
        })
        .await
    }

    // ---- change requests ----

    pub async fn propose_change(
        &self,
        session: &Session,
        proposal: change::ChangeProposal,
    ) -> Result<entities::pending_change::Model> {
        let session = session.clone();
        self.write(move |db| async move { change::propose_change(db, &session, proposal).await })
            .await
    }

    pub async fn resolve_change(
        &self,
        session: &Session,
        change_id: i64,
        resolution: change::ChangeResolution,
    ) -> Result<entities::pending_change::Model> {
        let session = session.clone();
        self.write(move |db| async move {
            change::resolve_change(db, &session, change_id, resolution).await
        })
        .await
    }

    pub async fn approve_all_pending(&self, session: &Session) -> Result<usize> {
        let session = session.clone();
        self.write(move |db| async move { change::approve_all_pending(db, &session).await })
            .await
    }

    // ---- expenditures ----

    pub async fn add_expenditure(
        &self,
        session: &Session,
        input: expenditure::NewExpenditure,
    ) -> Result<entities::expenditure::Model> {
        let session = session.clone();
        self.write(move |db| async move {
            expenditure::add_expenditure(db, &session, input).await
        })
        .await
    }

    pub async fn delete_expenditure(
        &self,
        session: &Session,
        expenditure_id: i64,
    ) -> Result<()> {
        let session = session.clone();
        self.write(move |db| async move {
            expenditure::delete_expenditure(db, &session, expenditure_id).await
        })
        .await
    }

    // ---- users & sessions ----

    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        user::authenticate(&self.db, username, password).await
    }

    pub async fn create_user(
        &self,
        session: &Session,
        input: user::NewUser,
    ) -> Result<entities::user::Model> {
        let session = session.clone();
        self.write(move |db| async move { user::create_user(db, &session, input).await })
            .await
    }

    pub async fn update_user(
        &self,
        session: &Session,
        user_id: i64,
        input: user::UserUpdate,
    ) -> Result<entities::user::Model> {
        let session = session.clone();
        self.write(move |db| async move { user::update_user(db, &session, user_id, input).await })
            .await
    }

    // ---- reports (uncached passthroughs) ----

    pub async fn monthly_report(&self, year: i32) -> Result<Vec<report::MonthlyTotal>> {
        report::monthly_totals(&self.db, year).await
    }

    pub async fn yearly_report(&self) -> Result<Vec<report::YearlyTotal>> {
        report::yearly_totals(&self.db).await
    }

    /// Arrears estimate using the configured flat monthly due.
    pub async fn arrears_report(&self, year: i32) -> Result<Vec<report::HouseholdArrears>> {
        report::arrears(&self.db, year, self.monthly_due).await
    }

    pub async fn payment_status_report(&self) -> Result<report::StatusDistribution> {
        report::status_distribution(&self.db).await
    }
}
