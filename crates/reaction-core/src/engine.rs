//! Aggregation engine: turns stored samples into the statistics returned
//! to callers.
//!
//! Nothing is cached. Every call re-reads the store, so results always
//! reflect the latest committed samples. The per-user and global reads inside
//! one `submit` are not a consistent snapshot; a concurrent submission from
//! another user may land between them.

use crate::error::{Error, Result};
use crate::stats;
use crate::store::SampleStore;
use crate::types::{GlobalStats, SubmissionResult, UserStats, ValueBounds};

#[derive(Debug, Clone)]
pub struct Engine {
    store: SampleStore,
    bounds: ValueBounds,
}

impl Engine {
    pub fn new(store: SampleStore, bounds: ValueBounds) -> Self {
        Self { store, bounds }
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub async fn ensure_user(&self, user_id: &str) -> Result<()> {
        self.store.ensure_user(user_id).await
    }

    pub async fn user_stats(&self, user_id: &str) -> Result<UserStats> {
        let samples = self.store.user_samples(user_id).await?;
        Ok(UserStats::from_samples(&samples))
    }

    /// Statistics over one mean per user, so heavy users count once
    pub async fn global_stats(&self) -> Result<GlobalStats> {
        let means: Vec<f64> = self.store.per_user_means().await?.into_values().collect();
        let global = GlobalStats::from_user_means(&means);
        tracing::debug!(
            "Global stats over {} users: mean={:.3} stdev={:.3}",
            global.total_users,
            global.mean,
            global.stdev
        );
        Ok(global)
    }

    /// Validate, persist and score one reaction-time sample.
    ///
    /// Both validation failures are returned before anything is written.
    pub async fn submit(
        &self,
        user_id: Option<&str>,
        value: Option<f64>,
    ) -> Result<SubmissionResult> {
        let value = self.bounds.validate(value)?;

        let user_id = match user_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(Error::MissingUser),
        };
        // An identifier the store never issued is no identity at all
        if !self.store.user_exists(user_id).await? {
            return Err(Error::MissingUser);
        }

        self.store.record_sample(user_id, value).await?;

        let user = self.user_stats(user_id).await?;
        let global = self.global_stats().await?;
        let percentile = stats::percentile(user.mean, global.mean, global.stdev);

        tracing::debug!(
            "Submission from {}: value={} mean={:.3} count={} percentile={:.2}",
            user_id,
            value,
            user.mean,
            user.count,
            percentile
        );

        Ok(SubmissionResult::new(user, global, percentile))
    }
}
