//! Application state for the reaction-time API

use anyhow::Result;
use reaction_core::{Engine, SampleStore, StoreConfig, ValueBounds};

pub struct AppState {
    pub engine: Engine,
    /// Lifetime of the issued `user_id` cookie
    pub cookie_max_age_secs: u64,
}

impl AppState {
    pub async fn new(
        store_config: &StoreConfig,
        bounds: ValueBounds,
        cookie_max_age_secs: u64,
    ) -> Result<Self> {
        let store = SampleStore::open(store_config).await?;
        Ok(Self::with_store(store, bounds, cookie_max_age_secs))
    }

    pub fn with_store(store: SampleStore, bounds: ValueBounds, cookie_max_age_secs: u64) -> Self {
        Self {
            engine: Engine::new(store, bounds),
            cookie_max_age_secs,
        }
    }
}
