//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::SystemClock,
    config::TerritoryConfig,
    ports::{ClanDirectory, ClockPort, TerritoryRepo, WorldDirectory},
};
use crate::stores::TerritoryStore;
use crate::use_cases::{ClaimEngine, RaidEngine, TerritoryAccess};

/// Main application state.
///
/// All engines share one store, so claims, raids, decay and permission
/// checks observe the same table.
pub struct App {
    pub store: Arc<TerritoryStore>,
    pub claims: Arc<ClaimEngine>,
    pub raids: Arc<RaidEngine>,
    pub access: Arc<TerritoryAccess>,
}

impl App {
    /// Wire the engines around an existing store.
    pub fn new(
        store: Arc<TerritoryStore>,
        clans: Arc<dyn ClanDirectory>,
        clock: Arc<dyn ClockPort>,
        config: &TerritoryConfig,
    ) -> Self {
        let claims = Arc::new(ClaimEngine::new(store.clone(), clans.clone(), clock));
        let raids = Arc::new(RaidEngine::new(store.clone()));
        let access = Arc::new(TerritoryAccess::new(
            store.clone(),
            clans,
            config.thresholds,
        ));

        Self {
            store,
            claims,
            raids,
            access,
        }
    }

    /// Load the persisted store and wire the engines with the system clock.
    pub async fn load(
        repo: Arc<dyn TerritoryRepo>,
        clans: Arc<dyn ClanDirectory>,
        worlds: &dyn WorldDirectory,
        config: &TerritoryConfig,
    ) -> Self {
        let store = Arc::new(TerritoryStore::load(repo, worlds).await);
        Self::new(store, clans, Arc::new(SystemClock::new()), config)
    }
}
