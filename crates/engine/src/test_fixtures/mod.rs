//! Shared test helpers.
//!
//! Everything here builds on the "world" world and a fixed clock so that
//! territories created in different tests compare equal.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use holdfast_domain::{
    CellKey, ClanName, ClanRelation, ClanStanding, Territory, WorldLocation, WorldName, CELL_SIZE,
};

use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::persistence::TerritoryDocument;
use crate::infrastructure::ports::{
    ClanDirectory, ClockPort, MockClanDirectory, RepoError, TerritoryRepo,
};

// =============================================================================
// Value builders
// =============================================================================

pub fn world() -> WorldName {
    WorldName::new("world").unwrap()
}

pub fn clan(name: &str) -> ClanName {
    ClanName::new(name).unwrap()
}

pub fn cell(x: i32, z: i32) -> CellKey {
    CellKey::new(world(), x, z)
}

/// A location at block height 64.
pub fn at(x: f64, z: f64) -> WorldLocation {
    WorldLocation::new(world(), x, 64.0, z)
}

/// A location inside cell `(x, z)`, a few blocks from its corner.
pub fn inside(x: i32, z: i32) -> WorldLocation {
    at(f64::from(x) * CELL_SIZE + 3.5, f64::from(z) * CELL_SIZE + 7.5)
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

pub fn fixed_clock() -> Arc<dyn ClockPort> {
    Arc::new(FixedClock(now()))
}

/// A flagless territory (influence 50).
pub fn territory(clan_name: &str, x: i32, z: i32) -> Territory {
    Territory::new(cell(x, z), clan(clan_name), now())
}

// =============================================================================
// Collaborators
// =============================================================================

/// Saves are recorded in order; loads return nothing.
pub struct RecordingRepo {
    saved: Arc<Mutex<Vec<TerritoryDocument>>>,
}

#[async_trait]
impl TerritoryRepo for RecordingRepo {
    async fn load(&self) -> Result<Option<TerritoryDocument>, RepoError> {
        Ok(None)
    }

    async fn save(&self, document: &TerritoryDocument) -> Result<(), RepoError> {
        self.saved.lock().unwrap().push(document.clone());
        Ok(())
    }
}

pub type SavedDocuments = Arc<Mutex<Vec<TerritoryDocument>>>;

pub fn recording_repo() -> (Arc<dyn TerritoryRepo>, SavedDocuments) {
    let saved = SavedDocuments::default();
    let repo = RecordingRepo {
        saved: Arc::clone(&saved),
    };
    (Arc::new(repo), saved)
}

/// Every clan has `standing`; relations follow name equality only.
pub fn clans_with(standing: ClanStanding) -> Arc<dyn ClanDirectory> {
    let mut clans = MockClanDirectory::new();
    clans.expect_standing().returning(move |_| standing);
    clans.expect_relation().returning(|actor, owner| {
        if actor == owner {
            ClanRelation::Member
        } else {
            ClanRelation::Neutral
        }
    });
    Arc::new(clans)
}

/// Clans with the base allowance of ten claims.
pub fn default_clans() -> Arc<dyn ClanDirectory> {
    clans_with(ClanStanding::default())
}
