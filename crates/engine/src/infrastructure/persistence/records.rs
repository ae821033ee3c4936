//! Serializable territory records.
//!
//! Fields are kept as plain primitives so that one bad record (unknown world,
//! out-of-range tier, malformed id) can be skipped on load without rejecting
//! the whole document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use holdfast_domain::{
    CellKey, ClanName, Flag, FlagTier, PlayerId, Territory, WorldLocation, WorldName,
    MAX_INFLUENCE,
};

use crate::infrastructure::ports::WorldDirectory;

/// The persisted store: every territory, in key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerritoryDocument {
    #[serde(default)]
    pub territories: Vec<TerritoryRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritoryRecord {
    pub world_name: String,
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub clan_name: String,
    pub influence_level: i64,
    /// Milliseconds since the Unix epoch
    pub claim_time: i64,
    #[serde(default)]
    pub flags: Vec<FlagRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagRecord {
    pub world_name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub placed_by: String,
    /// Milliseconds since the Unix epoch
    pub placed_time: i64,
    pub tier: i64,
    /// Derived from `tier`; written for readers of the file, ignored on load
    pub influence_radius: i64,
}

/// Why a stored record could not be restored.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("world '{0}' no longer exists")]
    UnknownWorld(String),
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl RecordError {
    fn invalid(field: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            field,
            message: message.to_string(),
        }
    }
}

/// A restored territory plus the flags that had to be dropped from it.
#[derive(Debug)]
pub struct Restored {
    pub territory: Territory,
    pub skipped_flags: Vec<RecordError>,
}

impl TerritoryDocument {
    /// Build a document from territories, sorted by cell key.
    pub fn from_territories<'a, I>(territories: I) -> Self
    where
        I: IntoIterator<Item = &'a Territory>,
    {
        let mut sorted: Vec<&Territory> = territories.into_iter().collect();
        sorted.sort_by(|a, b| a.key().cmp(b.key()));
        Self {
            territories: sorted.into_iter().map(TerritoryRecord::from).collect(),
        }
    }
}

impl From<&Territory> for TerritoryRecord {
    fn from(territory: &Territory) -> Self {
        Self {
            world_name: territory.key().world().to_string(),
            chunk_x: territory.key().x(),
            chunk_z: territory.key().z(),
            clan_name: territory.clan().to_string(),
            influence_level: i64::from(territory.influence()),
            claim_time: territory.claimed_at().timestamp_millis(),
            flags: territory.flags().iter().map(FlagRecord::from).collect(),
        }
    }
}

impl From<&Flag> for FlagRecord {
    fn from(flag: &Flag) -> Self {
        Self {
            world_name: flag.location().world().to_string(),
            x: flag.location().x(),
            y: flag.location().y(),
            z: flag.location().z(),
            placed_by: flag.placed_by().to_string(),
            placed_time: flag.placed_at().timestamp_millis(),
            tier: i64::from(flag.tier().value()),
            influence_radius: i64::from(flag.influence_radius()),
        }
    }
}

fn timestamp(field: &'static str, millis: i64) -> Result<DateTime<Utc>, RecordError> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| RecordError::invalid(field, format!("{} out of range", millis)))
}

fn world(name: &str, worlds: &dyn WorldDirectory) -> Result<WorldName, RecordError> {
    let world = WorldName::new(name).map_err(|e| RecordError::invalid("worldName", e))?;
    if !worlds.exists(&world) {
        return Err(RecordError::UnknownWorld(name.to_string()));
    }
    Ok(world)
}

impl TerritoryRecord {
    /// Rebuild the territory. Stored influence is kept (clamped to `0..=100`),
    /// not recomputed, so raid penalties survive a restart.
    pub fn restore(&self, worlds: &dyn WorldDirectory) -> Result<Restored, RecordError> {
        let world = world(&self.world_name, worlds)?;
        let clan =
            ClanName::new(self.clan_name.as_str()).map_err(|e| RecordError::invalid("clanName", e))?;
        let claimed_at = timestamp("claimTime", self.claim_time)?;
        let influence = self.influence_level.clamp(0, i64::from(MAX_INFLUENCE)) as u8;

        let key = CellKey::new(world, self.chunk_x, self.chunk_z);
        let mut flags: Vec<Flag> = Vec::with_capacity(self.flags.len());
        let mut skipped_flags = Vec::new();
        for record in &self.flags {
            match record.restore(worlds) {
                Ok(flag) if flag.location().cell() != key => skipped_flags.push(
                    RecordError::invalid("x", format!("flag lies outside cell {key}")),
                ),
                Ok(flag) if flags.iter().any(|f| f.stands_at(flag.location())) => {
                    skipped_flags.push(RecordError::invalid("x", "block already holds a flag"))
                }
                Ok(flag) => flags.push(flag),
                Err(e) => skipped_flags.push(e),
            }
        }

        Ok(Restored {
            territory: Territory::restore(key, clan, influence, claimed_at, flags),
            skipped_flags,
        })
    }
}

impl FlagRecord {
    pub fn restore(&self, worlds: &dyn WorldDirectory) -> Result<Flag, RecordError> {
        let world = world(&self.world_name, worlds)?;
        let placed_by: PlayerId = self
            .placed_by
            .parse()
            .map_err(|e| RecordError::invalid("placedBy", e))?;
        let placed_at = timestamp("placedTime", self.placed_time)?;
        let tier = u8::try_from(self.tier)
            .map_err(|e| RecordError::invalid("tier", e))
            .and_then(|t| FlagTier::new(t).map_err(|e| RecordError::invalid("tier", e)))?;

        let location = WorldLocation::new(world, self.x, self.y, self.z);
        if !location.is_finite() {
            return Err(RecordError::invalid("x", "coordinates must be finite"));
        }
        Ok(Flag::new(location, placed_by, placed_at).with_tier(tier))
    }
}
