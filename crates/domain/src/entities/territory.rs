//! Territory entity - one claimed cell
//!
//! # Invariants
//!
//! - `influence` is always in `0..=100`
//! - After any flag mutation, `influence == influence_for(flag tiers)`
//! - Raids and decay may push `influence` below that value; it stays there
//!   until the next flag mutation recomputes it
//!
//! The owning clan is held by name only.

use chrono::{DateTime, Utc};

use crate::entities::Flag;
use crate::entities::FlagTier;
use crate::error::ClaimError;
use crate::influence::{self, MAX_INFLUENCE};
use crate::value_objects::{CellKey, ClanName, ProtectionTier, TierThresholds, WorldLocation};

/// A cell held by a clan, with the flags planted in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Territory {
    key: CellKey,
    clan: ClanName,
    influence: u8,
    flags: Vec<Flag>,
    claimed_at: DateTime<Utc>,
}

impl Territory {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// A freshly claimed cell with no flags.
    pub fn new(key: CellKey, clan: ClanName, claimed_at: DateTime<Utc>) -> Self {
        let mut territory = Self {
            key,
            clan,
            influence: 0,
            flags: Vec::new(),
            claimed_at,
        };
        territory.recompute_influence();
        territory
    }

    /// Rebuild a territory from stored state, keeping the stored influence
    /// (which may carry a raid penalty). Values above the ceiling are clamped.
    pub fn restore(
        key: CellKey,
        clan: ClanName,
        influence: u8,
        claimed_at: DateTime<Utc>,
        flags: Vec<Flag>,
    ) -> Self {
        Self {
            key,
            clan,
            influence: influence.min(MAX_INFLUENCE),
            flags,
            claimed_at,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn key(&self) -> &CellKey {
        &self.key
    }

    #[inline]
    pub fn clan(&self) -> &ClanName {
        &self.clan
    }

    #[inline]
    pub fn influence(&self) -> u8 {
        self.influence
    }

    #[inline]
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    #[inline]
    pub fn claimed_at(&self) -> DateTime<Utc> {
        self.claimed_at
    }

    pub fn is_owned_by(&self, clan: &ClanName) -> bool {
        &self.clan == clan
    }

    pub fn protection_tier(&self, thresholds: &TierThresholds) -> ProtectionTier {
        thresholds.tier_for(self.influence)
    }

    pub fn flag_at(&self, location: &WorldLocation) -> Option<&Flag> {
        self.flags.iter().find(|f| f.stands_at(location))
    }

    /// What influence would be with no raid or decay penalty applied.
    pub fn flag_influence(&self) -> u8 {
        influence::influence_for(self.flags.iter().map(Flag::tier))
    }

    // =========================================================================
    // Flag mutations (each recomputes influence)
    // =========================================================================

    /// Plant a flag and return the new influence.
    ///
    /// # Errors
    ///
    /// `ClaimError::NotOwner` if the flag's location is not a finite point
    /// inside this cell, `ClaimError::AlreadyClaimed` if its block already
    /// holds a flag.
    pub fn add_flag(&mut self, flag: Flag) -> Result<u8, ClaimError> {
        let location = flag.location();
        if !location.is_finite() || location.cell() != self.key {
            return Err(ClaimError::NotOwner);
        }
        if self.flag_at(location).is_some() {
            return Err(ClaimError::AlreadyClaimed);
        }
        self.flags.push(flag);
        self.recompute_influence();
        Ok(self.influence)
    }

    /// # Errors
    ///
    /// `ClaimError::FlagNotFound` if no flag stands at `location`.
    pub fn remove_flag(&mut self, location: &WorldLocation) -> Result<Flag, ClaimError> {
        let index = self
            .flags
            .iter()
            .position(|f| f.stands_at(location))
            .ok_or(ClaimError::FlagNotFound)?;
        let removed = self.flags.remove(index);
        self.recompute_influence();
        Ok(removed)
    }

    /// # Errors
    ///
    /// `ClaimError::FlagNotFound` if no flag stands at `location`,
    /// `ClaimError::MaxTierReached` if it is already tier 3 (nothing changes).
    pub fn upgrade_flag(&mut self, location: &WorldLocation) -> Result<FlagTier, ClaimError> {
        let flag = self
            .flags
            .iter_mut()
            .find(|f| f.stands_at(location))
            .ok_or(ClaimError::FlagNotFound)?;
        let tier = flag.upgrade()?;
        self.recompute_influence();
        Ok(tier)
    }

    // =========================================================================
    // Transient penalties (flags untouched)
    // =========================================================================

    /// Cut influence to three quarters. Returns the previous value.
    pub fn apply_raid(&mut self) -> u8 {
        let before = self.influence;
        self.influence = influence::after_raid(before);
        before
    }

    /// Lower influence by `points`. Returns true if it changed.
    pub fn apply_decay(&mut self, points: u8) -> bool {
        let after = influence::after_decay(self.influence, points);
        let changed = after != self.influence;
        self.influence = after;
        changed
    }

    fn recompute_influence(&mut self) {
        self.influence = self.flag_influence();
    }
}
