//! Flag entity - a tiered marker inside a claimed cell
//!
//! Every flag adds influence to the territory it stands in. Flags are only
//! ever mutated by upgrading their tier; the tier also sets the flag's
//! influence radius.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ClaimError, DomainError};
use crate::ids::PlayerId;
use crate::value_objects::WorldLocation;

/// Flag tier, 1 through 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FlagTier(u8);

impl FlagTier {
    pub const MIN: FlagTier = FlagTier(1);
    pub const MAX: FlagTier = FlagTier(3);

    /// # Errors
    ///
    /// Returns `DomainError::Validation` for values outside `1..=3`.
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::validation(format!(
                "Flag tier must be between {} and {}, got {}",
                Self::MIN.0,
                Self::MAX.0,
                value
            )))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// The next tier up, if any.
    pub fn next(&self) -> Option<FlagTier> {
        (self.0 < Self::MAX.0).then(|| FlagTier(self.0 + 1))
    }

    /// Radius, in cells, over which the flag projects influence.
    pub fn influence_radius(&self) -> u8 {
        self.0
    }

    /// Influence the flag adds to its territory: 10 at tier 1, +5 per tier above.
    pub fn contribution(&self) -> u8 {
        10 + 5 * (self.0 - 1)
    }
}

impl Default for FlagTier {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for FlagTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for FlagTier {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FlagTier> for u8 {
    fn from(tier: FlagTier) -> u8 {
        tier.0
    }
}

/// A flag planted in a claimed cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Flag {
    location: WorldLocation,
    placed_by: PlayerId,
    placed_at: DateTime<Utc>,
    tier: FlagTier,
}

impl Flag {
    /// A fresh tier-1 flag.
    pub fn new(location: WorldLocation, placed_by: PlayerId, placed_at: DateTime<Utc>) -> Self {
        Self {
            location,
            placed_by,
            placed_at,
            tier: FlagTier::MIN,
        }
    }

    /// Builder for restoring a flag at a known tier.
    pub fn with_tier(mut self, tier: FlagTier) -> Self {
        self.tier = tier;
        self
    }

    #[inline]
    pub fn location(&self) -> &WorldLocation {
        &self.location
    }

    #[inline]
    pub fn placed_by(&self) -> PlayerId {
        self.placed_by
    }

    #[inline]
    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    #[inline]
    pub fn tier(&self) -> FlagTier {
        self.tier
    }

    #[inline]
    pub fn influence_radius(&self) -> u8 {
        self.tier.influence_radius()
    }

    /// True when `location` addresses this flag (same block).
    pub fn stands_at(&self, location: &WorldLocation) -> bool {
        self.location.same_block(location)
    }

    /// Raise the tier by one.
    ///
    /// # Errors
    ///
    /// `ClaimError::MaxTierReached` if the flag is already at tier 3.
    pub fn upgrade(&mut self) -> Result<FlagTier, ClaimError> {
        let next = self.tier.next().ok_or(ClaimError::MaxTierReached)?;
        self.tier = next;
        Ok(next)
    }
}
