//! Protection tiers derived from influence.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::influence::MAX_INFLUENCE;

/// How strongly a clan holds a cell, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtectionTier {
    Core,
    Secure,
    Contested,
    Frontier,
}

impl ProtectionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "Core",
            Self::Secure => "Secure",
            Self::Contested => "Contested",
            Self::Frontier => "Frontier",
        }
    }
}

impl fmt::Display for ProtectionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Influence breakpoints for each tier. A cell is in the first tier whose
/// breakpoint its influence reaches; below `contested` it is `Frontier`.
///
/// Invariant: `MAX_INFLUENCE >= core > secure > contested`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    core: u8,
    secure: u8,
    contested: u8,
}

impl TierThresholds {
    pub const DEFAULT_CORE: u8 = 75;
    pub const DEFAULT_SECURE: u8 = 50;
    pub const DEFAULT_CONTESTED: u8 = 25;

    /// Custom breakpoints.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless the breakpoints are strictly
    /// descending and none exceeds the influence ceiling.
    pub fn new(core: u8, secure: u8, contested: u8) -> Result<Self, DomainError> {
        if core > MAX_INFLUENCE {
            return Err(DomainError::validation(format!(
                "Core threshold {} exceeds maximum influence {}",
                core, MAX_INFLUENCE
            )));
        }
        if !(core > secure && secure > contested) {
            return Err(DomainError::validation(format!(
                "Tier thresholds must be strictly descending, got {}/{}/{}",
                core, secure, contested
            )));
        }
        Ok(Self {
            core,
            secure,
            contested,
        })
    }

    pub fn tier_for(&self, influence: u8) -> ProtectionTier {
        if influence >= self.core {
            ProtectionTier::Core
        } else if influence >= self.secure {
            ProtectionTier::Secure
        } else if influence >= self.contested {
            ProtectionTier::Contested
        } else {
            ProtectionTier::Frontier
        }
    }

    pub fn core(&self) -> u8 {
        self.core
    }

    pub fn secure(&self) -> u8 {
        self.secure
    }

    pub fn contested(&self) -> u8 {
        self.contested
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            core: Self::DEFAULT_CORE,
            secure: Self::DEFAULT_SECURE,
            contested: Self::DEFAULT_CONTESTED,
        }
    }
}
