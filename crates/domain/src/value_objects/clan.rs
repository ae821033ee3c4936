//! Clan standing and relations as seen by the territory model.
//!
//! Membership, roles and alliances are owned by the clan registry. The
//! territory model only consumes these read-only projections.

use serde::{Deserialize, Serialize};

/// Base number of cells any clan may hold.
pub const BASE_CLAIMS: u32 = 10;
/// Extra cells per member.
pub const CLAIMS_PER_MEMBER: u32 = 2;
/// Extra cells per officer.
pub const CLAIMS_PER_OFFICER: u32 = 3;
/// Extra cells per allied clan.
pub const CLAIMS_PER_ALLY: u32 = 1;

/// Head counts that drive a clan's claim capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClanStanding {
    pub members: u32,
    pub officers: u32,
    pub allies: u32,
}

impl ClanStanding {
    pub fn new(members: u32, officers: u32, allies: u32) -> Self {
        Self {
            members,
            officers,
            allies,
        }
    }

    /// `10 + 2*members + 3*officers + 1*allies`, in integer arithmetic.
    pub fn max_claims(&self) -> u32 {
        BASE_CLAIMS
            .saturating_add(self.members.saturating_mul(CLAIMS_PER_MEMBER))
            .saturating_add(self.officers.saturating_mul(CLAIMS_PER_OFFICER))
            .saturating_add(self.allies.saturating_mul(CLAIMS_PER_ALLY))
    }
}

/// How an acting clan relates to the clan that owns a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClanRelation {
    /// Same clan
    Member,
    Ally,
    Enemy,
    /// No standing relationship, or no clan at all
    Neutral,
}
