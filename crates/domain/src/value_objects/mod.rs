//! Value objects - Immutable objects defined by their attributes

mod cell;
mod clan;
mod names;
mod protection;

pub use cell::{CellKey, WorldLocation, CELL_SIZE};
pub use clan::{
    ClanRelation, ClanStanding, BASE_CLAIMS, CLAIMS_PER_ALLY, CLAIMS_PER_MEMBER,
    CLAIMS_PER_OFFICER,
};
pub use names::{ClanName, WorldName};
pub use protection::{ProtectionTier, TierThresholds};
