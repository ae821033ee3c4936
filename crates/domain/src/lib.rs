//! Holdfast domain - the territory model.
//!
//! Pure types and rules: who holds a cell, how strongly, and whether a clan's
//! holdings stay in one piece. Locking and persistence live in the engine.

pub mod connectivity;
pub mod entities;
pub mod error;
pub mod ids;
pub mod influence;
pub mod value_objects;

pub use entities::{Flag, FlagTier, Territory};
pub use error::{ClaimError, DomainError};
pub use ids::PlayerId;
pub use influence::{influence_for, BASE_INFLUENCE, MAX_INFLUENCE};

pub use value_objects::{
    CellKey, ClanName, ClanRelation, ClanStanding, ProtectionTier, TierThresholds, WorldLocation,
    WorldName, CELL_SIZE,
};
