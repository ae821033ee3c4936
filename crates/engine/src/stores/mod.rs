//! In-memory state storage.
//!
//! - `TerritoryStore` - the claim table, its clan index and write-through persistence

pub mod territory;

pub use territory::{ClanTerritorySummary, TerritoryStore};
pub(crate) use territory::TerritoryIndex;
