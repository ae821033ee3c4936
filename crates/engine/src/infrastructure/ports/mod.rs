//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine. Ports exist for:
//! - Territory persistence (could swap the JSON file for a database)
//! - The clan registry and world list, owned by the host
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

pub use error::RepoError;
pub use external::{ClanDirectory, WorldDirectory};
pub use repos::TerritoryRepo;
pub use testing::ClockPort;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{MockClanDirectory, MockWorldDirectory};
#[cfg(test)]
pub use repos::MockTerritoryRepo;
#[cfg(test)]
pub use testing::MockClockPort;
