//! Use cases - territory operations.
//!
//! Each engine orchestrates the store and the external directories to fulfil
//! one family of requests.

pub mod access;
pub mod claims;
pub mod raids;

pub use access::TerritoryAccess;
pub use claims::ClaimEngine;
pub use raids::{raid_footprint, RaidEngine};
