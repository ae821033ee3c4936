//! Holdfast Engine library.
//!
//! Territory control: clans claim cells, plant flags that build influence,
//! and lose influence to raids and decay.
//!
//! ## Structure
//!
//! - `stores/` - The shared territory table and its write-through persistence
//! - `use_cases/` - Claim, raid and permission engines
//! - `infrastructure/` - Ports, adapters, configuration and background workers
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

/// Shared helpers for unit tests.
#[cfg(test)]
pub mod test_fixtures;

/// End-to-end tests against a real JSON file.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
