//! Domain entities - Core business objects with identity

mod flag;
mod territory;

pub use flag::{Flag, FlagTier};
pub use territory::Territory;
