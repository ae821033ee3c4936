//! Infrastructure implementations.
//!
//! Port traits and the adapters that implement them, plus configuration and
//! the background decay worker.

pub mod clock;
pub mod config;
pub mod decay_worker;
pub mod in_memory;
pub mod persistence;
pub mod ports;
