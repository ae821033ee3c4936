//! Influence arithmetic.
//!
//! Influence is an integer in `0..=MAX_INFLUENCE`. Left alone it is a pure
//! function of a territory's flags; raids and decay layer a transient penalty
//! on top that lasts until the next flag mutation.

use crate::entities::FlagTier;

/// Influence of a claimed cell with no flags.
pub const BASE_INFLUENCE: u8 = 50;

/// Influence ceiling.
pub const MAX_INFLUENCE: u8 = 100;

/// `min(100, 50 + sum of flag contributions)`.
pub fn influence_for<I>(tiers: I) -> u8
where
    I: IntoIterator<Item = FlagTier>,
{
    let total = tiers
        .into_iter()
        .fold(u32::from(BASE_INFLUENCE), |acc, tier| {
            acc.saturating_add(u32::from(tier.contribution()))
        });
    total.min(u32::from(MAX_INFLUENCE)) as u8
}

/// A raid leaves three quarters of the influence, rounded down.
pub fn after_raid(influence: u8) -> u8 {
    (u16::from(influence) * 3 / 4) as u8
}

/// Decay removes a flat number of points, never going below zero.
pub fn after_decay(influence: u8, points: u8) -> u8 {
    influence.saturating_sub(points)
}
