//! Raid engine - area influence penalties.

use std::sync::Arc;

use holdfast_domain::{CellKey, ClanName, Territory, WorldLocation};

use crate::stores::{TerritoryIndex, TerritoryStore};

/// Cells within Euclidean distance `radius` of `center`, in the center's
/// world. Offsets that would leave the `i32` grid are skipped, so every cell
/// appears once. Empty for a negative radius.
pub fn raid_footprint(center: &CellKey, radius: i32) -> impl Iterator<Item = CellKey> + '_ {
    let span = if radius < 0 { 1..=0 } else { -radius..=radius };
    span.clone()
        .flat_map(move |dx| span.clone().map(move |dz| (dx, dz)))
        .filter_map(move |(dx, dz)| center.offset(dx, dz))
        .filter(move |key| center.within_radius(key, radius))
}

/// Claimed cells within `radius` of `center`, in key order.
///
/// Walks the footprint while it is smaller than the table and scans the
/// table otherwise, so the cost is bounded by whichever is smaller.
fn claimed_in_radius(index: &TerritoryIndex, center: &CellKey, radius: i32) -> Vec<CellKey> {
    if radius < 0 {
        return Vec::new();
    }
    let side = 2 * u64::from(radius.unsigned_abs()) + 1;
    let claimed = u64::try_from(index.len()).unwrap_or(u64::MAX);
    let mut keys: Vec<CellKey> = if side.saturating_mul(side) > claimed {
        index
            .keys()
            .filter(|key| center.within_radius(key, radius))
            .cloned()
            .collect()
    } else {
        raid_footprint(center, radius)
            .filter(|key| index.contains(key))
            .collect()
    };
    keys.sort();
    keys
}

pub struct RaidEngine {
    store: Arc<TerritoryStore>,
}

impl RaidEngine {
    pub fn new(store: Arc<TerritoryStore>) -> Self {
        Self { store }
    }

    /// Territories whose cell lies within `radius` cells of the cell
    /// containing `center`, in key order. Empty if `center` is not a finite
    /// point.
    pub async fn territories_in_radius(
        &self,
        center: &WorldLocation,
        radius: i32,
    ) -> Vec<Territory> {
        if !center.is_finite() {
            return Vec::new();
        }
        let center_cell = center.cell();
        self.store
            .read(|index| {
                claimed_in_radius(index, &center_cell, radius)
                    .iter()
                    .filter_map(|key| index.get(key).cloned())
                    .collect()
            })
            .await
    }

    /// Cut influence to three quarters in every territory within `radius`,
    /// whoever owns it. Flags are left alone, so the next flag edit restores
    /// the full value. Returns false if nothing was in range.
    pub async fn initiate_raid(
        &self,
        center: &WorldLocation,
        raiding_clan: &ClanName,
        radius: i32,
    ) -> bool {
        if !center.is_finite() {
            tracing::debug!(raider = %raiding_clan, "Raid center is not a finite location");
            return false;
        }
        let center_cell = center.cell();

        let hit = self
            .store
            .mutate(|index| {
                let mut hit = Vec::new();
                for key in claimed_in_radius(index, &center_cell, radius) {
                    if let Some(territory) = index.get_mut(&key) {
                        let before = territory.apply_raid();
                        hit.push((key, before, territory.influence()));
                    }
                }
                if !hit.is_empty() {
                    index.touch();
                }
                Ok::<_, std::convert::Infallible>(hit)
            })
            .await;
        let hit = match hit {
            Ok(hit) => hit,
            Err(never) => match never {},
        };

        if hit.is_empty() {
            tracing::debug!(
                raider = %raiding_clan,
                center = %center_cell,
                radius,
                "Raid found no territory"
            );
            return false;
        }

        for (key, before, after) in &hit {
            tracing::debug!(cell = %key, before, after, "Territory raided");
        }
        tracing::info!(
            raider = %raiding_clan,
            center = %center_cell,
            radius,
            affected = hit.len(),
            "Raid applied"
        );
        true
    }
}
