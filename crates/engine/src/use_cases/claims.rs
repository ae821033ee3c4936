//! Claim engine - claim, unclaim and flag edits.
//!
//! Every operation validates and applies under the store's write lock, so the
//! adjacency, capacity and connectivity checks always see the clan's current
//! cell set.

use std::sync::Arc;

use holdfast_domain::connectivity::is_connected_without;
use holdfast_domain::{CellKey, ClaimError, ClanName, Flag, PlayerId, Territory, WorldLocation};

use crate::infrastructure::ports::{ClanDirectory, ClockPort};
use crate::stores::{TerritoryIndex, TerritoryStore};

pub struct ClaimEngine {
    store: Arc<TerritoryStore>,
    clans: Arc<dyn ClanDirectory>,
    clock: Arc<dyn ClockPort>,
}

impl ClaimEngine {
    pub fn new(
        store: Arc<TerritoryStore>,
        clans: Arc<dyn ClanDirectory>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            store,
            clans,
            clock,
        }
    }

    /// Claim `cell` for `clan`, planting a tier-1 flag at the actor's location.
    ///
    /// A clan's first claim may be anywhere; later claims must border a cell
    /// the clan already holds. The actor must be standing in `cell`.
    ///
    /// # Errors
    ///
    /// `AlreadyClaimed`, `LimitReached` or `NotAdjacent`, checked in that order,
    /// then `NotOwner` if `actor_location` is not inside `cell`.
    pub async fn claim(
        &self,
        cell: CellKey,
        clan: &ClanName,
        placed_by: PlayerId,
        actor_location: WorldLocation,
    ) -> Result<Territory, ClaimError> {
        let max = self.max_claims(clan);
        let now = self.clock.now();

        let result = self
            .store
            .mutate(|index| {
                if index.contains(&cell) {
                    return Err(ClaimError::AlreadyClaimed);
                }

                let current = index.clan_count(clan);
                let current = u32::try_from(current).unwrap_or(u32::MAX);
                if current >= max {
                    return Err(ClaimError::limit_reached(current, max));
                }

                if current > 0 && !borders_clan(index, clan, &cell) {
                    return Err(ClaimError::NotAdjacent);
                }

                let mut territory = Territory::new(cell.clone(), clan.clone(), now);
                territory.add_flag(Flag::new(actor_location, placed_by, now))?;
                index.insert(territory.clone());
                Ok(territory)
            })
            .await;

        match &result {
            Ok(territory) => tracing::info!(
                clan = %clan,
                cell = %cell,
                influence = territory.influence(),
                "Cell claimed"
            ),
            Err(e) => tracing::debug!(clan = %clan, cell = %cell, error = %e, "Claim rejected"),
        }
        result
    }

    /// Give up `cell`. Fails if the clan's remaining cells would split apart.
    ///
    /// # Errors
    ///
    /// `NotOwner` if `clan` does not hold the cell, `WouldFragment` if the
    /// removal would disconnect the rest.
    pub async fn unclaim(&self, cell: &CellKey, clan: &ClanName) -> Result<(), ClaimError> {
        let result = self
            .store
            .mutate(|index| {
                owned(index, cell, clan)?;
                let still_connected = index
                    .clan_cells(clan)
                    .map_or(true, |cells| is_connected_without(cells, cell));
                if !still_connected {
                    return Err(ClaimError::WouldFragment);
                }
                index.remove(cell);
                Ok(())
            })
            .await;

        match &result {
            Ok(()) => tracing::info!(clan = %clan, cell = %cell, "Cell unclaimed"),
            Err(e) => tracing::debug!(clan = %clan, cell = %cell, error = %e, "Unclaim rejected"),
        }
        result
    }

    /// Plant another flag in a cell the clan holds.
    ///
    /// # Errors
    ///
    /// `NotOwner` if `clan` does not hold the cell or the flag stands outside
    /// it, `AlreadyClaimed` if its block already holds a flag.
    pub async fn add_flag(
        &self,
        cell: &CellKey,
        clan: &ClanName,
        flag: Flag,
    ) -> Result<Territory, ClaimError> {
        let tier = flag.tier();
        let result = self
            .store
            .mutate(|index| {
                let territory = owned_mut(index, cell, clan)?;
                territory.add_flag(flag)?;
                let updated = territory.clone();
                index.touch();
                Ok(updated)
            })
            .await;

        match &result {
            Ok(territory) => tracing::debug!(
                clan = %clan,
                cell = %cell,
                tier = %tier,
                influence = territory.influence(),
                "Flag added"
            ),
            Err(e) => tracing::debug!(clan = %clan, cell = %cell, error = %e, "Flag rejected"),
        }
        result
    }

    /// Take down the flag standing at `location`.
    ///
    /// # Errors
    ///
    /// `NotOwner` if `clan` does not hold the cell, `FlagNotFound` if no flag
    /// stands there.
    pub async fn remove_flag(
        &self,
        cell: &CellKey,
        clan: &ClanName,
        location: &WorldLocation,
    ) -> Result<Flag, ClaimError> {
        let result = self
            .store
            .mutate(|index| {
                let territory = owned_mut(index, cell, clan)?;
                let removed = territory.remove_flag(location)?;
                index.touch();
                Ok(removed)
            })
            .await;

        if result.is_ok() {
            tracing::debug!(clan = %clan, cell = %cell, "Flag removed");
        }
        result
    }

    /// Raise the flag at `location` one tier. Returns `false`, changing
    /// nothing, when it is already at the top tier.
    ///
    /// # Errors
    ///
    /// `NotOwner` if `clan` does not hold the cell, `FlagNotFound` if no flag
    /// stands there.
    pub async fn upgrade_flag(
        &self,
        cell: &CellKey,
        clan: &ClanName,
        location: &WorldLocation,
    ) -> Result<bool, ClaimError> {
        let result = self
            .store
            .mutate(|index| {
                let territory = owned_mut(index, cell, clan)?;
                match territory.upgrade_flag(location) {
                    Ok(tier) => {
                        index.touch();
                        Ok(Some(tier))
                    }
                    Err(ClaimError::MaxTierReached) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await;

        match result {
            Ok(Some(tier)) => {
                tracing::debug!(clan = %clan, cell = %cell, tier = %tier, "Flag upgraded");
                Ok(true)
            }
            Ok(None) => {
                tracing::debug!(clan = %clan, cell = %cell, "Flag already at max tier");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Drop every cell a clan holds, e.g. when it disbands. Returns the count.
    pub async fn release_clan(&self, clan: &ClanName) -> usize {
        let released = self
            .store
            .mutate(|index| Ok::<_, ClaimError>(index.remove_clan(clan).len()))
            .await
            .unwrap_or(0);

        if released > 0 {
            tracing::info!(clan = %clan, released, "Clan territory released");
        }
        released
    }

    /// `10 + 2*members + 3*officers + 1*allies`.
    pub fn max_claims(&self, clan: &ClanName) -> u32 {
        self.clans.standing(clan).max_claims()
    }

    /// Claims the clan could still make.
    pub async fn remaining_claims(&self, clan: &ClanName) -> u32 {
        let current = self.store.get_clan_territory_count(clan).await;
        let current = u32::try_from(current).unwrap_or(u32::MAX);
        self.max_claims(clan).saturating_sub(current)
    }
}

fn borders_clan(index: &TerritoryIndex, clan: &ClanName, cell: &CellKey) -> bool {
    cell.neighbors()
        .any(|n| index.get(&n).is_some_and(|t| t.is_owned_by(clan)))
}

fn owned(index: &TerritoryIndex, cell: &CellKey, clan: &ClanName) -> Result<(), ClaimError> {
    match index.get(cell) {
        Some(t) if t.is_owned_by(clan) => Ok(()),
        _ => Err(ClaimError::NotOwner),
    }
}

fn owned_mut<'a>(
    index: &'a mut TerritoryIndex,
    cell: &CellKey,
    clan: &ClanName,
) -> Result<&'a mut Territory, ClaimError> {
    match index.get_mut(cell) {
        Some(t) if t.is_owned_by(clan) => Ok(t),
        _ => Err(ClaimError::NotOwner),
    }
}
