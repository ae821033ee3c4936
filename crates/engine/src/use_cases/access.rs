//! Permission queries derived from protection tier and clan relation.
//!
//! | relation        | build            | interact                 |
//! |-----------------|------------------|--------------------------|
//! | member          | always           | always                   |
//! | ally            | unless Core      | always                   |
//! | enemy / neutral | Frontier only    | Frontier or Contested    |
//!
//! Unclaimed cells allow everything. PvP is off in Core and Secure cells.

use std::sync::Arc;

use holdfast_domain::{CellKey, ClanName, ClanRelation, ProtectionTier, TierThresholds};

use crate::infrastructure::ports::ClanDirectory;
use crate::stores::TerritoryStore;

pub struct TerritoryAccess {
    store: Arc<TerritoryStore>,
    clans: Arc<dyn ClanDirectory>,
    thresholds: TierThresholds,
}

impl TerritoryAccess {
    pub fn new(
        store: Arc<TerritoryStore>,
        clans: Arc<dyn ClanDirectory>,
        thresholds: TierThresholds,
    ) -> Self {
        Self {
            store,
            clans,
            thresholds,
        }
    }

    /// The breakpoints tiers are computed with.
    pub fn thresholds(&self) -> &TierThresholds {
        &self.thresholds
    }

    /// Tier of a claimed cell, `None` if unclaimed.
    pub async fn protection_tier(&self, cell: &CellKey) -> Option<ProtectionTier> {
        self.store
            .get_territory(cell)
            .await
            .map(|t| t.protection_tier(&self.thresholds))
    }

    /// `actor_clan` is `None` for a player outside any clan.
    pub async fn can_build(&self, actor_clan: Option<&ClanName>, cell: &CellKey) -> bool {
        match self.lookup(actor_clan, cell).await {
            None => true,
            Some((relation, tier)) => build_allowed(relation, tier),
        }
    }

    pub async fn can_interact(&self, actor_clan: Option<&ClanName>, cell: &CellKey) -> bool {
        match self.lookup(actor_clan, cell).await {
            None => true,
            Some((relation, tier)) => interact_allowed(relation, tier),
        }
    }

    pub async fn is_pvp_enabled(&self, cell: &CellKey) -> bool {
        self.protection_tier(cell).await.map_or(true, pvp_allowed)
    }

    async fn lookup(
        &self,
        actor_clan: Option<&ClanName>,
        cell: &CellKey,
    ) -> Option<(ClanRelation, ProtectionTier)> {
        let territory = self.store.get_territory(cell).await?;
        let relation = match actor_clan {
            Some(actor) => self.clans.relation(actor, territory.clan()),
            None => ClanRelation::Neutral,
        };
        Some((relation, territory.protection_tier(&self.thresholds)))
    }
}

fn build_allowed(relation: ClanRelation, tier: ProtectionTier) -> bool {
    match relation {
        ClanRelation::Member => true,
        ClanRelation::Ally => tier != ProtectionTier::Core,
        ClanRelation::Enemy | ClanRelation::Neutral => tier == ProtectionTier::Frontier,
    }
}

fn interact_allowed(relation: ClanRelation, tier: ProtectionTier) -> bool {
    match relation {
        ClanRelation::Member | ClanRelation::Ally => true,
        ClanRelation::Enemy | ClanRelation::Neutral => {
            matches!(tier, ProtectionTier::Frontier | ProtectionTier::Contested)
        }
    }
}

fn pvp_allowed(tier: ProtectionTier) -> bool {
    matches!(tier, ProtectionTier::Contested | ProtectionTier::Frontier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockClanDirectory;
    use crate::test_fixtures::{cell, clan, recording_repo, territory};
    use holdfast_domain::{Flag, FlagTier, PlayerId, Territory};

    /// Axis holds (0,0) at the given influence; Borealis is allied, Crimson hostile.
    async fn access_with_influence(influence: u8) -> TerritoryAccess {
        let (repo, _) = recording_repo();
        let store = Arc::new(TerritoryStore::new(repo));
        let held = Territory::restore(
            cell(0, 0),
            clan("Axis"),
            influence,
            crate::test_fixtures::now(),
            Vec::new(),
        );
        store
            .mutate(|index| {
                index.insert(held);
                Ok::<_, ()>(())
            })
            .await
            .unwrap();

        let mut clans = MockClanDirectory::new();
        clans.expect_relation().returning(|actor, owner| {
            match (actor.as_str(), owner.as_str()) {
                (a, o) if a == o => ClanRelation::Member,
                ("Borealis", "Axis") => ClanRelation::Ally,
                ("Crimson", "Axis") => ClanRelation::Enemy,
                _ => ClanRelation::Neutral,
            }
        });
        TerritoryAccess::new(store, Arc::new(clans), TierThresholds::default())
    }

    mod rules {
        use super::*;

        #[test]
        fn build_table() {
            use ClanRelation::*;
            use ProtectionTier::*;
            assert!(build_allowed(Member, Core));
            assert!(!build_allowed(Ally, Core));
            assert!(build_allowed(Ally, Secure));
            assert!(!build_allowed(Enemy, Contested));
            assert!(build_allowed(Enemy, Frontier));
            assert!(!build_allowed(Neutral, Secure));
            assert!(build_allowed(Neutral, Frontier));
        }

        #[test]
        fn interact_table() {
            use ClanRelation::*;
            use ProtectionTier::*;
            assert!(interact_allowed(Ally, Core));
            assert!(!interact_allowed(Enemy, Secure));
            assert!(interact_allowed(Enemy, Contested));
            assert!(interact_allowed(Neutral, Frontier));
            assert!(!interact_allowed(Neutral, Core));
        }

        #[test]
        fn pvp_table() {
            assert!(!pvp_allowed(ProtectionTier::Core));
            assert!(!pvp_allowed(ProtectionTier::Secure));
            assert!(pvp_allowed(ProtectionTier::Contested));
            assert!(pvp_allowed(ProtectionTier::Frontier));
        }
    }

    #[tokio::test]
    async fn unclaimed_cells_are_open() {
        let access = access_with_influence(100).await;
        assert!(access.can_build(Some(&clan("Crimson")), &cell(9, 9)).await);
        assert!(access.can_interact(None, &cell(9, 9)).await);
        assert!(access.is_pvp_enabled(&cell(9, 9)).await);
        assert_eq!(access.protection_tier(&cell(9, 9)).await, None);
    }

    #[tokio::test]
    async fn core_cell_shuts_out_everyone_but_members() {
        let access = access_with_influence(80).await;
        let here = cell(0, 0);
        assert_eq!(access.protection_tier(&here).await, Some(ProtectionTier::Core));
        assert!(access.can_build(Some(&clan("Axis")), &here).await);
        assert!(!access.can_build(Some(&clan("Borealis")), &here).await);
        assert!(access.can_interact(Some(&clan("Borealis")), &here).await);
        assert!(!access.can_interact(Some(&clan("Crimson")), &here).await);
        assert!(!access.can_build(None, &here).await);
        assert!(!access.is_pvp_enabled(&here).await);
    }

    #[tokio::test]
    async fn contested_cell_opens_interaction_and_pvp() {
        let access = access_with_influence(30).await;
        let here = cell(0, 0);
        assert_eq!(access.protection_tier(&here).await, Some(ProtectionTier::Contested));
        assert!(access.can_interact(Some(&clan("Crimson")), &here).await);
        assert!(!access.can_build(Some(&clan("Crimson")), &here).await);
        assert!(access.is_pvp_enabled(&here).await);
    }

    #[tokio::test]
    async fn frontier_cell_lets_outsiders_build() {
        let access = access_with_influence(10).await;
        assert!(access.can_build(None, &cell(0, 0)).await);
        assert!(access.can_build(Some(&clan("Crimson")), &cell(0, 0)).await);
    }

    #[tokio::test]
    async fn custom_thresholds_move_the_breakpoints() {
        let (repo, _) = recording_repo();
        let store = Arc::new(TerritoryStore::new(repo));
        let mut held = territory("Axis", 0, 0);
        held.add_flag(
            Flag::new(crate::test_fixtures::inside(0, 0), PlayerId::new(), crate::test_fixtures::now())
                .with_tier(FlagTier::MAX),
        )
        .unwrap();
        store
            .mutate(|index| {
                index.insert(held);
                Ok::<_, ()>(())
            })
            .await
            .unwrap();

        let mut clans = MockClanDirectory::new();
        clans.expect_relation().returning(|_, _| ClanRelation::Neutral);
        let thresholds = TierThresholds::new(90, 80, 70).unwrap();
        let access = TerritoryAccess::new(store, Arc::new(clans), thresholds);

        // Influence 70 is Secure by default but Contested here
        assert_eq!(access.protection_tier(&cell(0, 0)).await, Some(ProtectionTier::Contested));
        assert!(access.is_pvp_enabled(&cell(0, 0)).await);
    }
}
