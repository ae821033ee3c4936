//! End-to-end tests: engines wired through `App` over a real JSON file.

use std::sync::Arc;

use tempfile::tempdir;

use holdfast_domain::{ClaimError, ClanStanding, Flag, PlayerId, ProtectionTier};

use crate::infrastructure::config::TerritoryConfig;
use crate::infrastructure::in_memory::{InMemoryClanDirectory, InMemoryWorldDirectory};
use crate::infrastructure::persistence::JsonFileTerritoryRepo;
use crate::infrastructure::ports::{TerritoryRepo, WorldDirectory};
use crate::stores::TerritoryStore;
use crate::test_fixtures::{at, cell, clan, fixed_clock, inside, now, world};
use crate::App;

fn worlds() -> InMemoryWorldDirectory {
    InMemoryWorldDirectory::new([world()])
}

async fn app_at(path: &std::path::Path, clans: Arc<InMemoryClanDirectory>) -> App {
    let repo: Arc<dyn TerritoryRepo> = Arc::new(JsonFileTerritoryRepo::new(path));
    let store = Arc::new(TerritoryStore::load(repo, &worlds()).await);
    App::new(store, clans, fixed_clock(), &TerritoryConfig::default())
}

#[tokio::test]
async fn axis_walkthrough() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("territories.json");
    let app = app_at(&path, Arc::new(InMemoryClanDirectory::new())).await;
    let axis = clan("Axis");
    let player = PlayerId::new();

    // First claim: anywhere, one tier-1 flag
    let first = app
        .claims
        .claim(cell(0, 0), &axis, player, inside(0, 0))
        .await
        .unwrap();
    assert_eq!(first.influence(), 60);

    // Adjacent claim
    let second = app
        .claims
        .claim(cell(1, 0), &axis, player, inside(1, 0))
        .await
        .unwrap();
    assert_eq!(second.influence(), 60);

    // Not touching either
    assert_eq!(
        app.claims
            .claim(cell(5, 5), &axis, player, inside(5, 5))
            .await,
        Err(ClaimError::NotAdjacent)
    );

    // Upgrade the flag at (0,0)
    assert_eq!(
        app.claims
            .upgrade_flag(&cell(0, 0), &axis, &inside(0, 0))
            .await,
        Ok(true)
    );
    assert_eq!(
        app.store.get_territory(&cell(0, 0)).await.unwrap().influence(),
        65
    );

    // Two cells: removing either leaves one, trivially connected
    app.claims.unclaim(&cell(0, 0), &axis).await.unwrap();
    assert_eq!(app.store.get_clan_territory_count(&axis).await, 1);

    // Re-claim (0,0) and bring it back to 65
    app.claims
        .claim(cell(0, 0), &axis, player, inside(0, 0))
        .await
        .unwrap();
    app.claims
        .upgrade_flag(&cell(0, 0), &axis, &inside(0, 0))
        .await
        .unwrap();

    // Raid centered on (0,0), radius 1
    assert!(app.raids.initiate_raid(&inside(0, 0), &clan("Borealis"), 1).await);
    assert_eq!(
        app.store.get_territory(&cell(0, 0)).await.unwrap().influence(),
        48
    );
    assert_eq!(
        app.store.get_territory(&cell(1, 0)).await.unwrap().influence(),
        45
    );

    // The file already holds the raided values
    let reloaded = app_at(&path, Arc::new(InMemoryClanDirectory::new())).await;
    assert_eq!(
        reloaded.store.get_territory(&cell(0, 0)).await.unwrap().influence(),
        48
    );
    assert_eq!(
        reloaded.store.get_territory(&cell(1, 0)).await.unwrap().influence(),
        45
    );
}

#[tokio::test]
async fn restart_restores_an_equal_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data/territories.json");
    let clans = Arc::new(InMemoryClanDirectory::new());
    clans.set_standing(clan("Axis"), ClanStanding::new(2, 1, 0));

    let app = app_at(&path, clans.clone()).await;
    let axis = clan("Axis");
    let player = PlayerId::new();
    for x in 0..4 {
        app.claims
            .claim(cell(x, 0), &axis, player, inside(x, 0))
            .await
            .unwrap();
    }
    app.claims
        .add_flag(&cell(2, 0), &axis, Flag::new(at(40.0, 9.0), player, now()))
        .await
        .unwrap();
    app.claims
        .upgrade_flag(&cell(2, 0), &axis, &at(40.0, 9.0))
        .await
        .unwrap();
    app.claims
        .claim(cell(-10, -10), &clan("Borealis"), player, inside(-10, -10))
        .await
        .unwrap();
    app.raids
        .initiate_raid(&inside(-10, -10), &axis, 0)
        .await;
    app.store.flush().await.unwrap();

    let reloaded = app_at(&path, clans).await;
    assert_eq!(reloaded.store.len().await, app.store.len().await);
    for territory in app.store.get_clan_territories(&axis).await {
        assert_eq!(
            reloaded.store.get_territory(territory.key()).await,
            Some(territory)
        );
    }
    assert_eq!(
        reloaded.store.get_territory(&cell(-10, -10)).await,
        app.store.get_territory(&cell(-10, -10)).await
    );
}

#[tokio::test]
async fn vanished_world_is_dropped_on_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("territories.json");
    let app = app_at(&path, Arc::new(InMemoryClanDirectory::new())).await;
    let player = PlayerId::new();

    app.claims
        .claim(cell(0, 0), &clan("Axis"), player, inside(0, 0))
        .await
        .unwrap();
    let nether = holdfast_domain::WorldName::new("world_nether").unwrap();
    app.claims
        .claim(
            holdfast_domain::CellKey::new(nether.clone(), 0, 0),
            &clan("Borealis"),
            player,
            holdfast_domain::WorldLocation::new(nether.clone(), 1.0, 64.0, 1.0),
        )
        .await
        .unwrap();

    // Only "world" exists on the next start
    let only_overworld = worlds();
    assert!(!only_overworld.exists(&nether));
    let repo: Arc<dyn TerritoryRepo> = Arc::new(JsonFileTerritoryRepo::new(&path));
    let store = TerritoryStore::load(repo, &only_overworld).await;

    assert_eq!(store.len().await, 1);
    assert!(store.get_territory(&cell(0, 0)).await.is_some());
}

#[tokio::test]
async fn corrupt_file_starts_empty_and_is_replaced() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("territories.json");
    std::fs::write(&path, "{ this is not json").unwrap();

    let app = app_at(&path, Arc::new(InMemoryClanDirectory::new())).await;
    assert!(app.store.is_empty().await);

    app.claims
        .claim(cell(0, 0), &clan("Axis"), PlayerId::new(), inside(0, 0))
        .await
        .unwrap();

    let reloaded = app_at(&path, Arc::new(InMemoryClanDirectory::new())).await;
    assert_eq!(reloaded.store.len().await, 1);
}

#[tokio::test]
async fn permissions_follow_raids_and_alliances() {
    let dir = tempdir().unwrap();
    let clans = Arc::new(InMemoryClanDirectory::new());
    clans.add_alliance(&clan("Axis"), &clan("Borealis"));
    clans.add_rivalry(&clan("Axis"), &clan("Crimson"));
    let app = app_at(&dir.path().join("t.json"), clans).await;
    let axis = clan("Axis");
    let player = PlayerId::new();

    app.claims
        .claim(cell(0, 0), &axis, player, inside(0, 0))
        .await
        .unwrap();
    app.claims
        .add_flag(&cell(0, 0), &axis, Flag::new(at(2.0, 2.0), player, now()))
        .await
        .unwrap();
    app.claims
        .upgrade_flag(&cell(0, 0), &axis, &at(2.0, 2.0))
        .await
        .unwrap();

    // 50 + 10 + 15 = 75
    let here = cell(0, 0);
    assert_eq!(app.access.protection_tier(&here).await, Some(ProtectionTier::Core));
    assert!(!app.access.can_build(Some(&clan("Borealis")), &here).await);
    assert!(app.access.can_interact(Some(&clan("Borealis")), &here).await);
    assert!(!app.access.can_interact(Some(&clan("Crimson")), &here).await);
    assert!(!app.access.is_pvp_enabled(&here).await);

    // 75 -> 56 -> 42
    app.raids.initiate_raid(&inside(0, 0), &clan("Crimson"), 0).await;
    app.raids.initiate_raid(&inside(0, 0), &clan("Crimson"), 0).await;
    assert_eq!(
        app.access.protection_tier(&here).await,
        Some(ProtectionTier::Contested)
    );
    assert!(app.access.can_interact(Some(&clan("Crimson")), &here).await);
    assert!(!app.access.can_build(Some(&clan("Crimson")), &here).await);
    assert!(app.access.is_pvp_enabled(&here).await);
    assert!(app.access.can_build(Some(&clan("Borealis")), &here).await);
}
