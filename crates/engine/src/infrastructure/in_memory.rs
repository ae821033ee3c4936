//! In-memory collaborator directories.
//!
//! The host normally backs [`ClanDirectory`] and [`WorldDirectory`] with its
//! own registries. These DashMap-backed versions serve the standalone binary
//! and tests, and are safe to update while the engines read them.

use std::collections::HashSet;

use dashmap::{DashMap, DashSet};
use holdfast_domain::{ClanName, ClanRelation, ClanStanding, WorldName};

use crate::infrastructure::ports::{ClanDirectory, WorldDirectory};

/// Clan standings and pairwise relations.
#[derive(Default)]
pub struct InMemoryClanDirectory {
    standings: DashMap<ClanName, ClanStanding>,
    allies: DashMap<ClanName, HashSet<ClanName>>,
    enemies: DashMap<ClanName, HashSet<ClanName>>,
}

impl InMemoryClanDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_standing(&self, clan: ClanName, standing: ClanStanding) {
        self.standings.insert(clan, standing);
    }

    /// Record a mutual alliance. Any rivalry between the two is dropped.
    pub fn add_alliance(&self, a: &ClanName, b: &ClanName) {
        Self::unlink(&self.enemies, a, b);
        Self::link(&self.allies, a, b);
    }

    /// Record a mutual rivalry. Any alliance between the two is dropped.
    pub fn add_rivalry(&self, a: &ClanName, b: &ClanName) {
        Self::unlink(&self.allies, a, b);
        Self::link(&self.enemies, a, b);
    }

    fn link(map: &DashMap<ClanName, HashSet<ClanName>>, a: &ClanName, b: &ClanName) {
        map.entry(a.clone()).or_default().insert(b.clone());
        map.entry(b.clone()).or_default().insert(a.clone());
    }

    fn unlink(map: &DashMap<ClanName, HashSet<ClanName>>, a: &ClanName, b: &ClanName) {
        if let Some(mut set) = map.get_mut(a) {
            set.remove(b);
        }
        if let Some(mut set) = map.get_mut(b) {
            set.remove(a);
        }
    }

    fn related(map: &DashMap<ClanName, HashSet<ClanName>>, a: &ClanName, b: &ClanName) -> bool {
        map.get(a).map(|set| set.contains(b)).unwrap_or(false)
    }
}

impl ClanDirectory for InMemoryClanDirectory {
    fn standing(&self, clan: &ClanName) -> ClanStanding {
        self.standings
            .get(clan)
            .map(|s| *s.value())
            .unwrap_or_default()
    }

    fn relation(&self, actor: &ClanName, owner: &ClanName) -> ClanRelation {
        if actor == owner {
            ClanRelation::Member
        } else if Self::related(&self.allies, actor, owner) {
            ClanRelation::Ally
        } else if Self::related(&self.enemies, actor, owner) {
            ClanRelation::Enemy
        } else {
            ClanRelation::Neutral
        }
    }
}

/// The set of loaded worlds.
#[derive(Default)]
pub struct InMemoryWorldDirectory {
    worlds: DashSet<WorldName>,
}

impl InMemoryWorldDirectory {
    pub fn new<I>(worlds: I) -> Self
    where
        I: IntoIterator<Item = WorldName>,
    {
        let directory = Self::default();
        for world in worlds {
            directory.worlds.insert(world);
        }
        directory
    }

    pub fn add(&self, world: WorldName) {
        self.worlds.insert(world);
    }

    pub fn remove(&self, world: &WorldName) {
        self.worlds.remove(world);
    }
}

impl WorldDirectory for InMemoryWorldDirectory {
    fn exists(&self, world: &WorldName) -> bool {
        self.worlds.contains(world)
    }
}
