//! Territory store - the shared claim table.
//!
//! # Locking
//!
//! Both indexes (cell -> territory, clan -> cells) live in one
//! [`TerritoryIndex`] behind a single `RwLock`. Every mutation validates and
//! applies under the write lock, so no reader ever sees one index updated
//! without the other, and two claims of the same cell or two unclaims racing
//! a connectivity check are serialized.
//!
//! # Write-through
//!
//! A mutation that changed anything bumps the index revision and captures a
//! full snapshot before the write lock is released. The snapshot is written
//! afterwards under a separate persistence mutex, so disk I/O never blocks
//! claims. Snapshots older than the last one written are discarded.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use holdfast_domain::{CellKey, ClanName, ProtectionTier, Territory, TierThresholds};

use crate::infrastructure::persistence::TerritoryDocument;
use crate::infrastructure::ports::{RepoError, TerritoryRepo, WorldDirectory};

/// Per-tier counts for one clan, for dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClanTerritorySummary {
    pub total: usize,
    pub core: usize,
    pub secure: usize,
    pub contested: usize,
    pub frontier: usize,
    pub flags: usize,
}

/// The claim table. Only reachable through [`TerritoryStore::mutate`] and the
/// store's read methods.
#[derive(Default)]
pub(crate) struct TerritoryIndex {
    by_cell: HashMap<CellKey, Territory>,
    by_clan: HashMap<ClanName, HashSet<CellKey>>,
    revision: u64,
    dirty: bool,
}

impl TerritoryIndex {
    pub(crate) fn get(&self, key: &CellKey) -> Option<&Territory> {
        self.by_cell.get(key)
    }

    pub(crate) fn contains(&self, key: &CellKey) -> bool {
        self.by_cell.contains_key(key)
    }

    /// Mutable access. Call [`TerritoryIndex::touch`] after changing anything.
    pub(crate) fn get_mut(&mut self, key: &CellKey) -> Option<&mut Territory> {
        self.by_cell.get_mut(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.by_cell.len()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &CellKey> {
        self.by_cell.keys()
    }

    pub(crate) fn clan_cells(&self, clan: &ClanName) -> Option<&HashSet<CellKey>> {
        self.by_clan.get(clan)
    }

    pub(crate) fn clan_count(&self, clan: &ClanName) -> usize {
        self.by_clan.get(clan).map_or(0, HashSet::len)
    }

    pub(crate) fn insert(&mut self, territory: Territory) {
        let key = territory.key().clone();
        if let Some(previous) = self.by_cell.get(&key) {
            let previous_clan = previous.clan().clone();
            self.unlink(&previous_clan, &key);
        }
        self.by_clan
            .entry(territory.clan().clone())
            .or_default()
            .insert(key.clone());
        self.by_cell.insert(key, territory);
        self.touch();
    }

    pub(crate) fn remove(&mut self, key: &CellKey) -> Option<Territory> {
        let territory = self.by_cell.remove(key)?;
        self.unlink(territory.clan(), key);
        self.touch();
        Some(territory)
    }

    /// Drop every territory of `clan`.
    pub(crate) fn remove_clan(&mut self, clan: &ClanName) -> Vec<Territory> {
        let Some(cells) = self.by_clan.remove(clan) else {
            return Vec::new();
        };
        let removed: Vec<Territory> = cells
            .iter()
            .filter_map(|key| self.by_cell.remove(key))
            .collect();
        if !removed.is_empty() {
            self.touch();
        }
        removed
    }

    pub(crate) fn territories_mut(&mut self) -> impl Iterator<Item = &mut Territory> {
        self.by_cell.values_mut()
    }

    /// Mark the index as changed so the current mutation is persisted.
    pub(crate) fn touch(&mut self) {
        self.dirty = true;
    }

    fn unlink(&mut self, clan: &ClanName, key: &CellKey) {
        if let Some(cells) = self.by_clan.get_mut(clan) {
            cells.remove(key);
            if cells.is_empty() {
                self.by_clan.remove(clan);
            }
        }
    }

    fn snapshot(&self) -> TerritoryDocument {
        TerritoryDocument::from_territories(self.by_cell.values())
    }
}

/// Shared, lock-protected territory table with write-through persistence.
pub struct TerritoryStore {
    index: RwLock<TerritoryIndex>,
    repo: Arc<dyn TerritoryRepo>,
    /// Revision of the last snapshot successfully written
    written: Mutex<u64>,
}

impl TerritoryStore {
    /// An empty store.
    pub fn new(repo: Arc<dyn TerritoryRepo>) -> Self {
        Self {
            index: RwLock::new(TerritoryIndex::default()),
            repo,
            written: Mutex::new(0),
        }
    }

    /// Load the persisted store.
    ///
    /// Never fails: a missing or unreadable document yields an empty store,
    /// and records that cannot be restored (unknown world, bad fields,
    /// duplicate cells) are skipped with a warning.
    pub async fn load(repo: Arc<dyn TerritoryRepo>, worlds: &dyn WorldDirectory) -> Self {
        let document = match repo.load().await {
            Ok(Some(document)) => document,
            Ok(None) => {
                tracing::warn!("No territory data found, starting with an empty store");
                TerritoryDocument::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load territory data, starting with an empty store");
                TerritoryDocument::default()
            }
        };

        let mut index = TerritoryIndex::default();
        let mut skipped = 0usize;
        for record in &document.territories {
            let restored = match record.restore(worlds) {
                Ok(restored) => restored,
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(
                        world = %record.world_name,
                        x = record.chunk_x,
                        z = record.chunk_z,
                        error = %e,
                        "Skipping territory record"
                    );
                    continue;
                }
            };
            for e in &restored.skipped_flags {
                tracing::warn!(
                    cell = %restored.territory.key(),
                    error = %e,
                    "Skipping flag record"
                );
            }
            if index.contains(restored.territory.key()) {
                skipped += 1;
                tracing::warn!(
                    cell = %restored.territory.key(),
                    "Skipping duplicate territory record"
                );
                continue;
            }
            index.insert(restored.territory);
        }

        index.dirty = false;
        tracing::info!(
            territories = index.by_cell.len(),
            clans = index.by_clan.len(),
            skipped,
            "Territory store loaded"
        );

        Self {
            index: RwLock::new(index),
            repo,
            written: Mutex::new(0),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn get_territory(&self, key: &CellKey) -> Option<Territory> {
        self.index.read().await.get(key).cloned()
    }

    /// A clan's territories in cell-key order.
    pub async fn get_clan_territories(&self, clan: &ClanName) -> Vec<Territory> {
        let index = self.index.read().await;
        let mut territories: Vec<Territory> = index
            .clan_cells(clan)
            .into_iter()
            .flatten()
            .filter_map(|key| index.get(key).cloned())
            .collect();
        territories.sort_by(|a, b| a.key().cmp(b.key()));
        territories
    }

    pub async fn get_clan_territory_count(&self, clan: &ClanName) -> usize {
        self.index.read().await.clan_count(clan)
    }

    pub async fn clan_cells(&self, clan: &ClanName) -> HashSet<CellKey> {
        self.index
            .read()
            .await
            .clan_cells(clan)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn len(&self) -> usize {
        self.index.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clan_names(&self) -> Vec<ClanName> {
        let mut names: Vec<ClanName> = self.index.read().await.by_clan.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn clan_summary(
        &self,
        clan: &ClanName,
        thresholds: &TierThresholds,
    ) -> ClanTerritorySummary {
        let index = self.index.read().await;
        let mut summary = ClanTerritorySummary::default();
        for territory in index
            .clan_cells(clan)
            .into_iter()
            .flatten()
            .filter_map(|key| index.get(key))
        {
            summary.total += 1;
            summary.flags += territory.flags().len();
            match territory.protection_tier(thresholds) {
                ProtectionTier::Core => summary.core += 1,
                ProtectionTier::Secure => summary.secure += 1,
                ProtectionTier::Contested => summary.contested += 1,
                ProtectionTier::Frontier => summary.frontier += 1,
            }
        }
        summary
    }

    /// Run `op` against one consistent view of the index.
    pub(crate) async fn read<T>(&self, op: impl FnOnce(&TerritoryIndex) -> T) -> T {
        let index = self.index.read().await;
        op(&*index)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Run `op` under the write lock. If it changed the index, the new state
    /// is persisted after the lock is released. Save failures are logged and
    /// do not affect the returned result.
    pub(crate) async fn mutate<T, E>(
        &self,
        op: impl FnOnce(&mut TerritoryIndex) -> Result<T, E>,
    ) -> Result<T, E> {
        let (result, pending) = {
            let mut index = self.index.write().await;
            index.dirty = false;
            let result = op(&mut *index);
            let pending = if index.dirty {
                index.dirty = false;
                index.revision += 1;
                Some((index.snapshot(), index.revision))
            } else {
                None
            };
            (result, pending)
        };

        if let Some((snapshot, revision)) = pending {
            if let Err(e) = self.persist(snapshot, revision).await {
                tracing::error!(error = %e, revision, "Failed to save territories");
            }
        }
        result
    }

    /// Lower every territory's influence by `points`, saturating at zero.
    /// Returns how many territories changed.
    pub async fn decay_influence(&self, points: u8) -> usize {
        let changed = self
            .mutate(|index| {
                let mut changed = 0usize;
                for territory in index.territories_mut() {
                    if territory.apply_decay(points) {
                        changed += 1;
                    }
                }
                if changed > 0 {
                    index.touch();
                }
                Ok::<_, std::convert::Infallible>(changed)
            })
            .await;
        let changed = match changed {
            Ok(n) => n,
            Err(never) => match never {},
        };
        if changed > 0 {
            tracing::debug!(points, changed, "Influence decayed");
        }
        changed
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write the current state and report the outcome.
    ///
    /// Mutations persist on their own; this is for callers that need to know
    /// the data is durable (e.g. at shutdown).
    pub async fn flush(&self) -> Result<(), RepoError> {
        let (snapshot, revision) = {
            let index = self.index.read().await;
            (index.snapshot(), index.revision)
        };
        let mut written = self.written.lock().await;
        if revision > 0 && *written >= revision {
            return Ok(());
        }
        self.repo.save(&snapshot).await?;
        *written = revision;
        Ok(())
    }

    async fn persist(&self, snapshot: TerritoryDocument, revision: u64) -> Result<(), RepoError> {
        let mut written = self.written.lock().await;
        if *written >= revision {
            tracing::debug!(revision, last = *written, "Skipping stale territory snapshot");
            return Ok(());
        }
        self.repo.save(&snapshot).await?;
        *written = revision;
        Ok(())
    }
}
