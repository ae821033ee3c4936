//! Repository port for territory persistence.

use async_trait::async_trait;

use super::error::RepoError;
use crate::infrastructure::persistence::TerritoryDocument;

/// Durable storage for the full territory snapshot.
///
/// Saves always replace the whole document; there is no incremental write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TerritoryRepo: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<TerritoryDocument>, RepoError>;
    async fn save(&self, document: &TerritoryDocument) -> Result<(), RepoError>;
}
