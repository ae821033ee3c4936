//! JSON file adapter for [`TerritoryRepo`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::records::TerritoryDocument;
use crate::infrastructure::ports::{RepoError, TerritoryRepo};

/// Stores the territory document as a single pretty-printed JSON file.
///
/// Saves go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous snapshot intact.
pub struct JsonFileTerritoryRepo {
    path: PathBuf,
}

impl JsonFileTerritoryRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "territories.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl TerritoryRepo for JsonFileTerritoryRepo {
    async fn load(&self) -> Result<Option<TerritoryDocument>, RepoError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RepoError::io("load territories", e)),
        };
        let document = serde_json::from_str(&contents).map_err(RepoError::serialization)?;
        Ok(Some(document))
    }

    async fn save(&self, document: &TerritoryDocument) -> Result<(), RepoError> {
        let json = serde_json::to_vec_pretty(document).map_err(RepoError::serialization)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepoError::io("create data directory", e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| RepoError::io("write territories", e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| RepoError::io("replace territories", e))?;
        Ok(())
    }
}
