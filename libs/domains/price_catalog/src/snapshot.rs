use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use crate::error::CatalogResult;
use crate::models::CatalogItem;

/// Name of the full-catalog snapshot written after a sync
pub const SNAPSHOT_NAME: &str = "prices.json";

/// Destination for a complete catalog dump
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    async fn write_snapshot(&self, name: &str, items: &[CatalogItem]) -> CatalogResult<()>;
}

/// Writes snapshots as JSON files under a directory
#[derive(Debug, Clone)]
pub struct FsSnapshotSink {
    dir: PathBuf,
}

impl FsSnapshotSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SnapshotSink for FsSnapshotSink {
    async fn write_snapshot(&self, name: &str, items: &[CatalogItem]) -> CatalogResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(name);
        let json = serde_json::to_vec(items)?;
        tokio::fs::write(&path, json).await?;

        info!(path = %path.display(), items = items.len(), "Wrote catalog snapshot");
        Ok(())
    }
}
