use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::PriceCatalogStore;
use crate::error::CatalogResult;
use crate::identity::AssetIdentity;
use crate::models::CatalogItem;

/// Process-local store, used for one-shot runs and tests
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    buckets: RwLock<HashMap<AssetIdentity, Vec<CatalogItem>>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buckets written so far
    pub async fn len(&self) -> usize {
        self.buckets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.buckets.read().await.is_empty()
    }

    /// Every stored item, bucket by bucket in identity order
    pub async fn all_items(&self) -> Vec<CatalogItem> {
        let buckets = self.buckets.read().await;
        let mut identities: Vec<_> = buckets.keys().collect();
        identities.sort();
        identities
            .into_iter()
            .flat_map(|id| buckets[id].iter().cloned())
            .collect()
    }
}

#[async_trait]
impl PriceCatalogStore for InMemoryCatalogStore {
    async fn get(&self, identity: &AssetIdentity) -> CatalogResult<Option<Vec<CatalogItem>>> {
        Ok(self.buckets.read().await.get(identity).cloned())
    }

    async fn put(&self, identity: &AssetIdentity, items: &[CatalogItem]) -> CatalogResult<()> {
        self.buckets
            .write()
            .await
            .insert(identity.clone(), items.to_vec());
        Ok(())
    }
}
