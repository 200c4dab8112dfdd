//! Persistent price catalog, keyed by [`AssetIdentity`].
//!
//! Each key holds one bucket: the catalog items of a single SKU in a single
//! region, sorted by meter id.

mod memory;
mod redis;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CatalogResult;
use crate::identity::AssetIdentity;
use crate::models::CatalogItem;

pub use self::memory::InMemoryCatalogStore;
pub use self::redis::{RedisCatalogStore, RedisStoreConfig};

/// Key-value store of catalog buckets
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceCatalogStore: Send + Sync {
    /// Load the bucket for an identity, `None` when it was never written
    async fn get(&self, identity: &AssetIdentity) -> CatalogResult<Option<Vec<CatalogItem>>>;

    /// Replace the bucket for an identity
    async fn put(&self, identity: &AssetIdentity, items: &[CatalogItem]) -> CatalogResult<()>;
}

#[async_trait]
impl<T: PriceCatalogStore + ?Sized> PriceCatalogStore for Arc<T> {
    async fn get(&self, identity: &AssetIdentity) -> CatalogResult<Option<Vec<CatalogItem>>> {
        (**self).get(identity).await
    }

    async fn put(&self, identity: &AssetIdentity, items: &[CatalogItem]) -> CatalogResult<()> {
        (**self).put(identity, items).await
    }
}
