//! Price catalog domain
//!
//! Reading the public Azure retail price list, keeping a local copy of it,
//! and answering structured price queries from either source.
//!
//! ```text
//! RetailPricesClient ──► CatalogSynchronizer ──► PriceCatalogStore
//!         │                                            │
//!         └──────────────► PriceSource ◄───────────────┘
//! ```

pub mod bucket;
pub mod client;
pub mod error;
pub mod http;
pub mod identity;
pub mod models;
pub mod query;
pub mod snapshot;
pub mod source;
pub mod store;
pub mod sync;

pub use client::{RETAIL_PRICES_API, RetailPricesClient};
pub use error::{CatalogError, CatalogResult};
pub use http::{HttpGet, HttpResponse, ReqwestHttpGet};
pub use identity::{AssetIdentity, CATALOG_PROVIDER};
pub use models::{CatalogItem, PriceType, RetailPricesPage};
pub use query::{CatalogField, Predicate, PriceQuery};
pub use snapshot::{FsSnapshotSink, SNAPSHOT_NAME, SnapshotSink};
pub use source::{CatalogStorePriceSource, PriceSource};
pub use store::{InMemoryCatalogStore, PriceCatalogStore, RedisCatalogStore, RedisStoreConfig};
pub use sync::{CatalogSynchronizer, SyncOptions, SyncReport};
