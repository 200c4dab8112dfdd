use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while fetching, storing or reading price catalog data
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The HTTP request itself failed (DNS, TLS, connection reset, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream pricing API answered with a non-success status
    #[error("Upstream pricing API returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// A response body or stored bucket could not be decoded
    #[error("Failed to decode catalog payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Redis store error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Any other store backend failure
    #[error("Catalog store error: {0}")]
    Store(String),

    /// Snapshot could not be written
    #[error("Failed to write catalog snapshot: {0}")]
    Snapshot(#[from] std::io::Error),

    /// `NextPageLink` pointed back at a page already fetched in this run
    #[error("Upstream pagination revisited {url}")]
    PaginationLoop { url: String },

    /// A sync run finished but some buckets could not be read or written
    #[error("{failed} of {attempted} catalog buckets could not be written")]
    PartialSync { failed: usize, attempted: usize },
}

impl CatalogError {
    /// Short, stable label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Http(_) => "http",
            CatalogError::UpstreamStatus { .. } => "upstream_status",
            CatalogError::Decode(_) => "decode",
            CatalogError::Redis(_) => "redis",
            CatalogError::Store(_) => "store",
            CatalogError::Snapshot(_) => "snapshot",
            CatalogError::PaginationLoop { .. } => "pagination_loop",
            CatalogError::PartialSync { .. } => "partial_sync",
        }
    }
}
