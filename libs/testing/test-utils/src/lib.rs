//! Shared test utilities for the catalog and estimation crates
//!
//! - `TestRedis`: Redis container with automatic cleanup (feature: "redis")
//! - `TestDataBuilder`: deterministic meter ids and store namespaces
//! - `assertions`: float comparison helpers for prices
//!
//! # Redis Testing
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["redis"] }
//! ```
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestRedis};
//!
//! #[tokio::test]
//! async fn my_store_test() {
//!     let redis = TestRedis::new().await;
//!     let namespace = TestDataBuilder::from_test_name("my_store_test").namespace("catalog");
//!     // connect a store to redis.connection_string() under `namespace`
//! }
//! ```

#[cfg(feature = "redis")]
mod redis;

#[cfg(feature = "redis")]
pub use redis::TestRedis;

/// Builder for test data derived from a seed, so reruns see the same values
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_sync_merges_pages");
    /// assert_eq!(builder.meter_id(1), builder.meter_id(1));
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Meter id in the catalog's GUID layout, unique per seed and index
    pub fn meter_id(&self, index: u32) -> String {
        let high = self.seed >> 32;
        let low = self.seed & 0xffff_ffff;
        format!(
            "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
            high,
            (low >> 16) & 0xffff,
            low & 0xffff,
            index & 0xffff,
            self.seed.rotate_left(index) & 0xffff_ffff_ffff
        )
    }

    /// Store namespace isolating one test's keys
    pub fn namespace(&self, prefix: &str) -> String {
        format!("test-{}-{}", prefix, self.seed)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert two prices are equal within floating point noise
    pub fn assert_price_eq(actual: f64, expected: f64, context: &str) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "{}: expected price {}, got {}",
            context,
            expected,
            actual
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.meter_id(3), builder2.meter_id(3));
        assert_eq!(builder1.namespace("catalog"), builder2.namespace("catalog"));
    }

    #[test]
    fn test_meter_ids_differ_by_index() {
        let builder = TestDataBuilder::from_test_name("my_test");

        assert_ne!(builder.meter_id(1), builder.meter_id(2));
        assert_eq!(builder.meter_id(1).len(), 36);
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.namespace("catalog"), builder2.namespace("catalog"));
    }
}
