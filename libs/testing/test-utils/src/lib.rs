//! Test helpers for the catalog domains
//!
//! - [`TestMongo`] (feature `mongo`): a throwaway MongoDB 7 container
//! - [`TestDataBuilder`]: names and ids derived from a seed, so a failing
//!   integration test produces the same data when rerun
//! - [`assertions`]: small assertion helpers
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["mongo"] }
//! ```
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn places_an_order() {
//!     let mongo = TestMongo::new().await;
//!     let data = TestDataBuilder::from_test_name("places_an_order");
//!
//!     let customer = data.customer_id();
//!     let product_name = data.name("product", "widget");
//! }
//! ```

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Seeded source of test names and identifiers.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seeds from a hash of `name`, usually the test function's name.
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut state = DefaultHasher::new();
        name.hash(&mut state);
        Self::new(state.finish())
    }

    /// 24 hex characters, accepted wherever an ObjectId string is.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let id = TestDataBuilder::new(42).customer_id();
    /// assert_eq!(id.len(), 24);
    /// assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    /// ```
    pub fn customer_id(&self) -> String {
        let head = self.seed.to_be_bytes();
        let tail = (self.seed as u32).rotate_left(7).to_be_bytes();
        head.iter()
            .chain(tail.iter())
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// `test-{kind}-{seed}-{label}`; unique per builder seed.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let name = TestDataBuilder::new(7).name("product", "widget");
    /// assert_eq!(name, "test-product-7-widget");
    /// ```
    pub fn name(&self, kind: &str, label: &str) -> String {
        format!("test-{kind}-{}-{label}", self.seed)
    }
}

pub mod assertions {
    /// Unwraps `value`, naming `what` in the panic message.
    pub fn assert_some<T>(value: Option<T>, what: &str) -> T {
        match value {
            Some(inner) => inner,
            None => panic!("expected {what} to be present, got None"),
        }
    }
}
