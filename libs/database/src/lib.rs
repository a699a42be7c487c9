//! Storage plumbing shared by the domain crates.
//!
//! # Features
//!
//! - `mongodb`: MongoDB connector, health probe and BSON helpers
//! - `config`: `core_config::FromEnv` for [`mongodb::MongoConfig`]
//!
//! The [`common`] module is always available. It holds the paging and sort
//! primitives that repository traits accept, so domain code can name them
//! without depending on a particular driver.
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::from_env()?;
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult, Pagination, SortDirection};
