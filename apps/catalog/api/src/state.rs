//! Shared application state.

use mongodb::{Client, Database};

/// Cloned into handlers that need the raw connection; clones share the
/// client's connection pool.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Client,
    pub db: Database,
}
