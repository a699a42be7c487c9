//! MongoDB connection management and BSON helpers.

mod config;
mod connector;
mod convert;
mod health;

pub use config::MongoConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry};
pub use convert::{InvalidObjectId, from_bson_datetime, parse_object_id, to_bson_datetime};
pub use health::{HealthStatus, check_health, check_health_detailed};

pub use mongodb::{Client, Collection, Database};
