//! MongoDB database connector and utilities
//!
//! Provides connection management and MongoDB-specific helpers.

mod config;
mod connector;
mod health;

pub use config::MongoConfig;
pub use connector::{connect, connect_from_config};
pub use health::{HealthStatus, check_health, ping};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
