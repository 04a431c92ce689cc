//! Demo configuration.
//!
//! The binary takes no command-line arguments; everything is driven by
//! environment variables with sensible defaults, so `cargo run` against a
//! local node works out of the box.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default values for configuration
mod defaults {
    pub fn contact_point() -> String {
        "127.0.0.1:9042".to_string()
    }

    pub fn keyspace() -> String {
        "examples".to_string()
    }

    pub fn replication_factor() -> u8 {
        1
    }
}

/// Connection and schema settings for the demo run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DemoConfig {
    /// Cluster endpoint in `host:port` form.
    #[serde(default = "defaults::contact_point")]
    pub contact_point: String,
    /// Keyspace holding the `users` table. Created if absent.
    #[serde(default = "defaults::keyspace")]
    pub keyspace: String,
    /// SimpleStrategy replication factor for the keyspace DDL.
    /// The default of 1 is only suitable for a local single-node cluster.
    #[serde(default = "defaults::replication_factor")]
    pub replication_factor: u8,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            contact_point: defaults::contact_point(),
            keyspace: defaults::keyspace(),
            replication_factor: defaults::replication_factor(),
        }
    }
}

impl DemoConfig {
    /// Load configuration from `CASSANDRA_*` environment variables,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(contact_point) = std::env::var("CASSANDRA_CONTACT_POINT") {
            config.contact_point = contact_point;
        }
        if let Ok(keyspace) = std::env::var("CASSANDRA_KEYSPACE") {
            config.keyspace = keyspace;
        }
        if let Ok(raw) = std::env::var("CASSANDRA_REPLICATION_FACTOR") {
            match raw.parse() {
                Ok(rf) => config.replication_factor = rf,
                Err(_) => warn!(
                    "ignoring CASSANDRA_REPLICATION_FACTOR={raw}: not a small integer"
                ),
            }
        }
        config
    }
}
