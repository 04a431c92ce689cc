//! Connection lifecycle: connect, schema preparation, shutdown.

use std::sync::Arc;

use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use thiserror::Error;
use tracing::info;

use crate::config::DemoConfig;
use crate::cql;
use crate::model::USERS;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        source: scylla::errors::NewSessionError,
    },
    #[error("schema statement failed: {source}")]
    Schema {
        #[from]
        source: scylla::errors::ExecutionError,
    },
    #[error("failed to switch keyspace: {source}")]
    Keyspace {
        #[from]
        source: scylla::errors::UseKeyspaceError,
    },
    #[error("cluster metadata query failed: {reason}")]
    Metadata { reason: String },
}

/// Owns the driver session for the duration of one demo run.
///
/// Acquired once in `main` and released exactly once via [`Cluster::shutdown`],
/// on every exit path (see [`crate::demo::run_to_completion`]).
pub struct Cluster {
    session: Arc<Session>,
    endpoint: String,
}

impl Cluster {
    /// Connect to the configured contact point.
    pub async fn connect(config: &DemoConfig) -> Result<Self, ClusterError> {
        let session = SessionBuilder::new()
            .known_node(&config.contact_point)
            .build()
            .await
            .map_err(|source| ClusterError::Connect {
                endpoint: config.contact_point.clone(),
                source,
            })?;
        info!("connected to {}", config.contact_point);
        Ok(Self {
            session: Arc::new(session),
            endpoint: config.contact_point.clone(),
        })
    }

    /// Shared handle to the underlying session.
    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.session)
    }

    /// Idempotently create the keyspace and table, then make the keyspace
    /// the session's active one. Safe to run on every invocation.
    pub async fn ensure_schema(&self, config: &DemoConfig) -> Result<(), ClusterError> {
        self.session
            .query_unpaged(
                cql::create_keyspace(&config.keyspace, config.replication_factor),
                (),
            )
            .await?;
        self.session.use_keyspace(&config.keyspace, false).await?;
        self.session
            .query_unpaged(cql::create_table(&USERS), ())
            .await?;
        info!(
            "schema ready: keyspace {}, table {}",
            config.keyspace, USERS.table
        );
        Ok(())
    }

    /// Server release version from `system.local`, for the startup banner.
    pub async fn release_version(&self) -> Result<Option<String>, ClusterError> {
        let result = self
            .session
            .query_unpaged("SELECT release_version FROM system.local", ())
            .await?;
        let rows = result
            .into_rows_result()
            .map_err(|e| ClusterError::Metadata {
                reason: e.to_string(),
            })?;
        let version = rows
            .maybe_first_row::<(Option<String>,)>()
            .map_err(|e| ClusterError::Metadata {
                reason: e.to_string(),
            })?
            .and_then(|(version,)| version);
        Ok(version)
    }

    /// Release the cluster connection. The driver closes its connections
    /// when the last session handle drops.
    pub async fn shutdown(self) {
        info!("releasing connection to {}", self.endpoint);
        drop(self.session);
    }
}
