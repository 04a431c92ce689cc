//! CRUD walkthrough for a Cassandra-style `users` table.
//!
//! The demo connects to a single cluster endpoint, prepares an `examples`
//! keyspace and a `users` table, then runs a fixed sequence against one
//! freshly generated identifier: insert, four read variants, a partial
//! update, an unconditional delete, and a guarded delete. All database
//! access goes through the [`api::UserStore`] trait; the production
//! implementation is [`store::CqlUserStore`] on top of the `scylla` driver,
//! and [`api::DeterministicUserStore`] backs the tests.

pub mod api;
pub mod cluster;
pub mod config;
pub mod cql;
pub mod demo;
pub mod model;
pub mod store;

pub use api::{
    DeleteRequest, DeleteResult, DeterministicUserStore, Guard, InsertRequest, Predicate,
    SelectRequest, StoreError, UpdateRequest, UserPatch, UserStore,
};
pub use cluster::{Cluster, ClusterError};
pub use config::DemoConfig;
pub use model::User;
pub use store::CqlUserStore;
