//! Store abstraction for the `users` table.
//!
//! Every operation takes an explicit request struct describing predicate,
//! field patch, and optional guard condition, instead of a fluent builder
//! chain. The production backend is [`crate::store::CqlUserStore`];
//! [`DeterministicUserStore`] is the in-memory test double.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::User;

pub mod inmemory;
pub use inmemory::DeterministicUserStore;

/// Row-selection predicate shared by every read, update, and delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Predicate {
    /// Every row in the table.
    All,
    /// Rows whose partition key equals the given identifier.
    ById(Uuid),
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::All => write!(f, "all users"),
            Predicate::ById(id) => write!(f, "id = {id}"),
        }
    }
}

/// Value-equality guard for conditional deletes.
///
/// A delete carrying a guard only takes effect if the condition currently
/// holds on the target row; a stale guard makes the delete a successful
/// no-op, never an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Guard {
    NameEquals(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InsertRequest {
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectRequest {
    pub predicate: Predicate,
}

/// Partial field set for an update. Only fields that are `Some` are
/// written; everything else is left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub age: Option<i32>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateRequest {
    pub predicate: Predicate,
    pub patch: UserPatch,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteRequest {
    pub predicate: Predicate,
    /// Present for a conditional delete, absent for an unconditional one.
    pub guard: Option<Guard>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResult {
    /// False when a guard condition did not hold (including when the target
    /// row does not exist). Unconditional deletes always report true.
    pub applied: bool,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no user matches {predicate}")]
    NotFound { predicate: Predicate },
    #[error("update patch sets no fields")]
    EmptyPatch,
    #[error("{operation} does not support predicate {predicate}")]
    Unsupported {
        operation: &'static str,
        predicate: Predicate,
    },
    #[error("statement execution failed: {source}")]
    Execution {
        #[from]
        source: scylla::errors::ExecutionError,
    },
    #[error("row decoding failed: {reason}")]
    Decode { reason: String },
}

/// Asynchronous CRUD access to the `users` table.
///
/// Implementations are stateless across calls; the only state is the
/// database itself. Callers sequence operations by awaiting each one.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a fully-populated record keyed by its identifier (upsert).
    async fn insert(&self, request: InsertRequest) -> Result<(), StoreError>;

    /// Return every row matching the predicate.
    async fn select(&self, request: SelectRequest) -> Result<Vec<User>, StoreError>;

    /// Return exactly one matching row, or [`StoreError::NotFound`].
    async fn first(&self, request: SelectRequest) -> Result<User, StoreError>;

    /// Return one matching row, or `None` when nothing matches.
    async fn first_or_default(&self, request: SelectRequest) -> Result<Option<User>, StoreError>;

    /// Apply a partial field patch to every matching row.
    async fn update(&self, request: UpdateRequest) -> Result<(), StoreError>;

    /// Remove matching rows, subject to the optional guard condition.
    async fn delete(&self, request: DeleteRequest) -> Result<DeleteResult, StoreError>;
}

// Blanket implementation for Arc<T> where T: UserStore
#[async_trait]
impl<T: UserStore> UserStore for std::sync::Arc<T> {
    async fn insert(&self, request: InsertRequest) -> Result<(), StoreError> {
        (**self).insert(request).await
    }

    async fn select(&self, request: SelectRequest) -> Result<Vec<User>, StoreError> {
        (**self).select(request).await
    }

    async fn first(&self, request: SelectRequest) -> Result<User, StoreError> {
        (**self).first(request).await
    }

    async fn first_or_default(&self, request: SelectRequest) -> Result<Option<User>, StoreError> {
        (**self).first_or_default(request).await
    }

    async fn update(&self, request: UpdateRequest) -> Result<(), StoreError> {
        (**self).update(request).await
    }

    async fn delete(&self, request: DeleteRequest) -> Result<DeleteResult, StoreError> {
        (**self).delete(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_display() {
        assert_eq!(Predicate::All.to_string(), "all users");
        let id = Uuid::nil();
        assert_eq!(
            Predicate::ById(id).to_string(),
            "id = 00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_empty_patch_detection() {
        assert!(UserPatch::default().is_empty());
        assert!(!UserPatch {
            name: Some("x".to_string()),
            age: None,
        }
        .is_empty());
    }
}
