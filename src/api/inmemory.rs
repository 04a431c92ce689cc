//! In-memory implementation of [`UserStore`] for testing.
//!
//! Deterministic, non-persistent backend mirroring the behavior of the
//! CQL-backed store without network I/O, for use in unit and integration
//! tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    DeleteRequest, DeleteResult, Guard, InsertRequest, Predicate, SelectRequest, StoreError,
    UpdateRequest, UserStore,
};
use crate::model::User;

/// In-memory deterministic implementation of [`UserStore`].
///
/// Rows live in a HashMap keyed by identifier; `select` returns them in
/// identifier order so results are stable across runs.
///
/// # Limitations
///
/// - `update` patches existing rows only; it does not create a partial row
///   for an unknown identifier the way a CQL UPDATE would.
/// - `Predicate::All` is accepted for update and delete, which the
///   CQL-backed store rejects.
/// - No persistence, no replication.
#[derive(Clone, Default)]
pub struct DeterministicUserStore {
    inner: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl DeterministicUserStore {
    /// Create a new, empty in-memory store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

fn matches(predicate: &Predicate, user: &User) -> bool {
    match predicate {
        Predicate::All => true,
        Predicate::ById(id) => user.user_id == *id,
    }
}

#[async_trait]
impl UserStore for DeterministicUserStore {
    async fn insert(&self, request: InsertRequest) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.insert(request.user.user_id, request.user);
        Ok(())
    }

    async fn select(&self, request: SelectRequest) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.lock().await;
        let mut rows: Vec<User> = inner
            .values()
            .filter(|user| matches(&request.predicate, user))
            .cloned()
            .collect();
        rows.sort_by_key(|user| user.user_id);
        Ok(rows)
    }

    async fn first(&self, request: SelectRequest) -> Result<User, StoreError> {
        let predicate = request.predicate.clone();
        self.select(request)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound { predicate })
    }

    async fn first_or_default(&self, request: SelectRequest) -> Result<Option<User>, StoreError> {
        Ok(self.select(request).await?.into_iter().next())
    }

    async fn update(&self, request: UpdateRequest) -> Result<(), StoreError> {
        if request.patch.is_empty() {
            return Err(StoreError::EmptyPatch);
        }
        let mut inner = self.inner.lock().await;
        for user in inner.values_mut() {
            if !matches(&request.predicate, user) {
                continue;
            }
            if let Some(name) = &request.patch.name {
                user.name = name.clone();
            }
            if let Some(age) = request.patch.age {
                user.age = age;
            }
        }
        Ok(())
    }

    async fn delete(&self, request: DeleteRequest) -> Result<DeleteResult, StoreError> {
        let mut inner = self.inner.lock().await;
        match request.guard {
            None => {
                inner.retain(|_, user| !matches(&request.predicate, user));
                Ok(DeleteResult { applied: true })
            }
            Some(Guard::NameEquals(expected)) => {
                // Condition must hold on a present row for the delete to apply.
                let held: Vec<Uuid> = inner
                    .values()
                    .filter(|user| matches(&request.predicate, user) && user.name == expected)
                    .map(|user| user.user_id)
                    .collect();
                let applied = !held.is_empty();
                for id in held {
                    inner.remove(&id);
                }
                Ok(DeleteResult { applied })
            }
        }
    }
}
