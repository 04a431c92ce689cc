//! Tests for the full CRUD workflow and its teardown guarantee.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use cql_users_demo::{
    demo, DeleteRequest, DeleteResult, DeterministicUserStore, InsertRequest, Predicate,
    SelectRequest, StoreError, UpdateRequest, User, UserStore,
};

/// Wraps the in-memory store and fails every call to the named operation,
/// for driving the workflow's failure path.
struct FailingStore {
    inner: Arc<DeterministicUserStore>,
    fail_on: &'static str,
}

impl FailingStore {
    fn new(fail_on: &'static str) -> Self {
        Self {
            inner: DeterministicUserStore::new(),
            fail_on,
        }
    }

    fn fail(&self, operation: &'static str) -> Result<(), StoreError> {
        if self.fail_on == operation {
            return Err(StoreError::Decode {
                reason: format!("injected failure in {operation}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for FailingStore {
    async fn insert(&self, request: InsertRequest) -> Result<(), StoreError> {
        self.fail("insert")?;
        self.inner.insert(request).await
    }

    async fn select(&self, request: SelectRequest) -> Result<Vec<User>, StoreError> {
        self.fail("select")?;
        self.inner.select(request).await
    }

    async fn first(&self, request: SelectRequest) -> Result<User, StoreError> {
        self.fail("first")?;
        self.inner.first(request).await
    }

    async fn first_or_default(&self, request: SelectRequest) -> Result<Option<User>, StoreError> {
        self.fail("first_or_default")?;
        self.inner.first_or_default(request).await
    }

    async fn update(&self, request: UpdateRequest) -> Result<(), StoreError> {
        self.fail("update")?;
        self.inner.update(request).await
    }

    async fn delete(&self, request: DeleteRequest) -> Result<DeleteResult, StoreError> {
        self.fail("delete")?;
        self.inner.delete(request).await
    }
}

#[tokio::test]
async fn test_workflow_runs_to_completion() {
    let store = DeterministicUserStore::new();
    let user_id = Uuid::new_v4();

    demo::run(&store, user_id).await.unwrap();

    // The unconditional delete removed the run's record; the guarded
    // delete was a no-op.
    let users = store
        .select(SelectRequest {
            predicate: Predicate::All,
        })
        .await
        .unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_workflow_leaves_other_rows_alone() {
    let store = DeterministicUserStore::new();
    let bystander = Uuid::new_v4();
    store
        .insert(InsertRequest {
            user: User {
                user_id: bystander,
                name: "bystander".to_string(),
                age: 99,
            },
        })
        .await
        .unwrap();

    demo::run(&store, Uuid::new_v4()).await.unwrap();

    let users = store
        .select(SelectRequest {
            predicate: Predicate::All,
        })
        .await
        .unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].user_id, bystander);
}

#[tokio::test]
async fn test_teardown_runs_on_success() {
    let store = DeterministicUserStore::new();
    let teardowns = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&teardowns);
    demo::run_to_completion(&store, Uuid::new_v4(), move || async move {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .await
    .unwrap();

    assert_eq!(teardowns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_teardown_runs_exactly_once_on_failure() {
    let store = FailingStore::new("update");
    let teardowns = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&teardowns);
    let result = demo::run_to_completion(&store, Uuid::new_v4(), move || async move {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .await;

    match result {
        Err(StoreError::Decode { reason }) => {
            assert!(reason.contains("update"));
        }
        other => panic!("expected the injected failure to propagate, got {other:?}"),
    }
    assert_eq!(teardowns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failure_before_any_read_still_tears_down() {
    let store = FailingStore::new("insert");
    let teardowns = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&teardowns);
    let result = demo::run_to_completion(&store, Uuid::new_v4(), move || async move {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .await;

    assert!(result.is_err());
    assert_eq!(teardowns.load(Ordering::SeqCst), 1);
}
