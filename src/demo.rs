//! The CRUD workflow: insert, query, update, delete, in a fixed order.
//!
//! Every operation targets the single identifier generated for this run
//! and is awaited before the next one is issued; no two database calls are
//! ever outstanding at once.

use std::future::Future;

use tracing::info;
use uuid::Uuid;

use crate::api::{
    DeleteRequest, Guard, InsertRequest, Predicate, SelectRequest, StoreError, UpdateRequest,
    UserPatch, UserStore,
};
use crate::model::User;

/// Run the whole workflow against `store`, then await `teardown`
/// unconditionally before propagating the workflow's outcome. This is the
/// single place that guarantees the cluster connection is released exactly
/// once, on success and on failure alike.
pub async fn run_to_completion<S, F, Fut>(
    store: &S,
    user_id: Uuid,
    teardown: F,
) -> Result<(), StoreError>
where
    S: UserStore,
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    let outcome = run(store, user_id).await;
    teardown().await;
    outcome
}

/// The four operation groups, in order.
pub async fn run<S: UserStore>(store: &S, user_id: Uuid) -> Result<(), StoreError> {
    insert_users(store, user_id).await?;
    query_users(store, user_id).await?;
    update_users(store, user_id).await?;
    delete_users(store, user_id).await
}

/// Insert a single record under the run's identifier.
async fn insert_users<S: UserStore>(store: &S, user_id: Uuid) -> Result<(), StoreError> {
    store
        .insert(InsertRequest {
            user: User {
                user_id,
                name: "User 0".to_string(),
                age: 0,
            },
        })
        .await
}

/// The four read variants: unrestricted scan, filtered scan, `first`,
/// and `first_or_default`.
async fn query_users<S: UserStore>(store: &S, user_id: Uuid) -> Result<(), StoreError> {
    let users = store
        .select(SelectRequest {
            predicate: Predicate::All,
        })
        .await?;
    info!("Retrieved {} users", users.len());

    let users = store
        .select(SelectRequest {
            predicate: Predicate::ById(user_id),
        })
        .await?;
    info!("Retrieved {} users", users.len());

    let user = store
        .first(SelectRequest {
            predicate: Predicate::ById(user_id),
        })
        .await?;
    info!("Retrieved {user}");

    let user = store
        .first_or_default(SelectRequest {
            predicate: Predicate::ById(user_id),
        })
        .await?;
    match user {
        Some(user) => info!("Retrieved {user}"),
        None => info!("Retrieved no user"),
    }
    Ok(())
}

/// Update the name field only, then re-read the record (result discarded).
async fn update_users<S: UserStore>(store: &S, user_id: Uuid) -> Result<(), StoreError> {
    store
        .update(UpdateRequest {
            predicate: Predicate::ById(user_id),
            patch: UserPatch {
                name: Some("Update Linq".to_string()),
                age: None,
            },
        })
        .await?;
    let _ = store
        .select(SelectRequest {
            predicate: Predicate::ById(user_id),
        })
        .await?;
    Ok(())
}

/// Delete unconditionally, then issue a guarded delete against the
/// pre-update name. The guard is stale by construction (the name was
/// updated and the row already deleted), so the second delete settles as a
/// successful no-op.
async fn delete_users<S: UserStore>(store: &S, user_id: Uuid) -> Result<(), StoreError> {
    store
        .delete(DeleteRequest {
            predicate: Predicate::ById(user_id),
            guard: None,
        })
        .await?;

    let result = store
        .delete(DeleteRequest {
            predicate: Predicate::ById(user_id),
            guard: Some(Guard::NameEquals("User 0".to_string())),
        })
        .await?;
    if !result.applied {
        info!("conditional delete left the table unchanged");
    }
    Ok(())
}
