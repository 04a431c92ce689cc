//! [`UserStore`] backed by a live driver session.

use std::sync::Arc;

use async_trait::async_trait;
use scylla::client::session::Session;
use scylla::response::query_result::QueryResult;
use scylla::value::{CqlValue, Row};

use crate::api::{
    DeleteRequest, DeleteResult, Guard, InsertRequest, Predicate, SelectRequest, StoreError,
    UpdateRequest, UserStore,
};
use crate::cql::{self, UserStatements};
use crate::model::{User, USERS};

fn decode_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Decode {
        reason: e.to_string(),
    }
}

/// CQL implementation of [`UserStore`].
///
/// Statement text is resolved once at construction from the table mapping.
/// The session must already have its active keyspace set (see
/// [`crate::cluster::Cluster::ensure_schema`]); all statements use the
/// unqualified table name.
pub struct CqlUserStore {
    session: Arc<Session>,
    statements: UserStatements,
}

impl CqlUserStore {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            statements: UserStatements::new(&USERS),
        }
    }

    fn rows(result: QueryResult) -> Result<Vec<User>, StoreError> {
        let rows = result.into_rows_result().map_err(decode_error)?;
        rows.rows::<User>()
            .map_err(decode_error)?
            .map(|row| row.map_err(decode_error))
            .collect()
    }

    /// A lightweight-transaction result carries an `[applied]` column in
    /// its first position instead of ordinary rows.
    fn lwt_applied(result: QueryResult) -> Result<bool, StoreError> {
        let rows = result.into_rows_result().map_err(decode_error)?;
        let applied = rows
            .maybe_first_row::<Row>()
            .map_err(decode_error)?
            .and_then(|row| row.columns.into_iter().next().flatten())
            .map(|value| value == CqlValue::Boolean(true))
            .unwrap_or(false);
        Ok(applied)
    }
}

#[async_trait]
impl UserStore for CqlUserStore {
    async fn insert(&self, request: InsertRequest) -> Result<(), StoreError> {
        self.session
            .query_unpaged(self.statements.insert.as_str(), &request.user)
            .await?;
        Ok(())
    }

    async fn select(&self, request: SelectRequest) -> Result<Vec<User>, StoreError> {
        let result = match request.predicate {
            Predicate::All => {
                self.session
                    .query_unpaged(self.statements.select_all.as_str(), ())
                    .await?
            }
            Predicate::ById(id) => {
                self.session
                    .query_unpaged(self.statements.select_by_id.as_str(), (id,))
                    .await?
            }
        };
        Self::rows(result)
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
        let id = match request.predicate {
            Predicate::ById(id) => id,
            Predicate::All => {
                return Err(StoreError::Unsupported {
                    operation: "update",
                    predicate: Predicate::All,
                })
            }
        };
        let (statement, values) = cql::update_by_id(&USERS, &request.patch, id)?;
        self.session.query_unpaged(statement, values).await?;
        Ok(())
    }

    async fn delete(&self, request: DeleteRequest) -> Result<DeleteResult, StoreError> {
        let id = match request.predicate {
            Predicate::ById(id) => id,
            Predicate::All => {
                return Err(StoreError::Unsupported {
                    operation: "delete",
                    predicate: Predicate::All,
                })
            }
        };
        match request.guard {
            None => {
                self.session
                    .query_unpaged(self.statements.delete_by_id.as_str(), (id,))
                    .await?;
                Ok(DeleteResult { applied: true })
            }
            Some(Guard::NameEquals(name)) => {
                let result = self
                    .session
                    .query_unpaged(
                        self.statements.delete_by_id_if_name.as_str(),
                        (id, name),
                    )
                    .await?;
                Ok(DeleteResult {
                    applied: Self::lwt_applied(result)?,
                })
            }
        }
    }
}
