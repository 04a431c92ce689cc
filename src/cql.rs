//! CQL statement construction.
//!
//! Every statement the demo issues is assembled here from the static
//! [`TableMapping`], so the DDL, the DML, and the record shape cannot
//! drift apart. DDL statements are idempotent (`IF NOT EXISTS`) and safe
//! to run on every invocation.

use scylla::value::CqlValue;
use uuid::Uuid;

use crate::api::{StoreError, UserPatch};
use crate::model::TableMapping;

/// Keyspace DDL with SimpleStrategy replication.
pub fn create_keyspace(keyspace: &str, replication_factor: u8) -> String {
    format!(
        "CREATE KEYSPACE IF NOT EXISTS {keyspace} WITH replication = \
         {{'class': 'SimpleStrategy', 'replication_factor': {replication_factor}}}"
    )
}

/// Table DDL generated from the mapping.
pub fn create_table(mapping: &TableMapping) -> String {
    let columns = mapping
        .columns
        .iter()
        .map(|c| format!("{} {}", c.column, c.cql_type))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE IF NOT EXISTS {}({}, PRIMARY KEY({}))",
        mapping.table,
        columns,
        mapping.partition_key()
    )
}

/// The fixed DML statements, resolved once at startup.
#[derive(Debug, Clone)]
pub struct UserStatements {
    pub insert: String,
    pub select_all: String,
    pub select_by_id: String,
    pub delete_by_id: String,
    pub delete_by_id_if_name: String,
}

impl UserStatements {
    pub fn new(mapping: &TableMapping) -> Self {
        let table = mapping.table;
        let columns = mapping.column_list();
        let key = mapping.partition_key();
        let markers = mapping
            .columns
            .iter()
            .map(|_| "?")
            .collect::<Vec<_>>()
            .join(", ");
        let name = mapping.column_for("name").unwrap_or("name");
        Self {
            insert: format!("INSERT INTO {table} ({columns}) VALUES ({markers})"),
            select_all: format!("SELECT {columns} FROM {table}"),
            select_by_id: format!("SELECT {columns} FROM {table} WHERE {key} = ?"),
            delete_by_id: format!("DELETE FROM {table} WHERE {key} = ?"),
            delete_by_id_if_name: format!("DELETE FROM {table} WHERE {key} = ? IF {name} = ?"),
        }
    }
}

/// Build an identifier-keyed partial update from a patch.
///
/// Returns the statement text and its bind values, SET columns first and
/// the key last. An empty patch is rejected; CQL has no empty SET clause.
pub fn update_by_id(
    mapping: &TableMapping,
    patch: &UserPatch,
    id: Uuid,
) -> Result<(String, Vec<CqlValue>), StoreError> {
    if patch.is_empty() {
        return Err(StoreError::EmptyPatch);
    }
    let mut assignments = Vec::new();
    let mut values = Vec::new();
    if let Some(name) = &patch.name {
        let column = mapping.column_for("name").unwrap_or("name");
        assignments.push(format!("{column} = ?"));
        values.push(CqlValue::Text(name.clone()));
    }
    if let Some(age) = patch.age {
        let column = mapping.column_for("age").unwrap_or("age");
        assignments.push(format!("{column} = ?"));
        values.push(CqlValue::Int(age));
    }
    values.push(CqlValue::Uuid(id));
    let statement = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        mapping.table,
        assignments.join(", "),
        mapping.partition_key()
    );
    Ok((statement, values))
}
