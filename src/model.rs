//! The `User` record and its column mapping.

use std::fmt;

use scylla::{DeserializeRow, SerializeRow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single row of the `users` table.
///
/// The `scylla` derives are the driver-side object mapping: fields bind to
/// columns by name, with `user_id` renamed to the `id` column. [`USERS`]
/// declares the same mapping for the statement builder; a test keeps the
/// two in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SerializeRow, DeserializeRow)]
pub struct User {
    #[scylla(rename = "id")]
    pub user_id: Uuid,
    pub name: String,
    pub age: i32,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User {{ id: {}, name: {:?}, age: {} }}",
            self.user_id, self.name, self.age
        )
    }
}

/// Role a column plays in the table's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Partition,
    Regular,
}

/// Maps one field of the record type onto a table column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMapping {
    pub field: &'static str,
    pub column: &'static str,
    pub cql_type: &'static str,
    pub role: KeyRole,
}

/// A table name plus its column mappings, resolved once at startup and
/// consumed by the statement builder in [`crate::cql`].
#[derive(Debug, Clone, Copy)]
pub struct TableMapping {
    pub table: &'static str,
    pub columns: &'static [ColumnMapping],
}

impl TableMapping {
    /// Comma-separated column list in declaration order.
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| c.column)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The partition-key column.
    pub fn partition_key(&self) -> &'static str {
        self.columns
            .iter()
            .find(|c| c.role == KeyRole::Partition)
            .map(|c| c.column)
            .unwrap_or_else(|| unreachable!("mapping declares no partition key"))
    }

    /// Look up the column a field maps to.
    pub fn column_for(&self, field: &str) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|c| c.field == field)
            .map(|c| c.column)
    }
}

/// Mapping for the demo's single table.
pub const USERS: TableMapping = TableMapping {
    table: "users",
    columns: &[
        ColumnMapping {
            field: "user_id",
            column: "id",
            cql_type: "uuid",
            role: KeyRole::Partition,
        },
        ColumnMapping {
            field: "name",
            column: "name",
            cql_type: "text",
            role: KeyRole::Regular,
        },
        ColumnMapping {
            field: "age",
            column: "age",
            cql_type: "int",
            role: KeyRole::Regular,
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_matches_row_type() {
        assert_eq!(USERS.table, "users");
        assert_eq!(USERS.partition_key(), "id");
        assert_eq!(USERS.column_for("user_id"), Some("id"));
        assert_eq!(USERS.column_for("name"), Some("name"));
        assert_eq!(USERS.column_for("age"), Some("age"));
        assert_eq!(USERS.column_for("email"), None);
    }

    #[test]
    fn test_display_renders_every_field() {
        let user = User {
            user_id: Uuid::nil(),
            name: "User 0".to_string(),
            age: 0,
        };
        let rendered = user.to_string();
        assert!(rendered.contains("00000000-0000-0000-0000-000000000000"));
        assert!(rendered.contains("\"User 0\""));
        assert!(rendered.contains("age: 0"));
    }
}
