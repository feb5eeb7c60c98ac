//! Column definitions for models.

use super::types::SqlType;
use serde::{Deserialize, Serialize};

/// A scalar column mapped on a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Attribute key (unique within the model).
    pub key: String,
    /// Storage type.
    #[serde(rename = "type")]
    pub sql_type: SqlType,
    /// Explicit nullability. Defaults to `!primary_key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// Whether the column is part of the primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Uniqueness flag, when declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ColumnDef {
    /// Create a nullable column.
    pub fn new(key: impl Into<String>, sql_type: impl Into<SqlType>) -> Self {
        Self {
            key: key.into(),
            sql_type: sql_type.into(),
            nullable: None,
            primary_key: false,
            unique: None,
            description: None,
        }
    }

    /// Mark as primary key (implies non-nullable unless overridden).
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark as non-nullable.
    pub fn not_null(mut self) -> Self {
        self.nullable = Some(false);
        self
    }

    /// Set nullability explicitly.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Mark as unique.
    pub fn unique(mut self) -> Self {
        self.unique = Some(true);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Effective nullability.
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(!self.primary_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullability_defaults() {
        let plain = ColumnDef::new("name", SqlType::string(50));
        assert!(plain.is_nullable());

        let pk = ColumnDef::new("id", SqlType::integer()).primary_key();
        assert!(!pk.is_nullable());

        let nullable_pk = ColumnDef::new("id", SqlType::integer())
            .primary_key()
            .with_nullable(true);
        assert!(nullable_pk.is_nullable());
    }

    #[test]
    fn test_column_builder() {
        let column = ColumnDef::new("email", SqlType::string(120))
            .not_null()
            .unique()
            .with_description("Login email");

        assert_eq!(column.key, "email");
        assert!(!column.is_nullable());
        assert_eq!(column.unique, Some(true));
        assert_eq!(column.description.as_deref(), Some("Login email"));
    }
}
