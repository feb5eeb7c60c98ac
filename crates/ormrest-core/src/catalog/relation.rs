//! Relationship definitions between models.

use serde::{Deserialize, Serialize};

/// Cardinality of a relationship, seen from the declaring model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// Many declaring rows point at one target (foreign key on this side).
    ManyToOne,
    /// One-to-one relation.
    OneToOne,
    /// One declaring row owns many targets.
    OneToMany,
    /// Many-to-many relation through an association table.
    ManyToMany,
}

impl Cardinality {
    /// Whether the relationship yields a collection by default.
    pub fn is_many(self) -> bool {
        matches!(self, Cardinality::OneToMany | Cardinality::ManyToMany)
    }
}

/// A relationship declared on a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipDef {
    /// Attribute key (unique within the model).
    pub key: String,
    /// Target model, by model name or table name.
    pub target: String,
    /// Relationship cardinality.
    pub cardinality: Cardinality,
    /// Keys of the join columns on the declaring model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_columns: Vec<String>,
    /// Overrides whether the relationship loads as a list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uselist: Option<bool>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RelationshipDef {
    fn new(key: impl Into<String>, target: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            key: key.into(),
            target: target.into(),
            cardinality,
            local_columns: Vec::new(),
            uselist: None,
            description: None,
        }
    }

    /// Create a many-to-one relationship joined on `local_column`.
    pub fn many_to_one(
        key: impl Into<String>,
        target: impl Into<String>,
        local_column: impl Into<String>,
    ) -> Self {
        Self::new(key, target, Cardinality::ManyToOne).with_local_column(local_column)
    }

    /// Create a one-to-one relationship joined on `local_column`.
    pub fn one_to_one(
        key: impl Into<String>,
        target: impl Into<String>,
        local_column: impl Into<String>,
    ) -> Self {
        Self::new(key, target, Cardinality::OneToOne).with_local_column(local_column)
    }

    /// Create a one-to-many relationship.
    pub fn one_to_many(key: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(key, target, Cardinality::OneToMany)
    }

    /// Create a many-to-many relationship.
    pub fn many_to_many(key: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(key, target, Cardinality::ManyToMany)
    }

    /// Add a local join column.
    pub fn with_local_column(mut self, column: impl Into<String>) -> Self {
        self.local_columns.push(column.into());
        self
    }

    /// Force list (or scalar) loading.
    pub fn with_uselist(mut self, uselist: bool) -> Self {
        self.uselist = Some(uselist);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the relationship is many-valued.
    pub fn uselist(&self) -> bool {
        self.uselist.unwrap_or_else(|| self.cardinality.is_many())
    }
}
