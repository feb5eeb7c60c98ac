//! Model definitions.

use super::column::ColumnDef;
use super::relation::RelationshipDef;
use serde::{Deserialize, Serialize};

/// A mapped attribute declared on a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyDef {
    /// A scalar column.
    Column(ColumnDef),
    /// A relationship to another model.
    Relationship(RelationshipDef),
}

impl PropertyDef {
    /// Attribute key.
    pub fn key(&self) -> &str {
        match self {
            PropertyDef::Column(c) => &c.key,
            PropertyDef::Relationship(r) => &r.key,
        }
    }

    /// Check if this is a relationship.
    pub fn is_relationship(&self) -> bool {
        matches!(self, PropertyDef::Relationship(_))
    }
}

/// A model declaration (mapped class).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDef {
    /// Class name (unique within a catalog).
    pub name: String,
    /// Backing table name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Properties in declaration order.
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
}

impl ModelDef {
    /// Create a new model with no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            properties: Vec::new(),
        }
    }

    /// Set the table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add a column.
    pub fn with_column(mut self, column: ColumnDef) -> Self {
        self.properties.push(PropertyDef::Column(column));
        self
    }

    /// Add a relationship.
    pub fn with_relationship(mut self, relationship: RelationshipDef) -> Self {
        self.properties.push(PropertyDef::Relationship(relationship));
        self
    }

    /// Get a property by key.
    pub fn get_property(&self, key: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.key() == key)
    }

    /// Get a column by key.
    pub fn get_column(&self, key: &str) -> Option<&ColumnDef> {
        self.columns().find(|c| c.key == key)
    }

    /// All columns, in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.properties.iter().filter_map(|p| match p {
            PropertyDef::Column(c) => Some(c),
            PropertyDef::Relationship(_) => None,
        })
    }

    /// All relationships, in declaration order.
    pub fn relationships(&self) -> impl Iterator<Item = &RelationshipDef> {
        self.properties.iter().filter_map(|p| match p {
            PropertyDef::Relationship(r) => Some(r),
            PropertyDef::Column(_) => None,
        })
    }

    /// Primary key columns.
    pub fn primary_keys(&self) -> Vec<&ColumnDef> {
        self.columns().filter(|c| c.primary_key).collect()
    }

    /// Whether `target` names this model, by class or table name.
    pub fn answers_to(&self, target: &str) -> bool {
        self.name == target || self.table.as_deref() == Some(target)
    }
}
