//! Catalog of model declarations and per-model mappers.

use super::model::{ModelDef, PropertyDef};
use super::property::{PropertyRef, RelationshipProperty};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A set of model declarations that can reference each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Model declarations keyed by class name, in declaration order.
    #[serde(with = "models_as_list")]
    pub models: IndexMap<String, ModelDef>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model to the catalog, replacing one with the same name.
    pub fn with_model(mut self, model: ModelDef) -> Self {
        self.models.insert(model.name.clone(), model);
        self
    }

    /// Get a model by class name.
    pub fn get_model(&self, name: &str) -> Option<&ModelDef> {
        self.models.get(name)
    }

    /// Find the model a relationship target refers to, by class or table name.
    pub fn resolve(&self, target: &str) -> Option<&ModelDef> {
        self.models
            .get(target)
            .or_else(|| self.models.values().find(|m| m.answers_to(target)))
    }

    /// List all model names.
    pub fn model_names(&self) -> Vec<&str> {
        self.models.keys().map(|s| s.as_str()).collect()
    }

    /// Mapper for a model declared in this catalog.
    pub fn mapper(&self, name: &str) -> Option<Mapper<'_>> {
        self.get_model(name).map(|model| Mapper::new(self, model))
    }

    /// Check that property keys are unique within every model.
    pub fn validate(&self) -> Result<()> {
        for model in self.models.values() {
            let mut seen = HashSet::new();
            for prop in &model.properties {
                if !seen.insert(prop.key()) {
                    return Err(Error::config(format!(
                        "model `{}` declares property `{}` more than once",
                        model.name,
                        prop.key()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Parse and validate a catalog document.
    pub fn from_json(source: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(source)
            .map_err(|e| Error::config(format!("invalid catalog document: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }
}

/// Reflection view over one model, resolving relationships against its catalog.
#[derive(Debug, Clone, Copy)]
pub struct Mapper<'a> {
    catalog: &'a Catalog,
    model: &'a ModelDef,
}

impl<'a> Mapper<'a> {
    /// Create a mapper for `model`; relationships resolve against `catalog`.
    pub fn new(catalog: &'a Catalog, model: &'a ModelDef) -> Self {
        Self { catalog, model }
    }

    /// The mapped model.
    pub fn model(&self) -> &'a ModelDef {
        self.model
    }

    /// Properties in declaration order.
    ///
    /// Relationship join columns and targets are resolved as each item is
    /// produced; an unknown target yields `target: None`.
    pub fn iterate_properties(&self) -> impl Iterator<Item = PropertyRef<'a>> + 'a {
        let catalog = self.catalog;
        let model = self.model;
        model.properties.iter().map(move |prop| match prop {
            PropertyDef::Column(column) => PropertyRef::Column(column),
            PropertyDef::Relationship(def) => PropertyRef::Relationship(RelationshipProperty {
                def,
                local_columns: def
                    .local_columns
                    .iter()
                    .filter_map(|key| model.get_column(key))
                    .collect(),
                target: catalog.resolve(&def.target),
            }),
        })
    }
}

/// Serializes the model map as a plain list of models.
mod models_as_list {
    use super::ModelDef;
    use indexmap::IndexMap;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        models: &IndexMap<String, ModelDef>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<&ModelDef> = models.values().collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<String, ModelDef>, D::Error> {
        let list = Vec::<ModelDef>::deserialize(deserializer)?;
        let mut models = IndexMap::with_capacity(list.len());
        for model in list {
            let name = model.name.clone();
            if models.insert(name.clone(), model).is_some() {
                return Err(D::Error::custom(format!("duplicate model `{}`", name)));
            }
        }
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ColumnDef, RelationshipDef, SqlType};

    fn sample_catalog() -> Catalog {
        let users = ModelDef::new("Users")
            .with_table("users")
            .with_column(ColumnDef::new("id", SqlType::integer()).primary_key())
            .with_column(ColumnDef::new("login", SqlType::integer()).not_null());

        let computers = ModelDef::new("Computers")
            .with_column(ColumnDef::new("id", SqlType::integer()).primary_key())
            .with_column(ColumnDef::new("user_id", SqlType::integer()).not_null())
            .with_relationship(RelationshipDef::many_to_one("user", "users", "user_id"))
            .with_relationship(RelationshipDef::one_to_many("peripherals", "Peripherals"));

        Catalog::new().with_model(users).with_model(computers)
    }

    #[test]
    fn test_catalog_builder() {
        let catalog = sample_catalog();

        assert_eq!(catalog.model_names(), vec!["Users", "Computers"]);
        assert!(catalog.get_model("Users").is_some());
        assert!(catalog.get_model("users").is_none());
        assert_eq!(catalog.resolve("users").map(|m| m.name.as_str()), Some("Users"));
    }

    #[test]
    fn test_mapper_resolves_relationships() {
        let catalog = sample_catalog();
        let mapper = catalog.mapper("Computers").unwrap();
        let props: Vec<_> = mapper.iterate_properties().collect();

        assert_eq!(props.len(), 4);
        match &props[2] {
            PropertyRef::Relationship(rel) => {
                assert_eq!(rel.target.map(|m| m.name.as_str()), Some("Users"));
                assert_eq!(rel.local_columns.len(), 1);
            }
            other => panic!("expected relationship, got {:?}", other),
        }
        match &props[3] {
            PropertyRef::Relationship(rel) => assert!(rel.target.is_none()),
            other => panic!("expected relationship, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_duplicate_property() {
        let model = ModelDef::new("Users")
            .with_column(ColumnDef::new("id", SqlType::integer()))
            .with_column(ColumnDef::new("id", SqlType::big_integer()));
        let catalog = Catalog::new().with_model(model);

        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("`id`"));
    }

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json(
            r#"{"models": [
                {"name": "Users", "properties": [
                    {"kind": "column", "key": "id", "type": {"tag": "integer"}, "primary_key": true}
                ]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(catalog.model_names(), vec!["Users"]);
    }

    #[test]
    fn test_from_json_rejects_duplicate_models() {
        let result = Catalog::from_json(
            r#"{"models": [{"name": "Users"}, {"name": "Users"}]}"#,
        );
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_json_roundtrip_keeps_order() {
        let catalog = sample_catalog();
        let json = serde_json::to_string(&catalog).unwrap();
        let decoded = Catalog::from_json(&json).unwrap();

        assert_eq!(decoded, catalog);
    }
}
