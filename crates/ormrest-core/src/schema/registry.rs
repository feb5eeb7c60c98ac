//! Registry of named schema models.

use super::builder::SchemaBuilder;
use super::model::SchemaModel;
use crate::catalog::Catalog;
use crate::convert::{ConvertOptions, MODEL_POSTFIX};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

/// Named schema models, in registration order.
///
/// Nested fields refer to other models by name; the registry is where those
/// names resolve.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: IndexMap<String, SchemaModel>,
}

/// A nested field whose referenced model is not registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub model: String,
    pub field: String,
    pub target: String,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `model` under its own name, replacing any previous entry.
    pub fn add_model(&mut self, model: SchemaModel) -> &SchemaModel {
        let name = model.name().to_string();
        debug!(model = %name, "Registering schema model");
        let (index, _) = self.models.insert_full(name, model);
        &self.models[index]
    }

    pub fn get(&self, name: &str) -> Option<&SchemaModel> {
        self.models.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Every nested reference as `(model, field, target)`.
    pub fn references(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.models.values().flat_map(|model| {
            model
                .references()
                .map(move |(field, target)| (model.name(), field, target))
        })
    }

    /// Nested references whose target is not registered.
    pub fn unresolved_references(&self) -> Vec<DanglingReference> {
        self.references()
            .filter(|(_, _, target)| !self.models.contains_key(*target))
            .map(|(model, field, target)| DanglingReference {
                model: model.to_string(),
                field: field.to_string(),
                target: target.to_string(),
            })
            .collect()
    }

    /// Fail on the first nested reference whose target is not registered.
    pub fn validate_references(&self) -> Result<()> {
        match self.unresolved_references().into_iter().next() {
            Some(DanglingReference {
                model,
                field,
                target,
            }) => Err(Error::UnresolvedReference {
                model,
                field,
                target,
            }),
            None => Ok(()),
        }
    }

    /// `definitions` object of a Swagger document: schema name to schema.
    pub fn definitions(&self) -> Result<Value> {
        let mut definitions = Map::new();
        for (name, model) in &self.models {
            definitions.insert(name.clone(), model.schema()?);
        }
        Ok(Value::Object(definitions))
    }

    /// Build `<Name>Model` for every catalog model.
    ///
    /// Placeholder names produced for relationships match these names, so a
    /// registry built with `include_relationships` resolves on its own.
    pub fn from_catalog(catalog: &Catalog, options: &ConvertOptions) -> Result<Self> {
        let mut registry = Self::new();
        for name in catalog.model_names() {
            let Some(mapper) = catalog.mapper(name) else {
                continue;
            };
            let model = SchemaBuilder::new(format!("{}{}", name, MODEL_POSTFIX))
                .model(mapper)
                .options(options.clone())
                .build()?;
            registry.add_model(model);
        }
        Ok(registry)
    }
}
