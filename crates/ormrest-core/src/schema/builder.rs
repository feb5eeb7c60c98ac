//! Explicit schema model construction.

use super::model::SchemaModel;
use crate::catalog::Mapper;
use crate::convert::{ConvertOptions, FieldMap, ModelConverter};
use crate::error::{Error, Result};
use crate::fields::{DeclaredFields, Field};
use tracing::{info, instrument};

/// Builder for a [`SchemaModel`].
///
/// Without a mapped model the schema holds exactly the declared fields. With
/// one, the model's properties are converted first and the declared fields
/// are laid over the result.
#[derive(Debug)]
pub struct SchemaBuilder<'a> {
    name: String,
    declared: DeclaredFields,
    model: Option<Mapper<'a>>,
    options: ConvertOptions,
    converter: ModelConverter,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: DeclaredFields::new(),
            model: None,
            options: ConvertOptions::default(),
            converter: ModelConverter::default(),
        }
    }

    /// Replace the declared fields.
    pub fn fields(mut self, declared: DeclaredFields) -> Self {
        self.declared = declared;
        self
    }

    /// Declare a single field.
    pub fn field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.declared.insert(name.into(), field.into());
        self
    }

    /// Generate fields from a mapped model.
    pub fn model(mut self, mapper: Mapper<'a>) -> Self {
        self.model = Some(mapper);
        self
    }

    pub fn only<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = self.options.only(keys);
        self
    }

    pub fn exclude<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = self.options.exclude(keys);
        self
    }

    pub fn include_relationships(mut self, include: bool) -> Self {
        self.options = self.options.include_relationships(include);
        self
    }

    pub fn sorted(mut self, sorted: bool) -> Self {
        self.options = self.options.sorted(sorted);
        self
    }

    /// Replace all conversion options at once.
    pub fn options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a converter with custom mapping tables.
    pub fn converter(mut self, converter: ModelConverter) -> Self {
        self.converter = converter;
        self
    }

    /// Assemble the model and check that its schema serializes.
    #[instrument(skip_all, fields(schema = %self.name))]
    pub fn build(self) -> Result<SchemaModel> {
        self.options.validate()?;

        let sorted = self.model.is_some() && self.options.sorted;
        let fields = match &self.model {
            Some(mapper) => {
                let mut fields =
                    self.converter
                        .fields_for_model(mapper, &self.options, &self.declared)?;
                for (key, field) in self.declared {
                    fields.insert(key, field);
                }
                if sorted {
                    fields.sort_keys();
                }
                fields
            }
            None => self.declared.into_iter().collect::<FieldMap>(),
        };

        let model = SchemaModel::new(self.name, fields);
        model.schema().map_err(|e| match e {
            Error::Serialization(reason) => {
                Error::Serialization(format!("schema `{}`: {}", model.name(), reason))
            }
            other => other,
        })?;

        info!(fields = model.fields().len(), sorted, "Assembled schema model");
        Ok(model)
    }
}
