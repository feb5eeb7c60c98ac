//! Assembled schema models.

use super::builder::SchemaBuilder;
use crate::convert::FieldMap;
use crate::error::{Error, Result};
use crate::fields::Field;
use serde_json::{json, Map, Value};

/// A named API schema model: an ordered mapping of field descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaModel {
    name: String,
    fields: FieldMap,
}

impl SchemaModel {
    /// Create a model from already assembled fields.
    pub fn new(name: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Start building a model named `name`.
    pub fn builder<'a>(name: impl Into<String>) -> SchemaBuilder<'a> {
        SchemaBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.get(key)
    }

    /// Field keys in schema order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `(field, model)` pairs for every nested reference.
    pub fn references(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter_map(|(key, field)| field.reference().map(|model| (key.as_str(), model)))
    }

    /// Render the Swagger object schema.
    ///
    /// `required` lists required field keys in lexical order and is left out
    /// when empty.
    pub fn schema(&self) -> Result<Value> {
        let mut properties = Map::new();
        for (key, field) in &self.fields {
            let schema = field
                .schema_value()
                .map_err(|e| Error::Serialization(format!("field `{}`: {}", key, e)))?;
            properties.insert(key.clone(), schema);
        }

        let mut required: Vec<&str> = self
            .fields
            .iter()
            .filter(|(_, field)| field.required)
            .map(|(key, _)| key.as_str())
            .collect();
        required.sort_unstable();

        let mut schema = Map::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), json!(required));
        }
        Ok(Value::Object(schema))
    }

    /// Serialize the schema to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.schema()?)?)
    }

    /// Serialize the schema to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.schema()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn model() -> SchemaModel {
        let mut fields = FieldMap::new();
        fields.insert("name".into(), Field::string().with_max_length(50).required());
        fields.insert("id".into(), Field::integer().required());
        fields.insert("owner".into(), Field::nested("UsersModel"));
        fields.insert("notes".into(), Field::raw());
        SchemaModel::new("ComputerModel", fields)
    }

    #[test]
    fn test_schema_keeps_field_order() {
        let schema = model().schema().unwrap();
        let keys: Vec<_> = schema["properties"].as_object().unwrap().keys().cloned().collect();

        assert_eq!(keys, vec!["name", "id", "owner", "notes"]);
        assert_eq!(schema["required"], json!(["id", "name"]));
        assert_eq!(schema["properties"]["owner"], json!({"$ref": "#/definitions/UsersModel"}));
    }

    #[test]
    fn test_required_omitted_when_empty() {
        let mut fields = FieldMap::new();
        fields.insert("notes".into(), Field::raw());
        let schema = SchemaModel::new("Notes", fields).schema().unwrap();

        assert_eq!(
            schema,
            json!({"type": "object", "properties": {"notes": {"type": "object"}}})
        );
    }

    #[test]
    fn test_references() {
        let model = model();
        assert_eq!(model.references().collect::<Vec<_>>(), vec![("owner", "UsersModel")]);
        assert_eq!(model.keys().count(), 4);
    }

    #[test]
    fn test_serialization_failure_names_field() {
        let mut fields = FieldMap::new();
        fields.insert("ratio".into(), Field::float().with_maximum(f64::INFINITY));
        let err = SchemaModel::new("Broken", fields).to_json().unwrap_err();

        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().contains("ratio"));
    }
}
