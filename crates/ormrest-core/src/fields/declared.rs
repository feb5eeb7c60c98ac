//! Explicitly declared fields.

use super::field::Field;
use super::kind::FieldKind;
use super::value::OptionValue;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// Caller-declared fields keyed by name. These always win over converted ones.
pub type DeclaredFields = IndexMap<String, Field>;

/// Parse declared fields from a JSON document.
///
/// The document must be an object. Each entry is either a kind name
/// (`"String"`), or an object with a `type` kind name and construction
/// options. Entries that do not describe a field are skipped.
pub fn declared_from_json(document: &Value) -> Result<DeclaredFields> {
    let Value::Object(entries) = document else {
        return Err(Error::config("`fields` option must be a mapping"));
    };

    let mut declared = DeclaredFields::new();
    for (name, spec) in entries {
        match field_from_spec(spec)? {
            Some(field) => {
                declared.insert(name.clone(), field);
            }
            None => debug!(field = %name, "Skipping declaration that is not a field"),
        }
    }
    Ok(declared)
}

fn field_from_spec(spec: &Value) -> Result<Option<Field>> {
    match spec {
        Value::String(name) => Ok(name.parse::<FieldKind>().ok().map(Field::new)),
        Value::Object(map) => {
            let Some(kind) = map
                .get("type")
                .and_then(Value::as_str)
                .and_then(|name| name.parse::<FieldKind>().ok())
            else {
                return Ok(None);
            };

            let mut options = Vec::with_capacity(map.len());
            for (option, value) in map.iter().filter(|(k, _)| k.as_str() != "type") {
                let value = match option.as_str() {
                    "cls_or_instance" => item_option(value)?,
                    "model" => match value.as_str() {
                        Some(model) => OptionValue::Model(model.to_string()),
                        None => OptionValue::from_json(value),
                    },
                    _ => OptionValue::from_json(value),
                };
                options.push((option.as_str(), value));
            }

            Field::construct(kind, options)
                .map(Some)
                .map_err(|e| Error::config(format!("invalid declared field: {}", e)))
        }
        _ => Ok(None),
    }
}

fn item_option(value: &Value) -> Result<OptionValue> {
    match field_from_spec(value)? {
        Some(field) => Ok(OptionValue::Field(Box::new(field))),
        None => Err(Error::config(format!(
            "`cls_or_instance` does not describe a field: {}",
            value
        ))),
    }
}
