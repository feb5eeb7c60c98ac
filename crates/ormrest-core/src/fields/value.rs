//! Construction option values.

use super::field::Field;
use super::kind::FieldKind;
use serde_json::{Number, Value};

/// A value passed to a descriptor constructor.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A list of strings, e.g. enumerated values.
    List(Vec<String>),
    /// A descriptor kind, instantiated with defaults when used.
    Kind(FieldKind),
    /// A descriptor instance.
    Field(Box<Field>),
    /// Name of a placeholder schema model.
    Model(String),
    /// Arbitrary JSON, e.g. an example object.
    Json(Value),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Non-negative integer value.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            OptionValue::Int(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Int(n) => Some(*n as f64),
            OptionValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) | OptionValue::Model(s) => Some(s),
            _ => None,
        }
    }

    /// Short description of the value's shape, for error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "boolean",
            OptionValue::Int(_) => "integer",
            OptionValue::Float(_) => "float",
            OptionValue::Str(_) => "string",
            OptionValue::List(_) => "list",
            OptionValue::Kind(_) => "field kind",
            OptionValue::Field(_) => "field",
            OptionValue::Model(_) => "model reference",
            OptionValue::Json(_) => "json",
        }
    }

    /// Render as JSON. Non-finite floats have no JSON form.
    pub fn to_json(&self) -> Result<Value, String> {
        Ok(match self {
            OptionValue::Bool(b) => Value::Bool(*b),
            OptionValue::Int(n) => Value::from(*n),
            OptionValue::Float(f) => float_to_json(*f)?,
            OptionValue::Str(s) | OptionValue::Model(s) => Value::String(s.clone()),
            OptionValue::List(items) => Value::from(items.clone()),
            OptionValue::Kind(kind) => Value::String(kind.name().to_string()),
            OptionValue::Field(field) => field.schema_value()?,
            OptionValue::Json(value) => value.clone(),
        })
    }

    /// Convert a JSON value into an option value.
    pub fn from_json(value: &Value) -> OptionValue {
        match value {
            Value::Bool(b) => OptionValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => OptionValue::Int(i),
                None => OptionValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => OptionValue::Str(s.clone()),
            Value::Array(items) if items.iter().all(Value::is_string) => OptionValue::List(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            ),
            other => OptionValue::Json(other.clone()),
        }
    }
}

pub(crate) fn float_to_json(value: f64) -> Result<Value, String> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| format!("{} is not representable in JSON", value))
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Str(value)
    }
}

impl From<FieldKind> for OptionValue {
    fn from(kind: FieldKind) -> Self {
        OptionValue::Kind(kind)
    }
}

impl From<Field> for OptionValue {
    fn from(field: Field) -> Self {
        OptionValue::Field(Box::new(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_shapes() {
        assert_eq!(OptionValue::from_json(&json!(true)), OptionValue::Bool(true));
        assert_eq!(OptionValue::from_json(&json!(12)), OptionValue::Int(12));
        assert_eq!(OptionValue::from_json(&json!(1.5)), OptionValue::Float(1.5));
        assert_eq!(
            OptionValue::from_json(&json!(["a", "b"])),
            OptionValue::List(vec!["a".into(), "b".into()])
        );
        assert_eq!(
            OptionValue::from_json(&json!([1, 2])),
            OptionValue::Json(json!([1, 2]))
        );
    }

    #[test]
    fn test_non_finite_float_has_no_json_form() {
        assert!(OptionValue::Float(f64::NAN).to_json().is_err());
        assert!(OptionValue::Float(f64::INFINITY).to_json().is_err());
        assert_eq!(OptionValue::Float(0.5).to_json(), Ok(json!(0.5)));
    }

    #[test]
    fn test_count_rejects_negative() {
        assert_eq!(OptionValue::Int(3).as_count(), Some(3));
        assert_eq!(OptionValue::Int(-3).as_count(), None);
        assert_eq!(OptionValue::Bool(true).as_count(), None);
    }
}
