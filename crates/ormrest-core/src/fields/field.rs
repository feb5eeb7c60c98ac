//! Field descriptor instances.

use super::kind::FieldKind;
use super::value::{float_to_json, OptionValue};
use crate::error::{Error, Result};
use serde_json::{json, Map, Value};

/// Prefix of nested model references in rendered schemas.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// A typed field descriptor: kind plus construction options.
///
/// Options that a kind does not recognize keep their default values and are
/// never rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub kind: FieldKind,
    pub required: bool,
    pub readonly: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<OptionValue>,
    pub example: Option<OptionValue>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    /// Allowed values (`enum` option).
    pub enum_values: Vec<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub decimals: Option<u64>,
    /// Item descriptor of a list (`cls_or_instance` option).
    pub item: Option<Box<Field>>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique: bool,
    /// Referenced schema model of a nested field.
    pub model: Option<String>,
    pub allow_null: bool,
    pub as_list: bool,
    pub skip_none: bool,
}

impl Field {
    /// Create a descriptor with default options.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            readonly: false,
            title: None,
            description: None,
            default: None,
            example: None,
            min_length: None,
            max_length: None,
            pattern: None,
            enum_values: Vec::new(),
            minimum: None,
            maximum: None,
            decimals: None,
            item: None,
            min_items: None,
            max_items: None,
            unique: false,
            model: None,
            allow_null: false,
            as_list: false,
            skip_none: false,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    pub fn float() -> Self {
        Self::new(FieldKind::Float)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    pub fn datetime() -> Self {
        Self::new(FieldKind::DateTime)
    }

    pub fn raw() -> Self {
        Self::new(FieldKind::Raw)
    }

    /// A list of `item` descriptors.
    pub fn list(item: impl Into<Field>) -> Self {
        let mut field = Self::new(FieldKind::List);
        field.item = Some(Box::new(item.into()));
        field
    }

    /// A reference to the schema model named `model`.
    pub fn nested(model: impl Into<String>) -> Self {
        let mut field = Self::new(FieldKind::Nested);
        field.model = Some(model.into());
        field
    }

    /// An enumerated string.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut field = Self::new(FieldKind::Enum);
        field.enum_values = values.into_iter().map(Into::into).collect();
        field
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as read-only.
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_max_length(mut self, max_length: u64) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn with_maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn with_example(mut self, example: impl Into<OptionValue>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<OptionValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Render a nested field as a list of references.
    pub fn as_list(mut self) -> Self {
        self.as_list = true;
        self
    }

    /// Instantiate `kind` from keyword options.
    ///
    /// Every option must be recognized by the kind and carry a value of the
    /// expected shape.
    pub fn construct<I, K>(kind: FieldKind, options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, OptionValue)>,
        K: AsRef<str>,
    {
        let mut field = Field::new(kind);
        for (name, value) in options {
            field.apply(name.as_ref(), value)?;
        }
        Ok(field)
    }

    fn apply(&mut self, option: &str, value: OptionValue) -> Result<()> {
        let kind = self.kind;
        if !kind.recognizes(option) {
            return Err(invalid(kind, option, "option not recognized".to_string()));
        }
        let mismatch = |expected: &str, value: &OptionValue| {
            invalid(
                kind,
                option,
                format!("expected {}, got {}", expected, value.shape()),
            )
        };

        match option {
            "required" | "readonly" | "unique" | "allow_null" | "as_list" | "skip_none" => {
                let flag = value.as_bool().ok_or_else(|| mismatch("boolean", &value))?;
                match option {
                    "required" => self.required = flag,
                    "readonly" => self.readonly = flag,
                    "unique" => self.unique = flag,
                    "allow_null" => self.allow_null = flag,
                    "as_list" => self.as_list = flag,
                    _ => self.skip_none = flag,
                }
            }
            "description" | "title" | "pattern" | "model" => {
                let text = value
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| mismatch("string", &value))?;
                match option {
                    "description" => self.description = Some(text),
                    "title" => self.title = Some(text),
                    "pattern" => self.pattern = Some(text),
                    _ => self.model = Some(text),
                }
            }
            "min_length" | "max_length" | "min_items" | "max_items" | "decimals" => {
                let count = value
                    .as_count()
                    .ok_or_else(|| mismatch("non-negative integer", &value))?;
                match option {
                    "min_length" => self.min_length = Some(count),
                    "max_length" => self.max_length = Some(count),
                    "min_items" => self.min_items = Some(count),
                    "max_items" => self.max_items = Some(count),
                    _ => self.decimals = Some(count),
                }
            }
            "minimum" | "maximum" => {
                let bound = value.as_f64().ok_or_else(|| mismatch("number", &value))?;
                if option == "minimum" {
                    self.minimum = Some(bound);
                } else {
                    self.maximum = Some(bound);
                }
            }
            "enum" => match value {
                OptionValue::List(values) => self.enum_values = values,
                other => return Err(mismatch("list of strings", &other)),
            },
            "cls_or_instance" => {
                let item = match value {
                    OptionValue::Kind(kind) => Field::new(kind),
                    OptionValue::Field(field) => *field,
                    OptionValue::Str(name) => Field::new(
                        name.parse()
                            .map_err(|reason| invalid(kind, option, reason))?,
                    ),
                    other => return Err(mismatch("field kind or field", &other)),
                };
                self.item = Some(Box::new(item));
            }
            "default" => self.default = Some(value),
            "example" => self.example = Some(value),
            _ => return Err(invalid(kind, option, "option not recognized".to_string())),
        }
        Ok(())
    }

    /// Name of the schema model this field references, directly or as list item.
    pub fn reference(&self) -> Option<&str> {
        match self.kind {
            FieldKind::Nested => self.model.as_deref(),
            FieldKind::List => self.item.as_deref().and_then(Field::reference),
            _ => None,
        }
    }

    /// Render the property schema.
    pub fn schema(&self) -> Result<Value> {
        self.schema_value().map_err(Error::Serialization)
    }

    pub(crate) fn schema_value(&self) -> std::result::Result<Value, String> {
        let mut schema = Map::new();
        let mut put = |key: &str, value: Value| {
            schema.insert(key.to_string(), value);
        };

        match self.kind {
            FieldKind::String | FieldKind::Enum | FieldKind::Uuid => {
                put("type", json!("string"));
                if self.kind == FieldKind::Uuid {
                    put("format", json!("uuid"));
                }
                if let Some(n) = self.min_length {
                    put("minLength", json!(n));
                }
                if let Some(n) = self.max_length {
                    put("maxLength", json!(n));
                }
                if let Some(pattern) = &self.pattern {
                    put("pattern", json!(pattern));
                }
                if !self.enum_values.is_empty() {
                    put("enum", json!(self.enum_values));
                }
            }
            FieldKind::Integer | FieldKind::Float | FieldKind::Decimal | FieldKind::Arbitrary => {
                let ty = if self.kind == FieldKind::Integer {
                    "integer"
                } else {
                    "number"
                };
                put("type", json!(ty));
                if self.kind == FieldKind::Float {
                    put("format", json!("float"));
                }
                if let Some(min) = self.minimum {
                    put("minimum", float_to_json(min).map_err(|e| option_error("minimum", e))?);
                }
                if let Some(max) = self.maximum {
                    put("maximum", float_to_json(max).map_err(|e| option_error("maximum", e))?);
                }
            }
            FieldKind::Boolean => put("type", json!("boolean")),
            FieldKind::DateTime => {
                put("type", json!("string"));
                put("format", json!("date-time"));
            }
            FieldKind::Raw => put("type", json!("object")),
            FieldKind::List => {
                put("type", json!("array"));
                let items = match &self.item {
                    Some(item) => item.schema_value()?,
                    None => json!({}),
                };
                put("items", items);
                if let Some(n) = self.min_items {
                    put("minItems", json!(n));
                }
                if let Some(n) = self.max_items {
                    put("maxItems", json!(n));
                }
                if self.unique {
                    put("uniqueItems", json!(true));
                }
            }
            FieldKind::Nested => match &self.model {
                Some(model) => {
                    let reference = json!({ "$ref": format!("{}{}", DEFINITIONS_PREFIX, model) });
                    if self.as_list {
                        put("type", json!("array"));
                        put("items", reference);
                    } else if let Value::Object(map) = reference {
                        for (k, v) in map {
                            put(&k, v);
                        }
                    }
                    if self.allow_null {
                        put("x-nullable", json!(true));
                    }
                }
                None => put("type", json!("object")),
            },
        }

        if let Some(title) = &self.title {
            put("title", json!(title));
        }
        if let Some(description) = &self.description {
            put("description", json!(description));
        }
        if self.readonly {
            put("readOnly", json!(true));
        }
        if let Some(default) = &self.default {
            put("default", default.to_json().map_err(|e| option_error("default", e))?);
        }
        if let Some(example) = &self.example {
            put("example", example.to_json().map_err(|e| option_error("example", e))?);
        }

        Ok(Value::Object(schema))
    }
}

impl From<FieldKind> for Field {
    fn from(kind: FieldKind) -> Self {
        Field::new(kind)
    }
}

fn invalid(kind: FieldKind, option: &str, reason: String) -> Error {
    Error::InvalidOption {
        kind: kind.name(),
        option: option.to_string(),
        reason,
    }
}

fn option_error(option: &str, message: String) -> String {
    format!("option `{}`: {}", option, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_construct_string() {
        let field = Field::construct(
            FieldKind::String,
            [
                ("required", OptionValue::Bool(true)),
                ("max_length", OptionValue::Int(50)),
            ],
        )
        .unwrap();

        assert!(field.required);
        assert_eq!(field.max_length, Some(50));
    }

    #[test]
    fn test_construct_rejects_unrecognized_option() {
        let err = Field::construct(FieldKind::Integer, [("max_length", OptionValue::Int(5))])
            .unwrap_err();

        assert!(matches!(err, Error::InvalidOption { kind: "Integer", .. }));
    }

    #[test]
    fn test_construct_rejects_wrong_shape() {
        let err = Field::construct(FieldKind::String, [("max_length", OptionValue::Int(-1))])
            .unwrap_err();
        assert!(err.to_string().contains("non-negative integer"));

        let err = Field::construct(FieldKind::Enum, [("enum", OptionValue::Bool(true))])
            .unwrap_err();
        assert!(err.to_string().contains("list of strings"));
    }

    #[test]
    fn test_list_item_from_kind_or_name() {
        let field = Field::construct(
            FieldKind::List,
            [("cls_or_instance", OptionValue::Kind(FieldKind::Integer))],
        )
        .unwrap();
        assert_eq!(field.item.as_deref().map(|f| f.kind), Some(FieldKind::Integer));

        let field = Field::construct(
            FieldKind::List,
            [("cls_or_instance", OptionValue::from("String"))],
        )
        .unwrap();
        assert_eq!(field.item.as_deref().map(|f| f.kind), Some(FieldKind::String));
    }

    #[test]
    fn test_string_schema() {
        let field = Field::string()
            .with_max_length(50)
            .required()
            .with_description("First name");

        assert_eq!(
            field.schema().unwrap(),
            json!({"type": "string", "maxLength": 50, "description": "First name"})
        );
    }

    #[test]
    fn test_uuid_and_datetime_schema() {
        assert_eq!(
            Field::new(FieldKind::Uuid).schema().unwrap(),
            json!({"type": "string", "format": "uuid"})
        );
        assert_eq!(
            Field::datetime().schema().unwrap(),
            json!({"type": "string", "format": "date-time"})
        );
    }

    #[test]
    fn test_list_schema() {
        let mut field = Field::list(FieldKind::Integer);
        field.max_items = Some(3);
        field.unique = true;

        assert_eq!(
            field.schema().unwrap(),
            json!({
                "type": "array",
                "items": {"type": "integer"},
                "maxItems": 3,
                "uniqueItems": true
            })
        );
    }

    #[test]
    fn test_nested_schema() {
        let single = Field::nested("UsersModel");
        assert_eq!(
            single.schema().unwrap(),
            json!({"$ref": "#/definitions/UsersModel"})
        );

        let many = Field::nested("UsersModel").as_list();
        assert_eq!(
            many.schema().unwrap(),
            json!({"type": "array", "items": {"$ref": "#/definitions/UsersModel"}})
        );
        assert_eq!(many.reference(), Some("UsersModel"));
        assert_eq!(Field::list(many).reference(), Some("UsersModel"));
    }

    #[test]
    fn test_non_finite_bound_fails_rendering() {
        let field = Field::float().with_minimum(f64::NAN);
        let err = field.schema().unwrap_err();

        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().contains("minimum"));
    }
}
