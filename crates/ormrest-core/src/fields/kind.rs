//! The closed set of descriptor kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Descriptor kind (the "field class" of the API schema layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
    Decimal,
    List,
    Raw,
    Nested,
    Enum,
    #[serde(rename = "UUID")]
    Uuid,
    Arbitrary,
}

/// Options every kind accepts.
const COMMON_OPTIONS: &[&str] = &[
    "required",
    "description",
    "title",
    "readonly",
    "default",
    "example",
];

impl FieldKind {
    /// All kinds.
    pub const ALL: [FieldKind; 12] = [
        FieldKind::String,
        FieldKind::Integer,
        FieldKind::Float,
        FieldKind::Boolean,
        FieldKind::DateTime,
        FieldKind::Decimal,
        FieldKind::List,
        FieldKind::Raw,
        FieldKind::Nested,
        FieldKind::Enum,
        FieldKind::Uuid,
        FieldKind::Arbitrary,
    ];

    /// Kind name as used in declarations.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::String => "String",
            FieldKind::Integer => "Integer",
            FieldKind::Float => "Float",
            FieldKind::Boolean => "Boolean",
            FieldKind::DateTime => "DateTime",
            FieldKind::Decimal => "Decimal",
            FieldKind::List => "List",
            FieldKind::Raw => "Raw",
            FieldKind::Nested => "Nested",
            FieldKind::Enum => "Enum",
            FieldKind::Uuid => "UUID",
            FieldKind::Arbitrary => "Arbitrary",
        }
    }

    /// Construction options specific to this kind.
    pub fn specific_options(self) -> &'static [&'static str] {
        match self {
            FieldKind::String => &["min_length", "max_length", "pattern", "enum"],
            FieldKind::Enum => &["min_length", "max_length", "pattern", "enum"],
            FieldKind::Uuid => &["min_length", "max_length", "pattern"],
            FieldKind::Integer | FieldKind::Float | FieldKind::Arbitrary => {
                &["minimum", "maximum"]
            }
            FieldKind::Decimal => &["minimum", "maximum", "decimals", "max_length"],
            FieldKind::List => &["cls_or_instance", "min_items", "max_items", "unique"],
            FieldKind::Nested => &["model", "allow_null", "as_list", "skip_none"],
            FieldKind::Boolean | FieldKind::DateTime | FieldKind::Raw => &[],
        }
    }

    /// Whether `option` is a recognized construction option.
    pub fn recognizes(self, option: &str) -> bool {
        COMMON_OPTIONS.contains(&option) || self.specific_options().contains(&option)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown field kind `{}`", s))
    }
}
