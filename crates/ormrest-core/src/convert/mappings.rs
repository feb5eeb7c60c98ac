//! Type mapping and option derivation tables.
//!
//! Three lookups drive conversion:
//!
//! - the explicit-type table, matched against a storage type's inheritance
//!   chain (most specific entry wins, ties go to table order);
//! - the native-type table, consulted with the storage type's native value type;
//! - the option tables: a default table applied to every kind, overlaid by a
//!   per-kind table. Each entry is an [`OptionRule`] evaluated against the
//!   property being converted.

use super::converter::{ModelConverter, MODEL_POSTFIX};
use crate::catalog::{NativeType, PropertyRef, TypeTag};
use crate::error::{Error, Result};
use crate::fields::{FieldKind, OptionValue};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Computes an option value from a property.
pub type ComputeFn = fn(&ModelConverter, &PropertyRef<'_>) -> Result<Option<OptionValue>>;

/// How a single construction option is derived from a property.
#[derive(Clone)]
pub enum OptionRule {
    /// Dotted attribute path, e.g. `type.enums`.
    Path(&'static str),
    /// Attribute path with `[n]` index segments, e.g. `local_columns[0].nullable`.
    IndexedPath(&'static str),
    /// A fixed value.
    Constant(OptionValue),
    /// Arbitrary derivation.
    Computed(ComputeFn),
    /// Suppresses an option inherited from the default table.
    Omit,
}

impl OptionRule {
    /// Evaluate against `prop`. `None` means the option is left out.
    pub fn evaluate(
        &self,
        converter: &ModelConverter,
        prop: &PropertyRef<'_>,
    ) -> Result<Option<OptionValue>> {
        Ok(match self {
            OptionRule::Path(path) => prop.lookup(path),
            OptionRule::IndexedPath(path) => prop.lookup_indexed(path),
            OptionRule::Constant(value) => Some(value.clone()),
            OptionRule::Computed(compute) => compute(converter, prop)?,
            OptionRule::Omit => None,
        })
    }
}

impl fmt::Debug for OptionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionRule::Path(path) => f.debug_tuple("Path").field(path).finish(),
            OptionRule::IndexedPath(path) => f.debug_tuple("IndexedPath").field(path).finish(),
            OptionRule::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            OptionRule::Computed(_) => f.write_str("Computed(..)"),
            OptionRule::Omit => f.write_str("Omit"),
        }
    }
}

type OptionTable = Vec<(&'static str, OptionRule)>;

/// Lookup tables used by [`ModelConverter`].
#[derive(Debug, Clone)]
pub struct TypeMappings {
    explicit: Vec<(TypeTag, FieldKind)>,
    native: Vec<(NativeType, FieldKind)>,
    default_options: OptionTable,
    kind_options: HashMap<FieldKind, OptionTable>,
}

impl TypeMappings {
    /// The built-in tables.
    pub fn standard() -> Self {
        use FieldKind as F;
        use TypeTag as T;

        let explicit = vec![
            (T::Enum, F::Enum),
            (T::PgBit, F::Integer),
            (T::PgUuid, F::Uuid),
            (T::PgMacAddr, F::String),
            (T::PgInet, F::String),
            (T::PgJson, F::Raw),
            (T::PgJsonb, F::Raw),
            (T::PgHstore, F::Raw),
            (T::Array, F::List),
            (T::MySqlBit, F::Integer),
            (T::MySqlYear, F::Integer),
            (T::MySqlSet, F::List),
            (T::MySqlEnum, F::Enum),
            (T::MsSqlBit, F::Integer),
            (T::Null, F::Raw),
            (T::Json, F::Raw),
            (T::PgMoney, F::Arbitrary),
        ];

        let native = vec![
            (NativeType::Str, F::String),
            (NativeType::Bytes, F::String),
            (NativeType::DateTime, F::DateTime),
            (NativeType::Float, F::Float),
            (NativeType::Bool, F::Boolean),
            (NativeType::Tuple, F::Raw),
            (NativeType::List, F::List),
            (NativeType::Set, F::Raw),
            (NativeType::Int, F::Integer),
            (NativeType::Uuid, F::Uuid),
            (NativeType::Time, F::DateTime),
            (NativeType::Date, F::DateTime),
            (NativeType::Decimal, F::Decimal),
        ];

        let default_options = vec![
            ("required", OptionRule::Computed(required_unless_nullable)),
            ("description", OptionRule::Path("description")),
        ];

        let mut kind_options: HashMap<FieldKind, OptionTable> = F::ALL
            .into_iter()
            .map(|kind| (kind, OptionTable::new()))
            .collect();
        kind_options.insert(F::String, vec![("max_length", OptionRule::Path("length"))]);
        kind_options.insert(F::Uuid, vec![("max_length", OptionRule::Path("length"))]);
        kind_options.insert(
            F::Decimal,
            vec![
                ("max_length", OptionRule::Path("length")),
                ("decimals", OptionRule::Path("type.scale")),
            ],
        );
        kind_options.insert(
            F::Enum,
            vec![
                ("max_length", OptionRule::Path("length")),
                ("enum", OptionRule::Path("type.enums")),
            ],
        );
        kind_options.insert(
            F::List,
            vec![
                ("cls_or_instance", OptionRule::Computed(list_item_kind)),
                ("max_items", OptionRule::Path("length")),
                ("unique", OptionRule::Path("unique")),
            ],
        );
        kind_options.insert(
            F::Nested,
            vec![
                ("required", OptionRule::Omit),
                ("model", OptionRule::Computed(related_model_placeholder)),
                ("allow_null", OptionRule::IndexedPath("local_columns[0].nullable")),
                ("as_list", OptionRule::Path("uselist")),
            ],
        );

        Self {
            explicit,
            native,
            default_options,
            kind_options,
        }
    }

    /// Process-wide copy of the built-in tables.
    pub fn shared() -> Arc<TypeMappings> {
        static STANDARD: OnceLock<Arc<TypeMappings>> = OnceLock::new();
        STANDARD
            .get_or_init(|| Arc::new(TypeMappings::standard()))
            .clone()
    }

    /// Map a storage type class to `kind`, replacing any existing entry.
    pub fn with_type(mut self, tag: TypeTag, kind: FieldKind) -> Self {
        self.explicit.retain(|(t, _)| *t != tag);
        self.explicit.insert(0, (tag, kind));
        self
    }

    /// Map a native value type to `kind`, replacing any existing entry.
    pub fn with_native(mut self, native: NativeType, kind: FieldKind) -> Self {
        self.native.retain(|(n, _)| *n != native);
        self.native.push((native, kind));
        self
    }

    /// Set the derivation rule of `option` for `kind`.
    pub fn with_options(mut self, kind: FieldKind, option: &'static str, rule: OptionRule) -> Self {
        let table = self.kind_options.entry(kind).or_default();
        match table.iter_mut().find(|(name, _)| *name == option) {
            Some(entry) => entry.1 = rule,
            None => table.push((option, rule)),
        }
        self
    }

    /// Kind of the most specific explicit entry `tag` is a subtype of.
    pub fn explicit_kind(&self, tag: TypeTag) -> Option<FieldKind> {
        self.explicit
            .iter()
            .filter_map(|(entry, kind)| tag.distance_to(*entry).map(|d| (d, *kind)))
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, kind)| kind)
    }

    /// Kind mapped to a native value type.
    pub fn native_kind(&self, native: NativeType) -> Option<FieldKind> {
        self.native
            .iter()
            .find(|(n, _)| *n == native)
            .map(|(_, kind)| *kind)
    }

    /// Default rules overlaid by the kind's own rules.
    ///
    /// An overridden default keeps its position; kind-only options follow.
    pub fn options_for(&self, kind: FieldKind) -> Vec<(&'static str, &OptionRule)> {
        let specific = self.kind_options.get(&kind).map(Vec::as_slice).unwrap_or(&[]);
        let mut merged: Vec<(&'static str, &OptionRule)> = self
            .default_options
            .iter()
            .map(|(name, rule)| {
                let rule = specific
                    .iter()
                    .find(|(n, _)| n == name)
                    .map(|(_, r)| r)
                    .unwrap_or(rule);
                (*name, rule)
            })
            .collect();
        merged.extend(
            specific
                .iter()
                .filter(|(name, _)| !self.default_options.iter().any(|(d, _)| d == name))
                .map(|(name, rule)| (*name, rule)),
        );
        merged
    }
}

impl Default for TypeMappings {
    fn default() -> Self {
        Self::standard()
    }
}

/// `required` is the negation of nullability; non-columns are never required.
fn required_unless_nullable(
    _converter: &ModelConverter,
    prop: &PropertyRef<'_>,
) -> Result<Option<OptionValue>> {
    let nullable = match prop {
        PropertyRef::Column(column) => column.is_nullable(),
        PropertyRef::Relationship(_) => true,
    };
    Ok(Some(OptionValue::Bool(!nullable)))
}

/// Item kind of a collection column; untyped collections hold raw values.
fn list_item_kind(
    converter: &ModelConverter,
    prop: &PropertyRef<'_>,
) -> Result<Option<OptionValue>> {
    let item = prop.sql_type().and_then(|ty| ty.item_type.as_deref());
    let kind = match item {
        Some(item) => converter.field_kind_for_type(item)?,
        None => FieldKind::Raw,
    };
    Ok(Some(OptionValue::Kind(kind)))
}

/// Placeholder schema name of a relationship's target model.
fn related_model_placeholder(
    _converter: &ModelConverter,
    prop: &PropertyRef<'_>,
) -> Result<Option<OptionValue>> {
    let PropertyRef::Relationship(rel) = prop else {
        return Ok(None);
    };
    let target = rel.target.ok_or_else(|| Error::UnresolvedRelationship {
        key: rel.def.key.clone(),
        target: rel.def.target.clone(),
    })?;
    Ok(Some(OptionValue::Model(format!(
        "{}{}",
        target.name, MODEL_POSTFIX
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_kind_prefers_most_specific() {
        let mappings = TypeMappings::standard();

        assert_eq!(mappings.explicit_kind(TypeTag::PgJsonb), Some(FieldKind::Raw));
        assert_eq!(mappings.explicit_kind(TypeTag::MySqlEnum), Some(FieldKind::Enum));
        assert_eq!(mappings.explicit_kind(TypeTag::PgEnum), Some(FieldKind::Enum));
        assert_eq!(mappings.explicit_kind(TypeTag::PgArray), Some(FieldKind::List));
        assert_eq!(mappings.explicit_kind(TypeTag::String), None);
        assert_eq!(mappings.explicit_kind(TypeTag::Integer), None);
    }

    #[test]
    fn test_with_type_overrides_entry() {
        let mappings = TypeMappings::standard()
            .with_type(TypeTag::PgJsonb, FieldKind::String)
            .with_type(TypeTag::Text, FieldKind::Raw);

        assert_eq!(mappings.explicit_kind(TypeTag::PgJsonb), Some(FieldKind::String));
        assert_eq!(mappings.explicit_kind(TypeTag::PgJson), Some(FieldKind::Raw));
        assert_eq!(mappings.explicit_kind(TypeTag::UnicodeText), Some(FieldKind::Raw));
        assert_eq!(mappings.explicit_kind(TypeTag::String), None);
    }

    #[test]
    fn test_native_table() {
        let mappings = TypeMappings::standard();

        assert_eq!(mappings.native_kind(NativeType::Bytes), Some(FieldKind::String));
        assert_eq!(mappings.native_kind(NativeType::Date), Some(FieldKind::DateTime));
        assert_eq!(mappings.native_kind(NativeType::Decimal), Some(FieldKind::Decimal));
        assert_eq!(mappings.native_kind(NativeType::Dict), None);
        assert_eq!(mappings.native_kind(NativeType::TimeDelta), None);

        let mappings = mappings.with_native(NativeType::TimeDelta, FieldKind::String);
        assert_eq!(mappings.native_kind(NativeType::TimeDelta), Some(FieldKind::String));
    }

    #[test]
    fn test_options_merge_defaults_with_kind_table() {
        let mappings = TypeMappings::standard();

        let string: Vec<_> = mappings
            .options_for(FieldKind::String)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(string, vec!["required", "description", "max_length"]);

        let nested = mappings.options_for(FieldKind::Nested);
        assert_eq!(nested[0].0, "required");
        assert!(matches!(nested[0].1, OptionRule::Omit));
        assert_eq!(nested.len(), 5);

        let boolean = mappings.options_for(FieldKind::Boolean);
        assert_eq!(boolean.len(), 2);
    }

    #[test]
    fn test_with_options_replaces_rule() {
        let mappings = TypeMappings::standard().with_options(
            FieldKind::String,
            "max_length",
            OptionRule::Constant(OptionValue::Int(64)),
        );
        let string = mappings.options_for(FieldKind::String);

        assert_eq!(string.len(), 3);
        assert!(matches!(string[2].1, OptionRule::Constant(OptionValue::Int(64))));
    }
}
