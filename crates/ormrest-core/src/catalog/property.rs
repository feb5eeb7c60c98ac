//! Resolved property views and attribute-path lookup.
//!
//! Option rules read metadata off a property with dotted paths such as
//! `type.enums` or `local_columns[0].nullable`. Paths are walked over a small
//! typed attribute tree; a missing attribute anywhere along the path yields
//! `None` rather than an error.

use super::column::ColumnDef;
use super::model::ModelDef;
use super::relation::RelationshipDef;
use super::types::{SqlType, TypeTag};
use crate::fields::OptionValue;

/// A relationship with its join columns and target resolved against a catalog.
#[derive(Debug, Clone)]
pub struct RelationshipProperty<'a> {
    /// The declaration.
    pub def: &'a RelationshipDef,
    /// Local join columns that exist on the declaring model.
    pub local_columns: Vec<&'a ColumnDef>,
    /// Target model, if the catalog declares it.
    pub target: Option<&'a ModelDef>,
}

/// A property yielded by [`Mapper::iterate_properties`](super::Mapper::iterate_properties).
#[derive(Debug, Clone)]
pub enum PropertyRef<'a> {
    Column(&'a ColumnDef),
    Relationship(RelationshipProperty<'a>),
}

impl<'a> PropertyRef<'a> {
    /// Attribute key.
    pub fn key(&self) -> &'a str {
        match self {
            PropertyRef::Column(c) => &c.key,
            PropertyRef::Relationship(r) => &r.def.key,
        }
    }

    /// Check if this is a relationship.
    pub fn is_relationship(&self) -> bool {
        matches!(self, PropertyRef::Relationship(_))
    }

    /// Storage type of a column property.
    pub fn sql_type(&self) -> Option<&'a SqlType> {
        match self {
            PropertyRef::Column(c) => Some(&c.sql_type),
            PropertyRef::Relationship(_) => None,
        }
    }

    /// Look up a dotted attribute path, e.g. `type.length`.
    pub fn lookup(&self, path: &str) -> Option<OptionValue> {
        walk(self.root(), path, false)
    }

    /// Look up a path whose segments may carry an index, e.g.
    /// `local_columns[0].nullable`.
    pub fn lookup_indexed(&self, path: &str) -> Option<OptionValue> {
        walk(self.root(), path, true)
    }

    fn root(&self) -> Attr<'_> {
        match self {
            PropertyRef::Column(c) => Attr::Column(c),
            PropertyRef::Relationship(r) => Attr::Relationship(r),
        }
    }
}

/// One node of the attribute tree.
#[derive(Debug, Clone)]
enum Attr<'a> {
    Column(&'a ColumnDef),
    Relationship(&'a RelationshipProperty<'a>),
    Type(&'a SqlType),
    Columns(&'a [&'a ColumnDef]),
    Model(&'a ModelDef),
    Value(OptionValue),
}

impl<'a> Attr<'a> {
    fn get(self, name: &str) -> Option<Attr<'a>> {
        match self {
            Attr::Column(c) => match name {
                "key" => Some(Attr::Value(OptionValue::Str(c.key.clone()))),
                "type" => Some(Attr::Type(&c.sql_type)),
                "nullable" => Some(Attr::Value(OptionValue::Bool(c.is_nullable()))),
                "primary_key" => Some(Attr::Value(OptionValue::Bool(c.primary_key))),
                "unique" => c.unique.map(|u| Attr::Value(OptionValue::Bool(u))),
                "length" => Attr::Type(&c.sql_type).get("length"),
                "description" => c
                    .description
                    .as_ref()
                    .map(|d| Attr::Value(OptionValue::Str(d.clone()))),
                _ => None,
            },
            Attr::Type(t) => match name {
                "name" => Some(Attr::Value(OptionValue::Str(t.type_name().to_string()))),
                "length" => t
                    .effective_length()
                    .map(|n| Attr::Value(OptionValue::Int(n.into()))),
                "precision" => t.precision.map(|n| Attr::Value(OptionValue::Int(n.into()))),
                "scale" => t.scale.map(|n| Attr::Value(OptionValue::Int(n.into()))),
                "enums" if t.tag.is_subtype_of(TypeTag::Enum) => {
                    Some(Attr::Value(OptionValue::List(t.enums.clone())))
                }
                "item_type" => t.item_type.as_deref().map(Attr::Type),
                "impl" => t.wrapped().map(Attr::Type),
                _ => None,
            },
            Attr::Relationship(r) => match name {
                "key" => Some(Attr::Value(OptionValue::Str(r.def.key.clone()))),
                "uselist" => Some(Attr::Value(OptionValue::Bool(r.def.uselist()))),
                "local_columns" => Some(Attr::Columns(&r.local_columns)),
                "target" => r.target.map(Attr::Model),
                "description" => r
                    .def
                    .description
                    .as_ref()
                    .map(|d| Attr::Value(OptionValue::Str(d.clone()))),
                _ => None,
            },
            Attr::Model(m) => match name {
                "name" => Some(Attr::Value(OptionValue::Str(m.name.clone()))),
                "table" => m
                    .table
                    .as_ref()
                    .map(|t| Attr::Value(OptionValue::Str(t.clone()))),
                _ => None,
            },
            Attr::Columns(_) | Attr::Value(_) => None,
        }
    }

    fn index(self, index: usize) -> Option<Attr<'a>> {
        match self {
            Attr::Columns(columns) => columns.get(index).map(|c| Attr::Column(c)),
            Attr::Value(OptionValue::List(values)) => values
                .get(index)
                .map(|v| Attr::Value(OptionValue::Str(v.clone()))),
            _ => None,
        }
    }

    fn into_value(self) -> Option<OptionValue> {
        match self {
            Attr::Value(value) => Some(value),
            _ => None,
        }
    }
}

fn walk(root: Attr<'_>, path: &str, allow_index: bool) -> Option<OptionValue> {
    let mut node = root;
    for segment in path.split('.') {
        node = if allow_index {
            step_indexed(node, segment)?
        } else {
            node.get(segment)?
        };
    }
    node.into_value()
}

/// Apply a segment of the form `name`, `name[n]` or `[n]`.
fn step_indexed<'a>(node: Attr<'a>, segment: &str) -> Option<Attr<'a>> {
    let Some(open) = segment.find('[') else {
        return node.get(segment);
    };
    let index: usize = segment[open + 1..].strip_suffix(']')?.parse().ok()?;
    let name = &segment[..open];
    let node = if name.is_empty() { node } else { node.get(name)? };
    node.index(index)
}
