//! ORM-side model declarations.
//!
//! The catalog describes mapped classes: their columns, storage types and
//! relationships. It is the input side of conversion and is never mutated by it.

mod catalog;
mod column;
mod model;
mod property;
mod relation;
mod types;

pub use catalog::{Catalog, Mapper};
pub use column::ColumnDef;
pub use model::{ModelDef, PropertyDef};
pub use property::{PropertyRef, RelationshipProperty};
pub use relation::{Cardinality, RelationshipDef};
pub use types::{NativeType, SqlType, TypeTag};
