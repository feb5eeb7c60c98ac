//! API schema field descriptors.

mod declared;
mod field;
mod kind;
mod value;

pub use declared::{declared_from_json, DeclaredFields};
pub use field::{Field, DEFINITIONS_PREFIX};
pub use kind::FieldKind;
pub use value::OptionValue;
