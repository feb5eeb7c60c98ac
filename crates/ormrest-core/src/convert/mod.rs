//! Model conversion: type resolution, option derivation and filtering.

mod converter;
mod mappings;
mod options;

pub use converter::{FieldMap, ModelConverter, MODEL_POSTFIX};
pub use mappings::{ComputeFn, OptionRule, TypeMappings};
pub use options::ConvertOptions;
