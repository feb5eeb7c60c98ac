//! Schema model assembly and registration.

mod builder;
mod model;
mod registry;

pub use builder::SchemaBuilder;
pub use model::SchemaModel;
pub use registry::{DanglingReference, ModelRegistry};
