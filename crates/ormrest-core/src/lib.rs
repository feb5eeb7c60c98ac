//! ORMREST Core - ORM model to REST API schema conversion.
//!
//! This crate turns mapped-model declarations (columns, storage types and
//! relationships) into typed field descriptors and assembles them into
//! Swagger-style schema models.
//!
//! ```
//! use ormrest_core::{Catalog, ColumnDef, FieldKind, ModelDef, SchemaModel, SqlType};
//!
//! let catalog = Catalog::new().with_model(
//!     ModelDef::new("Users")
//!         .with_column(ColumnDef::new("id", SqlType::integer()).primary_key())
//!         .with_column(ColumnDef::new("first_name", SqlType::string(50)).not_null()),
//! );
//!
//! let model = SchemaModel::builder("UsersModel")
//!     .model(catalog.mapper("Users").unwrap())
//!     .field("phone_number", FieldKind::String)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(model.get("first_name").unwrap().max_length, Some(50));
//! assert_eq!(
//!     model.keys().collect::<Vec<_>>(),
//!     vec!["first_name", "id", "phone_number"]
//! );
//! ```

pub mod catalog;
pub mod convert;
pub mod error;
pub mod fields;
pub mod schema;

pub use catalog::{
    Cardinality, Catalog, ColumnDef, Mapper, ModelDef, NativeType, PropertyDef, PropertyRef,
    RelationshipDef, SqlType, TypeTag,
};
pub use convert::{ConvertOptions, FieldMap, ModelConverter, OptionRule, TypeMappings, MODEL_POSTFIX};
pub use error::{Error, ErrorKind, Result};
pub use fields::{declared_from_json, DeclaredFields, Field, FieldKind, OptionValue};
pub use schema::{ModelRegistry, SchemaBuilder, SchemaModel};
