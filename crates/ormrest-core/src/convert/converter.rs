//! Model to field-descriptor conversion.

use super::mappings::TypeMappings;
use super::options::ConvertOptions;
use crate::catalog::{ColumnDef, Mapper, PropertyRef, RelationshipProperty, SqlType};
use crate::error::{Error, Result};
use crate::fields::{DeclaredFields, Field, FieldKind, OptionValue};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

/// Suffix appended to a target model name to form its schema name.
pub const MODEL_POSTFIX: &str = "Model";

/// Converted fields keyed by property name.
pub type FieldMap = IndexMap<String, Field>;

/// Converts model properties into field descriptors.
#[derive(Debug, Clone)]
pub struct ModelConverter {
    mappings: Arc<TypeMappings>,
}

impl Default for ModelConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelConverter {
    /// Converter using the built-in tables.
    pub fn new() -> Self {
        Self {
            mappings: TypeMappings::shared(),
        }
    }

    /// Converter using custom tables.
    pub fn with_mappings(mappings: TypeMappings) -> Self {
        Self {
            mappings: Arc::new(mappings),
        }
    }

    pub fn mappings(&self) -> &TypeMappings {
        &self.mappings
    }

    /// Convert every retained property of the mapped model.
    ///
    /// A property whose key has a declared field is not converted; the
    /// declared field is used in its place. Result order follows property
    /// declaration order.
    #[instrument(skip_all, fields(model = %mapper.model().name))]
    pub fn fields_for_model(
        &self,
        mapper: &Mapper<'_>,
        options: &ConvertOptions,
        declared: &DeclaredFields,
    ) -> Result<FieldMap> {
        options.validate()?;
        warn_unknown_keys(mapper, options);

        let mut result = FieldMap::new();
        for prop in self.property_iter(mapper, options) {
            let key = prop.key();
            let field = match declared.get(key) {
                Some(field) => {
                    debug!(property = key, "Using declared field");
                    field.clone()
                }
                None => self.property_to_field(&prop)?,
            };
            result.insert(key.to_string(), field);
        }

        debug!(fields = result.len(), "Converted model");
        Ok(result)
    }

    /// Properties of the mapped model that pass the filtering rules.
    pub fn property_iter<'a>(
        &self,
        mapper: &Mapper<'a>,
        options: &'a ConvertOptions,
    ) -> impl Iterator<Item = PropertyRef<'a>> + 'a {
        mapper
            .iterate_properties()
            .filter(move |prop| match options.exclusion_reason(prop) {
                Some(reason) => {
                    debug!(property = prop.key(), reason, "Skipping property");
                    false
                }
                None => true,
            })
    }

    /// Convert a single property.
    pub fn property_to_field(&self, prop: &PropertyRef<'_>) -> Result<Field> {
        let key = prop.key();
        let kind = match prop {
            PropertyRef::Column(column) => self.field_kind_for_column(column),
            PropertyRef::Relationship(rel) => Ok(self.field_kind_for_relationship(rel)),
        }
        .map_err(|e| e.for_property(key))?;

        let options = self
            .field_options(kind, prop)
            .map_err(|e| e.for_property(key))?;
        let field = Field::construct(kind, options)?;

        debug!(property = key, kind = %kind, "Converted property");
        Ok(field)
    }

    /// Descriptor kind for a column.
    pub fn field_kind_for_column(&self, column: &ColumnDef) -> Result<FieldKind> {
        self.field_kind_for_type(&column.sql_type)
    }

    /// Descriptor kind for a storage type.
    ///
    /// Resolution order: explicit table over the type's inheritance chain,
    /// native table, then the wrapped type of a decorator.
    pub fn field_kind_for_type(&self, sql_type: &SqlType) -> Result<FieldKind> {
        if let Some(kind) = self.mappings.explicit_kind(sql_type.tag) {
            trace!(sql_type = sql_type.type_name(), kind = %kind, "Explicit type mapping");
            return Ok(kind);
        }

        let native = sql_type.native_type();
        if let Some(kind) = native.and_then(|n| self.mappings.native_kind(n)) {
            trace!(sql_type = sql_type.type_name(), kind = %kind, "Native type mapping");
            return Ok(kind);
        }

        if let Some(inner) = sql_type.wrapped() {
            trace!(
                sql_type = sql_type.type_name(),
                wrapped = inner.type_name(),
                "Resolving wrapped type"
            );
            return self.field_kind_for_type(inner);
        }

        Err(Error::UnmappedType {
            type_name: sql_type.type_name().to_string(),
            key: None,
        })
    }

    /// Descriptor kind for a relationship.
    pub fn field_kind_for_relationship(&self, _rel: &RelationshipProperty<'_>) -> FieldKind {
        FieldKind::Nested
    }

    /// Construction options for `kind`, evaluated against `prop`.
    ///
    /// Rules evaluating to nothing are left out.
    pub fn field_options(
        &self,
        kind: FieldKind,
        prop: &PropertyRef<'_>,
    ) -> Result<Vec<(&'static str, OptionValue)>> {
        let mut options = Vec::new();
        for (name, rule) in self.mappings.options_for(kind) {
            if let Some(value) = rule.evaluate(self, prop)? {
                options.push((name, value));
            }
        }
        Ok(options)
    }
}

fn warn_unknown_keys(mapper: &Mapper<'_>, options: &ConvertOptions) {
    let model = mapper.model();
    for (option, keys) in [("only", &options.only), ("exclude", &options.exclude)] {
        for key in keys.iter().flatten() {
            if model.get_property(key).is_none() {
                warn!(option, key = %key, "Option names a property the model does not declare");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, ModelDef, NativeType, RelationshipDef, TypeTag};
    use crate::convert::OptionRule;
    use pretty_assertions::assert_eq;

    fn catalog() -> Catalog {
        Catalog::new()
            .with_model(
                ModelDef::new("Users")
                    .with_table("users")
                    .with_column(ColumnDef::new("id", SqlType::integer()).primary_key())
                    .with_column(ColumnDef::new("first_name", SqlType::string(50)).not_null())
                    .with_column(ColumnDef::new("nickname", SqlType::string(20)))
                    .with_column(ColumnDef::new("_secret", SqlType::text()))
                    .with_relationship(RelationshipDef::one_to_many("computers", "Computers")),
            )
            .with_model(
                ModelDef::new("Computers")
                    .with_table("computers")
                    .with_column(ColumnDef::new("id", SqlType::integer()).primary_key())
                    .with_column(ColumnDef::new("user_id", SqlType::integer()))
                    .with_relationship(RelationshipDef::many_to_one("user", "users", "user_id")),
            )
    }

    fn convert(catalog: &Catalog, model: &str, options: &ConvertOptions) -> Result<FieldMap> {
        let mapper = catalog.mapper(model).unwrap();
        ModelConverter::new().fields_for_model(&mapper, options, &DeclaredFields::new())
    }

    #[test]
    fn test_columns_in_declaration_order() {
        let catalog = catalog();
        let fields = convert(&catalog, "Users", &ConvertOptions::new()).unwrap();

        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            vec!["id", "first_name", "nickname"]
        );
        assert!(fields["id"].required);
        assert_eq!(fields["first_name"], Field::string().with_max_length(50).required());
        assert_eq!(fields["nickname"], Field::string().with_max_length(20));
    }

    #[test]
    fn test_relationships_become_nested_placeholders() {
        let catalog = catalog();
        let options = ConvertOptions::new().include_relationships(true);

        let users = convert(&catalog, "Users", &options).unwrap();
        assert_eq!(users["computers"], Field::nested("ComputersModel").as_list());

        let computers = convert(&catalog, "Computers", &options).unwrap();
        let user = &computers["user"];
        assert_eq!(user.reference(), Some("UsersModel"));
        assert!(!user.as_list);
        assert!(user.allow_null);
        assert!(!user.required);
    }

    #[test]
    fn test_unresolved_relationship_target() {
        let catalog = Catalog::new().with_model(
            ModelDef::new("Orphan")
                .with_relationship(RelationshipDef::one_to_many("parents", "Missing")),
        );
        let options = ConvertOptions::new().include_relationships(true);

        let err = convert(&catalog, "Orphan", &options).unwrap_err();
        assert!(matches!(
            err,
            Error::UnresolvedRelationship { ref key, ref target } if key == "parents" && target == "Missing"
        ));
    }

    #[test]
    fn test_declared_field_skips_conversion() {
        let catalog = Catalog::new().with_model(
            ModelDef::new("Odd")
                .with_column(ColumnDef::new("id", SqlType::integer()))
                .with_column(ColumnDef::new("blob", SqlType::user_defined("Blob", None))),
        );
        let mapper = catalog.mapper("Odd").unwrap();
        let mut declared = DeclaredFields::new();
        declared.insert("blob".into(), Field::raw());

        let fields = ModelConverter::new()
            .fields_for_model(&mapper, &ConvertOptions::new(), &declared)
            .unwrap();
        assert_eq!(fields["blob"], Field::raw());
    }

    #[test]
    fn test_unmapped_type_names_type_and_property() {
        let catalog = Catalog::new().with_model(
            ModelDef::new("Odd").with_column(ColumnDef::new("blob", SqlType::user_defined("Blob", None))),
        );

        let err = convert(&catalog, "Odd", &ConvertOptions::new()).unwrap_err();
        assert!(matches!(err, Error::UnmappedType { ref type_name, .. } if type_name == "Blob"));
        assert!(err.to_string().contains("Blob"));
        assert!(err.to_string().contains("blob"));
    }

    #[test]
    fn test_type_resolution_layers() {
        let converter = ModelConverter::new();

        assert_eq!(
            converter.field_kind_for_type(&SqlType::new(TypeTag::PgJsonb)).unwrap(),
            FieldKind::Raw
        );
        assert_eq!(
            converter.field_kind_for_type(&SqlType::new(TypeTag::MySqlTinyInt)).unwrap(),
            FieldKind::Integer
        );
        assert_eq!(
            converter
                .field_kind_for_type(&SqlType::decorated("Lowercase", SqlType::string(30)))
                .unwrap(),
            FieldKind::String
        );
        assert_eq!(
            converter.field_kind_for_type(&SqlType::new(TypeTag::Interval)).unwrap(),
            FieldKind::DateTime
        );
        assert_eq!(
            converter
                .field_kind_for_type(&SqlType::user_defined("Money", Some(NativeType::Decimal)))
                .unwrap(),
            FieldKind::Decimal
        );
    }

    #[test]
    fn test_list_item_kind() {
        let catalog = Catalog::new().with_model(
            ModelDef::new("Tagged")
                .with_column(ColumnDef::new("scores", SqlType::array(SqlType::integer()).with_length(3)))
                .with_column(ColumnDef::new("anything", SqlType::new(TypeTag::Array))),
        );

        let fields = convert(&catalog, "Tagged", &ConvertOptions::new()).unwrap();
        assert_eq!(fields["scores"].item.as_deref().map(|f| f.kind), Some(FieldKind::Integer));
        assert_eq!(fields["scores"].max_items, Some(3));
        assert_eq!(fields["anything"].item.as_deref().map(|f| f.kind), Some(FieldKind::Raw));
    }

    #[test]
    fn test_unmappable_list_item_names_column() {
        let column = ColumnDef::new(
            "spans",
            SqlType::array(SqlType::user_defined("Span", None)),
        );

        let err = ModelConverter::new()
            .property_to_field(&PropertyRef::Column(&column))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnmappedType { ref type_name, key: Some(ref key) }
                if type_name == "Span" && key == "spans"
        ));
    }

    #[test]
    fn test_enum_max_length_from_values() {
        let column = ColumnDef::new("power", SqlType::enumeration(["on", "off"])).not_null();

        let field = ModelConverter::new()
            .property_to_field(&PropertyRef::Column(&column))
            .unwrap();
        assert_eq!(field, Field::enumeration(["on", "off"]).with_max_length(3).required());
    }

    #[test]
    fn test_custom_mappings() {
        let mappings = TypeMappings::standard()
            .with_type(TypeTag::Text, FieldKind::Raw)
            .with_options(FieldKind::Raw, "title", OptionRule::Path("type.name"));
        let converter = ModelConverter::with_mappings(mappings);
        let column = ColumnDef::new("notes", SqlType::text());

        let field = converter.property_to_field(&PropertyRef::Column(&column)).unwrap();
        assert_eq!(field.kind, FieldKind::Raw);
        assert_eq!(field.title.as_deref(), Some("Text"));
    }

    #[test]
    fn test_options_validated_before_enumeration() {
        let catalog = catalog();
        let options = ConvertOptions::new().only(["id"]).exclude(["nickname"]);

        let err = convert(&catalog, "Users", &options).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
