//! Schema generation from catalog documents.

use anyhow::{bail, Context};
use ormrest_core::{
    declared_from_json, Catalog, DeclaredFields, ModelRegistry, SchemaBuilder, MODEL_POSTFIX,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::CliConfig;

/// Read the configured documents and generate schema definitions.
pub fn run(config: &CliConfig) -> anyhow::Result<Value> {
    let catalog_source = std::fs::read_to_string(&config.catalog_path)
        .with_context(|| format!("failed to read catalog {}", config.catalog_path.display()))?;
    let fields_source = match &config.fields_path {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read fields {}", path.display()))?,
        ),
        None => None,
    };

    generate(config, &catalog_source, fields_source.as_deref())
}

/// Generate a `{ schema name: schema }` object from document sources.
pub fn generate(
    config: &CliConfig,
    catalog_source: &str,
    fields_source: Option<&str>,
) -> anyhow::Result<Value> {
    let catalog = Catalog::from_json(catalog_source).context("invalid catalog")?;
    let declared = match fields_source {
        Some(source) => {
            let document: Value =
                serde_json::from_str(source).context("fields document is not JSON")?;
            declared_from_json(&document)?
        }
        None => DeclaredFields::new(),
    };

    let models: Vec<&str> = if config.models.is_empty() {
        catalog.model_names()
    } else {
        config.models.iter().map(String::as_str).collect()
    };
    if config.schema_name.is_some() && models.len() != 1 {
        bail!("--name requires exactly one model, got {}", models.len());
    }

    let mut registry = ModelRegistry::new();
    for model in models {
        let Some(mapper) = catalog.mapper(model) else {
            bail!(
                "model `{}` is not declared in the catalog (known: {})",
                model,
                catalog.model_names().join(", ")
            );
        };
        let name = config
            .schema_name
            .clone()
            .unwrap_or_else(|| format!("{}{}", model, MODEL_POSTFIX));
        debug!(model, schema = %name, "Generating schema");

        let schema = SchemaBuilder::new(name)
            .model(mapper)
            .fields(declared.clone())
            .options(config.options.clone())
            .build()
            .with_context(|| format!("failed to convert model `{}`", model))?;
        registry.add_model(schema);
    }

    if config.check_references {
        registry.validate_references()?;
    } else {
        for dangling in registry.unresolved_references() {
            debug!(
                model = %dangling.model,
                field = %dangling.field,
                target = %dangling.target,
                "Nested field references a model that was not generated"
            );
        }
    }

    info!(models = registry.len(), "Generated schema definitions");
    Ok(registry.definitions()?)
}
