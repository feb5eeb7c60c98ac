//! CLI configuration.

use std::path::PathBuf;

use clap::Parser;
use ormrest_core::ConvertOptions;

/// ORMREST schema generator command line arguments.
#[derive(Debug, Parser)]
#[command(name = "ormrest")]
#[command(version, about = "Generate REST API schema models from ORM model declarations")]
pub struct Args {
    /// Catalog document (JSON) declaring the models.
    #[arg(short, long)]
    pub catalog: PathBuf,

    /// Model to convert. Repeat for several; defaults to every model.
    #[arg(short, long = "model")]
    pub models: Vec<String>,

    /// Schema name to use. Only valid with a single model.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Only convert these properties (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Skip these properties (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Declared fields document (JSON) laid over every generated schema.
    #[arg(short, long)]
    pub fields: Option<PathBuf>,

    /// Convert relationships into nested fields.
    #[arg(long)]
    pub include_relationships: bool,

    /// Keep property declaration order instead of sorting by key.
    #[arg(long)]
    pub no_sort: bool,

    /// Fail when a nested field references a model that was not generated.
    #[arg(long)]
    pub check_references: bool,

    /// Print compact JSON.
    #[arg(long)]
    pub compact: bool,
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Catalog document path.
    pub catalog_path: PathBuf,
    /// Models to convert; empty means all.
    pub models: Vec<String>,
    /// Schema name override.
    pub schema_name: Option<String>,
    /// Declared fields document path.
    pub fields_path: Option<PathBuf>,
    /// Conversion options shared by every model.
    pub options: ConvertOptions,
    pub check_references: bool,
    pub pretty: bool,
}

impl From<&Args> for CliConfig {
    fn from(args: &Args) -> Self {
        let mut options = ConvertOptions::new()
            .include_relationships(args.include_relationships)
            .sorted(!args.no_sort);
        if !args.only.is_empty() {
            options = options.only(args.only.iter().cloned());
        }
        if !args.exclude.is_empty() {
            options = options.exclude(args.exclude.iter().cloned());
        }

        Self {
            catalog_path: args.catalog.clone(),
            models: args.models.clone(),
            schema_name: args.name.clone(),
            fields_path: args.fields.clone(),
            options,
            check_references: args.check_references,
            pretty: !args.compact,
        }
    }
}
