//! ORMREST Command-Line Schema Generator
//!
//! Reads a catalog of model declarations and prints the generated schema
//! definitions as JSON.

mod config;
mod generate;

use clap::Parser;
use config::{Args, CliConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("ormrest_cli=info".parse()?)
                .add_directive("ormrest_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = CliConfig::from(&args);

    info!(
        catalog = %config.catalog_path.display(),
        models = config.models.len(),
        "Generating schema definitions"
    );

    let definitions = generate::run(&config)?;
    let output = if config.pretty {
        serde_json::to_string_pretty(&definitions)?
    } else {
        serde_json::to_string(&definitions)?
    };
    println!("{}", output);

    Ok(())
}
