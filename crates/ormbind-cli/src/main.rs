//! ORMBind Command-Line Inspector
//!
//! Resolves a bundle of mapping sources and prints the relational schema
//! and collection bindings it produces.

mod formatter;

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use formatter::{Formatter, OutputFormat};
use ormbind_core::{
    ForeignKeyNaming, IdentifierCase, MappingSources, Metadata, MetadataBuilder, ResolverConfig,
};
use tracing::debug;

/// Errors surfaced by the command line.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The input file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input could not be decoded into mapping sources.
    #[error(transparent)]
    Decode(#[from] ormbind_core::Error),

    /// Resolution failed.
    #[error(transparent)]
    Binding(#[from] ormbind_core::BindingError),
}

/// Input encoding of the mapping bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// JSON document
    Json,
    /// Archived binary bundle
    Binary,
}

/// Case folding applied to unquoted names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CaseArg {
    /// Fold to lowercase
    Lower,
    /// Fold to uppercase
    Upper,
    /// Keep names as written
    Preserve,
}

impl From<CaseArg> for IdentifierCase {
    fn from(arg: CaseArg) -> Self {
        match arg {
            CaseArg::Lower => IdentifierCase::Lower,
            CaseArg::Upper => IdentifierCase::Upper,
            CaseArg::Preserve => IdentifierCase::Preserve,
        }
    }
}

/// ORMBind Command-Line Inspector
#[derive(Parser, Debug)]
#[command(name = "ormbind")]
#[command(version, about = "Resolve entity and collection mappings into a relational schema")]
pub struct Args {
    /// Mapping bundle to resolve
    pub file: PathBuf,

    /// Input encoding
    #[arg(long, default_value = "json", value_enum)]
    pub input: InputFormat,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Case folding for unquoted identifiers
    #[arg(long, default_value = "lower", value_enum)]
    pub identifier_case: CaseArg,

    /// Generate names for foreign keys declared without one
    #[arg(long)]
    pub generate_fk_names: bool,

    /// Element column name for collections that do not declare one
    #[arg(long)]
    pub element_column: Option<String>,

    /// Write the bundle as an archived binary file after a successful pass
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl Args {
    fn resolver_config(&self) -> ResolverConfig {
        let naming = if self.generate_fk_names {
            ForeignKeyNaming::Generated
        } else {
            ForeignKeyNaming::Deferred
        };
        let config = ResolverConfig::new()
            .with_identifier_case(self.identifier_case.into())
            .with_foreign_key_naming(naming);
        match &self.element_column {
            Some(column) => config.with_default_element_column(column),
            None => config,
        }
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ormbind=info")),
        )
        .init();

    let args = Args::parse();
    let formatter = formatter::create_formatter(args.format);

    if let Err(e) = run(&args, &*formatter) {
        eprintln!("{}", formatter.format_error(&e.to_string()));
        std::process::exit(1);
    }
}

fn run(args: &Args, formatter: &dyn Formatter) -> Result<(), CliError> {
    let sources = load_sources(&args.file, args.input)?;
    debug!(entities = sources.entities.len(), "Loaded mapping sources");

    let metadata = MetadataBuilder::new(args.resolver_config()).build(&sources)?;
    println!("{}", render(&metadata, formatter));

    if let Some(path) = &args.export {
        let bytes = sources.to_bytes()?;
        std::fs::write(path, bytes).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
    }
    Ok(())
}

fn load_sources(path: &Path, input: InputFormat) -> Result<MappingSources, CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let sources = match input {
        InputFormat::Json => {
            MappingSources::from_json(&std::fs::read_to_string(path).map_err(io_error)?)?
        }
        InputFormat::Binary => MappingSources::from_bytes(&std::fs::read(path).map_err(io_error)?)?,
    };
    Ok(sources)
}

fn render(metadata: &Metadata, formatter: &dyn Formatter) -> String {
    format!(
        "{}\n\n{}",
        formatter.format_schema(metadata),
        formatter.format_collections(metadata)
    )
}
