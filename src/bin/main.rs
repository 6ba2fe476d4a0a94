//! flatgen CLI - Generate flat table HiveQL from a descriptor document
//!
//! Usage:
//!   flatgen [--config <flatgen.toml>] <command> <descriptor.json> [options]
//!
//! Examples:
//!   flatgen create sales_flat.json
//!   flatgen select sales_flat.json --single-line --skip-as KYLIN_SALES.PRICE
//!   flatgen count sales_flat.json --output-dir /tmp/kylin/row_count
//!   flatgen all sales_flat.json --config flatgen.toml
//!
//! Insert statement generators (`advanced_generator`) can only be registered
//! through the library API; the CLI rejects a configuration that names one.

use clap::{Parser, Subcommand};
use flatgen::config::{FlatTableSettings, Settings};
use flatgen::document::FlatTableDocument;
use flatgen::plugin::PluginRegistry;
use flatgen::{FlatTableDesc, FlatTableGenerator};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flatgen")]
#[command(about = "flatgen - Generate the HiveQL that materializes a flat table")]
#[command(version)]
#[command(
    after_help = "The advanced_generator setting is not supported here: insert statement generators can only be registered through the library API."
)]
struct Cli {
    /// Path to a flatgen.toml (defaults to the standard search locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// CREATE EXTERNAL TABLE for the flat table
    Create {
        /// Path to the descriptor document
        file: PathBuf,
    },

    /// DROP TABLE for the flat table
    Drop {
        /// Path to the descriptor document
        file: PathBuf,
    },

    /// SELECT over the joined tables
    Select {
        /// Path to the descriptor document
        file: PathBuf,

        /// Render on a single line
        #[arg(long)]
        single_line: bool,

        /// TABLE.COLUMN to project without an alias (repeatable)
        #[arg(long = "skip-as")]
        skip_as: Vec<String>,
    },

    /// INSERT OVERWRITE TABLE ... SELECT
    Insert {
        /// Path to the descriptor document
        file: PathBuf,

        /// Generate the partial-load insert (never delegated to a plugin)
        #[arg(long)]
        partial: bool,
    },

    /// Row count probe of the root fact table
    Count {
        /// Path to the descriptor document
        file: PathBuf,

        /// Directory the count is written to
        #[arg(short, long)]
        output_dir: String,
    },

    /// CLUSTER BY / DISTRIBUTE BY rewrite of the flat table
    Redistribute {
        /// Path to the descriptor document
        file: PathBuf,
    },

    /// USE <database> for the configured database
    Init,

    /// Init, drop, create, insert and redistribute, in order
    All {
        /// Path to the descriptor document
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(sql) => {
            print!("{}", sql);
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, String> {
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
    .map_err(|e| e.to_string())?;

    let flat_settings = Arc::new(settings.flat_table);
    let plugins = cli_plugins(&flat_settings)?;
    let generator = FlatTableGenerator::new(Arc::clone(&flat_settings), plugins)
        .map_err(|e| e.to_string())?;

    let load = |file: &PathBuf| -> Result<FlatTableDesc, String> {
        FlatTableDocument::from_path(file)
            .and_then(|doc| doc.resolve(Arc::clone(&flat_settings)))
            .map_err(|e| format!("{}: {}", file.display(), e))
    };

    let sql = match cli.command {
        Commands::Create { file } => generator.create_table_statement(&load(&file)?),
        Commands::Drop { file } => generator.drop_table_statement(&load(&file)?),
        Commands::Select {
            file,
            single_line,
            skip_as,
        } => {
            let mut sql = generator
                .select_statement(&load(&file)?, single_line, &skip_as)
                .map_err(|e| e.to_string())?;
            sql.push('\n');
            sql
        }
        Commands::Insert { file, partial } => {
            let desc = load(&file)?;
            let result = if partial {
                generator.insert_partial_statement(&desc)
            } else {
                generator.insert_statement(&desc)
            };
            result.map_err(|e| e.to_string())?
        }
        Commands::Count { file, output_dir } => {
            let mut sql = generator
                .count_statement(&load(&file)?, &output_dir)
                .map_err(|e| e.to_string())?;
            sql.push('\n');
            sql
        }
        Commands::Redistribute { file } => generator.redistribute_statement(&load(&file)?),
        Commands::Init => generator.init_statements(),
        Commands::All { file } => generator
            .materialize_statements(&load(&file)?)
            .map_err(|e| e.to_string())?
            .concat(),
    };

    Ok(sql)
}

/// The CLI has no insert statement generators to offer.
fn cli_plugins(settings: &FlatTableSettings) -> Result<PluginRegistry, String> {
    match settings.advanced_generator.as_deref() {
        Some(name) if settings.is_advanced_flat_table_used() => Err(format!(
            "advanced_generator = \"{}\" is not supported by the flatgen CLI; \
             insert statement generators can only be registered through the library API",
            name
        )),
        _ => Ok(PluginRegistry::new()),
    }
}
