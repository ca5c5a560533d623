//! Command-line interface for datagen
//!
//! # Usage Examples
//!
//! ```bash
//! # Generate the files described by two documents
//! datagen generate trades.json quotes.yaml
//!
//! # Write relative outputs under a prefix, keeping existing files
//! datagen generate --output-prefix /data --no-overwrite trades.json
//!
//! # Fail instead of skipping when an output already exists
//! datagen generate --no-overwrite --force trades.json
//!
//! # Validate documents and their source files without generating
//! datagen validate trades.json
//! ```
//!
//! Set `RUST_LOG=info` (or `debug` for per-column and progress detail) to
//! see what is being generated.

use anyhow::Context;
use clap::{Parser, Subcommand};
use datagen::{generate_file, validate_file, GenerateArgs, GenerateOutcome, RunConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datagen")]
#[command(about = "Generate seeded columnar test data as CSV or Parquet")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the output file of each generation document, in order
    Generate {
        #[command(flatten)]
        args: GenerateArgs,

        /// Generation documents (JSON, or YAML with a .yaml/.yml extension)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Parse each document and build its generators without writing output
    Validate {
        /// Generation documents
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { args, files } => {
            let config = RunConfig::from(&args);
            for file in &files {
                let outcome = generate_file(file, &config)
                    .with_context(|| format!("Failed to generate from {file:?}"))?;

                match outcome {
                    GenerateOutcome::Written { path, metrics } => tracing::info!(
                        "Generated {:?}: {} rows in {:?}",
                        path,
                        metrics.rows_written,
                        metrics.total_duration
                    ),
                    GenerateOutcome::Skipped { path } => {
                        tracing::info!("Skipped {:?}: output already exists", path)
                    }
                }
            }
        }
        Commands::Validate { files } => {
            for file in &files {
                let schema = validate_file(file)
                    .with_context(|| format!("Failed to validate {file:?}"))?;
                let columns: Vec<String> = schema
                    .iter()
                    .map(|c| format!("{} {}", c.name, c.column_type))
                    .collect();
                println!("{}: OK ({})", file.display(), columns.join(", "));
            }
        }
    }

    Ok(())
}
