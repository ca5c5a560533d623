//! datagen: seeded columnar test data generation.
//!
//! A generation document names an output file and format and defines one
//! generator per column. Running it drives the generators in lockstep and
//! writes the rows to CSV or Parquet.
//!
//! # Crates
//!
//! - `datagen_core` - column types, values, documents, the sink contract
//! - `datagen_generator` - seeded generators and the row driver
//! - `datagen_sink_csv` / `datagen_sink_parquet` - output writers
//!
//! This crate ties them together: [`RunConfig`] carries the run-level
//! settings, [`generate_file`] and [`validate_file`] are the entry points
//! used by the `datagen` binary.
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate every listed document, writing relative outputs under /data
//! datagen generate --output-prefix /data trades.json quotes.yaml
//!
//! # Keep files that already exist
//! datagen generate --no-overwrite trades.json
//!
//! # Check documents without writing anything
//! datagen validate trades.json
//! ```

pub mod args;
pub mod config;
pub mod run;

pub use args::GenerateArgs;
pub use config::RunConfig;
pub use run::{
    generate_document, generate_file, load_document, validate_file, GenerateMetrics,
    GenerateOutcome, RunError,
};
