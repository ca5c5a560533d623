//! Generator engine for the datagen test data generator.
//!
//! Each output column gets its own [`ColumnGenerator`]: one seeded variant
//! wrapped by a [`PercentNullManager`]. The [`RowDriver`] pulls the columns in
//! lockstep and ends the stream as soon as any finite column runs out.
//!
//! # Architecture
//!
//! ```text
//! GenerationDocument (JSON / YAML)
//!        │
//!        ▼  generator_from_json (per column)
//! ┌──────────────────────────────┐
//! │  ColumnGenerator             │
//! │                              │
//! │  - kind (GeneratorKind)      │
//! │  - nulls (PercentNullManager)│
//! └──────────────┬───────────────┘
//!                │
//!                ▼
//!          RowDriver ──► RowSink (CSV / Parquet)
//! ```
//!
//! # Example
//!
//! ```rust
//! use datagen_core::{GenerationDocument, Value};
//! use datagen_generator::RowDriver;
//! use std::path::Path;
//!
//! let document = GenerationDocument::from_json(r#"{
//!     "output_filename": "letters.csv",
//!     "columns": {
//!         "id":     { "generation_type": "id", "type": "INT64", "start_id": "1", "seed": "0" },
//!         "letter": { "generation_type": "list", "values": ["a", "b"], "seed": "0" }
//!     }
//! }"#).unwrap();
//!
//! let rows: Vec<_> = RowDriver::from_document(&document, Path::new(".")).unwrap().collect();
//! assert_eq!(rows, vec![
//!     vec![Value::Int64(1), Value::from("a")],
//!     vec![Value::Int64(2), Value::from("b")],
//! ]);
//! ```
//!
//! # Generators
//!
//! - `full_range` - every integer of `[range_start, range_stop]`, increasing, decreasing or shuffled
//! - `id` - infinite counter from `start_id`
//! - `random` - uniform, normal, exponential, poisson_wait, random_walk, random_pick
//! - `selection` - infinite draws from a file, uniform or clipped normal
//! - `list` / `file` - explicit values, cycled or sampled, `count` times

pub mod driver;
pub mod factory;
pub mod generator;
pub mod generators;

// Re-exports for convenience
pub use driver::{DriveError, RowDriver};
pub use factory::{generator_from_definition, generator_from_json, GenerationType};
pub use generator::{ColumnGenerator, GeneratorError, GeneratorKind};
pub use generators::PercentNullManager;
