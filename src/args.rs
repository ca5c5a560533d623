//! Command-line arguments shared by the `generate` subcommand.

use crate::config::{RunConfig, DEFAULT_BATCH_SIZE};
use clap::Args;
use std::path::PathBuf;

/// Arguments controlling where and how output files are written.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Directory prefixed to relative output file names
    #[arg(long, env = "DATAGEN_OUTPUT_PREFIX")]
    pub output_prefix: Option<PathBuf>,

    /// Keep existing output files instead of deleting and regenerating them
    #[arg(long, env = "DATAGEN_NO_OVERWRITE")]
    pub no_overwrite: bool,

    /// With --no-overwrite, fail on an existing output file instead of skipping it
    #[arg(long)]
    pub force: bool,

    /// Rows per Parquet record batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
}

impl From<&GenerateArgs> for RunConfig {
    fn from(args: &GenerateArgs) -> Self {
        Self {
            output_prefix: args.output_prefix.clone(),
            overwrite: !args.no_overwrite,
            force_regeneration: args.force,
            batch_size: args.batch_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: GenerateArgs,
    }

    #[test]
    fn test_defaults_match_run_config() {
        let wrapper = Wrapper::try_parse_from(["datagen"]).unwrap();
        let config = RunConfig::from(&wrapper.args);
        assert!(config.overwrite);
        assert!(!config.force_regeneration);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_flags() {
        let wrapper = Wrapper::try_parse_from([
            "datagen",
            "--output-prefix",
            "/data",
            "--no-overwrite",
            "--force",
            "--batch-size",
            "100",
        ])
        .unwrap();
        let config = RunConfig::from(&wrapper.args);
        assert_eq!(config.output_prefix, Some(PathBuf::from("/data")));
        assert!(!config.overwrite);
        assert!(config.force_regeneration);
        assert_eq!(config.batch_size, 100);
    }
}
