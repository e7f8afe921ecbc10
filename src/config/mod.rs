// src/config/mod.rs

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runtime configuration, loaded with precedence:
/// config file -> environment variables -> defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QsConfig {
    /// Directory for the shard input file and the result file.
    pub work_dir: String,

    /// Logging level (error, warn, info, debug, trace).
    pub log_level: String,

    /// Number of threads for the sieve phase. None uses one per core.
    pub threads: Option<usize>,

    /// Entries per sieve shard. Small values exercise the shard handling;
    /// production runs want this in the hundreds of thousands.
    pub shard_size: usize,

    /// Attempt budget for the combine phase's kernel walk.
    pub max_square_attempts: u64,

    /// Remove the work files after a successful factorization.
    pub cleanup: bool,
}

impl Default for QsConfig {
    fn default() -> Self {
        QsConfig {
            work_dir: ".".to_string(),
            log_level: "info".to_string(),
            threads: None,
            shard_size: 10,
            max_square_attempts: 1_000_000,
            cleanup: false,
        }
    }
}

impl QsConfig {
    /// Load configuration from `quadsieve.toml` (if present) and `QS_`-prefixed
    /// environment variables, on top of the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("work_dir", ".")?
            .set_default("log_level", "info")?
            .set_default("shard_size", 10)?
            .set_default("max_square_attempts", 1_000_000)?
            .set_default("cleanup", false)?;

        if Path::new("quadsieve.toml").exists() {
            builder = builder.add_source(File::with_name("quadsieve.toml"));
        }

        builder = builder.add_source(Environment::with_prefix("QS").try_parsing(true));

        let config = builder.build()?;
        config.try_deserialize()
    }
}
