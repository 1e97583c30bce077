use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Configuration consumed by drivers of the search engines.
///
/// The configuration can be loaded from multiple locations in order of
/// precedence:
/// 1. Custom config file passed to `load_from`
/// 2. Local `.parmatch.yaml` in the current directory
/// 3. Global `$HOME/.config/parmatch/config.yaml`
///
/// The configuration uses YAML format. Example:
/// ```yaml
/// # Patterns to search for (bytes, matched exactly)
/// patterns:
///   - "TODO"
///   - "FIXME"
///
/// # Worker count for parallel scans (default: CPU cores)
/// thread_count: 4
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// When a driver accepts command-line arguments, they take precedence over
/// config file values; the merging behavior is defined in `merge_with_cli`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Patterns to search for
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Number of workers to use for parallel scans
    /// Defaults to number of CPU cores if not specified
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            thread_count: default_thread_count(),
            log_level: default_log_level(),
        }
    }
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Normalizes a requested worker count.
///
/// `0` means "auto": use the platform-reported available parallelism. Any
/// positive value is taken as-is. This is the single normalization point for
/// every `search_parallel` call.
pub fn resolve_worker_count(requested: usize) -> NonZeroUsize {
    NonZeroUsize::new(requested).unwrap_or_else(default_thread_count)
}

impl SearchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Default config locations
        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("parmatch/config.yaml")),
            // Local config
            Some(PathBuf::from(".parmatch.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        // Add existing config files
        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // Build and deserialize
        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: SearchConfig) -> Self {
        // CLI values take precedence over config file values
        if !cli_config.patterns.is_empty() {
            self.patterns = cli_config.patterns;
        }
        // Always use CLI thread count if specified
        self.thread_count = cli_config.thread_count;
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }
}
