use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::render::ReportFormat;

/// Upper bound on the default worker pool size
pub const MAX_DEFAULT_WORKERS: usize = 8;

/// Configuration for a bullet search.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations in order of precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.bulletscout.yaml` in the current directory
/// 3. Global `$HOME/.config/bulletscout/config.yaml`
///
/// # Configuration Format
///
/// ```yaml
/// # Keyword to look for inside bullet points (case-insensitive)
/// keyword: "latency"
///
/// # Folder scanned recursively for documents
/// root_path: "~/reports"
///
/// # Document extensions to include
/// file_extensions: ["pdf"]
///
/// # Patterns to ignore (glob syntax)
/// ignore_patterns: ["archive/**"]
///
/// # Worker count (default: min(8, CPU cores))
/// thread_count: 4
///
/// # Report destination and format (html, text, json)
/// output_path: "bullet_report.html"
/// format: "html"
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// When using the CLI, command-line arguments take precedence over config file
/// values. The merging behavior is defined in [`SearchConfig::merge_with_cli`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Keyword searched for inside bullet paragraphs
    #[serde(default)]
    pub keyword: String,

    /// Root directory to start search from
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Document extensions to include (e.g., ["pdf", "txt"])
    #[serde(default = "default_extensions")]
    pub file_extensions: Vec<String>,

    /// Patterns to ignore (supports glob syntax)
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Number of worker threads; `None` picks min(8, CPU cores)
    #[serde(default)]
    pub thread_count: Option<NonZeroUsize>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Where the rendered report is written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Report format
    #[serde(default)]
    pub format: ReportFormat,

    /// Show a progress bar while files are scanned
    #[serde(default)]
    pub show_progress: bool,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<String> {
    vec!["pdf".to_string()]
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("bullet_report.html")
}

/// min(8, available parallelism), never zero
pub fn default_worker_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get().clamp(1, MAX_DEFAULT_WORKERS)).unwrap_or(NonZeroUsize::MIN)
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            root_path: default_root_path(),
            file_extensions: default_extensions(),
            ignore_patterns: Vec::new(),
            thread_count: None,
            log_level: default_log_level(),
            output_path: default_output_path(),
            format: ReportFormat::default(),
            show_progress: false,
        }
    }
}

impl SearchConfig {
    /// Creates a config for `keyword` under `root_path` with default settings
    pub fn new(root_path: impl Into<PathBuf>, keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            root_path: root_path.into(),
            ..Default::default()
        }
    }

    /// Effective size of the worker pool for one search
    pub fn worker_count(&self) -> NonZeroUsize {
        self.thread_count.unwrap_or_else(default_worker_count)
    }

    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration, layering an optional explicit file on top
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let defaults = [
            dirs::config_dir().map(|p| p.join("bulletscout/config.yaml")),
            Some(PathBuf::from(".bulletscout.yaml")),
        ];

        for path in defaults.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicit file must exist
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: SearchConfig) -> Self {
        if !cli_config.keyword.is_empty() {
            self.keyword = cli_config.keyword;
        }
        if cli_config.root_path != default_root_path() {
            self.root_path = cli_config.root_path;
        }
        if cli_config.file_extensions != default_extensions() {
            self.file_extensions = cli_config.file_extensions;
        }
        if !cli_config.ignore_patterns.is_empty() {
            self.ignore_patterns = cli_config.ignore_patterns;
        }
        if cli_config.thread_count.is_some() {
            self.thread_count = cli_config.thread_count;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        if cli_config.output_path != default_output_path() {
            self.output_path = cli_config.output_path;
        }
        if cli_config.format != ReportFormat::default() {
            self.format = cli_config.format;
        }
        if cli_config.show_progress {
            self.show_progress = true;
        }
        self
    }
}
