//! Configuration types for graphite-news.
//!
//! [`Config::load`] layers an optional TOML file on top of the built-in
//! defaults; [`Config::defaults`] returns the defaults without touching the
//! filesystem (useful in tests). Command-line flags are folded in afterwards
//! with [`Config::apply`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::registry::MAX_STATE_LIMIT;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[ingest]
log_files        = ["./creates.log"]
max_state        = 100
poll_interval_ms = 250

[server]
listen                = "0.0.0.0:2934"
json_pull_interval_ms = 1500
graphite_url          = ""
allow_delete          = false
assets_dir            = "./assets"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// `[ingest]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Glob patterns of carbon `creates.log` files to tail.
    #[serde(default = "default_log_files")]
    pub log_files: Vec<String>,
    /// Maximum number of resident datasources.
    #[serde(default = "default_max_state")]
    pub max_state: usize,
    /// Fallback wake-up interval for tail sources when no filesystem event
    /// arrives.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_log_files() -> Vec<String> { vec!["./creates.log".to_string()] }
fn default_max_state() -> usize { crate::registry::DEFAULT_MAX_STATE }
fn default_poll_interval_ms() -> u64 { 250 }

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            log_files: default_log_files(),
            max_state: default_max_state(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    /// UI auto-refresh hint, handed to the browser as-is.
    #[serde(default = "default_json_pull_interval_ms")]
    pub json_pull_interval_ms: u64,
    /// Base URL of the graphite web app the UI renders graphs from.
    #[serde(default)]
    pub graphite_url: String,
    #[serde(default)]
    pub allow_delete: bool,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
}

fn default_listen() -> String { "0.0.0.0:2934".to_string() }
fn default_json_pull_interval_ms() -> u64 { 1500 }
fn default_assets_dir() -> PathBuf { PathBuf::from("./assets") }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            json_pull_interval_ms: default_json_pull_interval_ms(),
            graphite_url: String::new(),
            allow_delete: false,
            assets_dir: default_assets_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Values given on the command line. `None` / empty leaves the loaded value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub log_files: Vec<String>,
    pub max_state: Option<usize>,
    pub listen: Option<String>,
    pub json_pull_interval_ms: Option<u64>,
    pub graphite_url: Option<String>,
    pub allow_delete: bool,
}

impl Config {
    /// Load `path` (or the per-user default location when `None`) on top of
    /// the built-in defaults. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);

        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Fold command-line values over the loaded configuration.
    pub fn apply(&mut self, o: Overrides) -> anyhow::Result<()> {
        if !o.log_files.is_empty() {
            self.ingest.log_files = o.log_files;
        }
        if let Some(n) = o.max_state {
            self.ingest.max_state = n;
        }
        if let Some(listen) = o.listen {
            self.server.listen = listen;
        }
        if let Some(ms) = o.json_pull_interval_ms {
            self.server.json_pull_interval_ms = ms;
        }
        if let Some(url) = o.graphite_url {
            self.server.graphite_url = url;
        }
        self.server.allow_delete |= o.allow_delete;
        self.validate()
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.ingest.max_state > 0, "ingest.max_state must be at least 1");
        anyhow::ensure!(
            self.ingest.max_state <= MAX_STATE_LIMIT,
            "ingest.max_state must be at most {MAX_STATE_LIMIT}, got {}",
            self.ingest.max_state
        );
        anyhow::ensure!(
            !self.ingest.log_files.is_empty(),
            "ingest.log_files must name at least one log file pattern"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("graphite-news")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
