use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub explorer: ExplorerConfig,
}

/// Backend endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the backend serving both the static data files and the
    /// dynamic `api/` endpoints.
    pub base_url: String,
    /// Directory under the base URL holding the static JSON files
    /// (node_types.json, disease_options.json, ...).
    #[serde(default = "default_data_path")]
    pub data_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Display/shaping defaults for the explorer
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerConfig {
    /// Attention-score threshold below which tree children are pruned.
    #[serde(default = "default_edge_threshold")]
    pub edge_threshold: f64,
    /// Upper bound on children kept per node when pruning.
    #[serde(default = "default_max_tree_children")]
    pub max_tree_children: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            edge_threshold: default_edge_threshold(),
            max_tree_children: default_max_tree_children(),
        }
    }
}

fn default_data_path() -> String {
    "data".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_edge_threshold() -> f64 {
    0.5
}

fn default_max_tree_children() -> usize {
    7
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading
    /// config. Looks for the config file in this order:
    /// 1. Path specified in the DRUGPATH_CONFIG environment variable
    /// 2. ./config.toml in the current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("DRUGPATH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.server.base_url).with_context(|| {
            format!(
                "server.base_url is not a valid absolute URL: {}",
                self.server.base_url
            )
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!(
                "server.base_url must be an http(s) URL, got scheme: {}",
                url.scheme()
            );
        }

        if self.server.timeout_secs == 0 {
            anyhow::bail!("server.timeout_secs must be greater than 0");
        }

        if self.explorer.max_tree_children == 0 {
            anyhow::bail!("explorer.max_tree_children must be greater than 0");
        }

        if !self.explorer.edge_threshold.is_finite() || self.explorer.edge_threshold < 0.0 {
            anyhow::bail!(
                "explorer.edge_threshold must be finite and non-negative, got {}",
                self.explorer.edge_threshold
            );
        }

        Ok(())
    }

    /// Get the backend base URL
    pub fn base_url(&self) -> &str {
        &self.server.base_url
    }

    /// Get the static data directory under the base URL
    pub fn data_path(&self) -> &str {
        &self.server.data_path
    }
}
