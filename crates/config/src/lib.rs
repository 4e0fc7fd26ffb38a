#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for pga
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/pga/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;
pub mod resources_semaphore;

use serde::{Deserialize, Serialize};
use pga_errors::{ConfigError, Error};
use pga_types::ColorChoice;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub network: NetworkConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
    /// Maximum number of verification probes in flight
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Local mirror root (defaults to the working directory)
    pub output: Option<PathBuf>,
    /// Where the downloaded catalog is cached
    pub cache: Option<PathBuf>,
}

/// Remote archive configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_url")]
    pub url: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_generation")]
    pub generation: String,
    /// Catalog location override: local path or URL
    pub index: Option<String>,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64, // seconds
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            color: ColorChoice::Auto,
            jobs: constants::DEFAULT_JOBS,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            category: default_category(),
            generation: default_generation(),
            index: None,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: 300,
            connect_timeout: 30,
            retries: 3,
            retry_delay: 1,
        }
    }
}

// Default value functions for serde
fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_jobs() -> usize {
    constants::DEFAULT_JOBS
}

fn default_source_url() -> String {
    constants::DEFAULT_SOURCE_URL.to_string()
}

fn default_category() -> String {
    constants::DEFAULT_CATEGORY.to_string()
}

fn default_generation() -> String {
    constants::DEFAULT_GENERATION.to_string()
}

fn default_timeout() -> u64 {
    300 // 5 minutes
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    1
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir
            .join(constants::APP_DIR)
            .join(constants::CONFIG_FILE))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if fs::try_exists(&config_path).await.unwrap_or(false) {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // PGA_COLOR
        if let Ok(color) = std::env::var("PGA_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "PGA_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // PGA_JOBS
        if let Ok(jobs) = std::env::var("PGA_JOBS") {
            self.general.jobs = jobs.parse().map_err(|_| ConfigError::InvalidValue {
                field: "PGA_JOBS".to_string(),
                value: jobs,
            })?;
        }

        if let Ok(output) = std::env::var("PGA_OUTPUT_DIR") {
            self.paths.output = Some(PathBuf::from(output));
        }

        if let Ok(url) = std::env::var("PGA_SOURCE_URL") {
            self.source.url = url;
        }

        if let Ok(index) = std::env::var("PGA_INDEX") {
            self.source.index = Some(index);
        }

        Ok(())
    }

    /// Check invariants that serde cannot express
    ///
    /// # Errors
    ///
    /// Returns an error if the concurrency budget is zero or the source URL
    /// is not an HTTP(S) URL.
    pub fn validate(&self) -> Result<(), Error> {
        if self.general.jobs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "jobs".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        if !(self.source.url.starts_with("http://") || self.source.url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "source.url".to_string(),
                value: self.source.url.clone(),
            }
            .into());
        }
        if self.source.category.is_empty() || self.source.generation.is_empty() {
            return Err(ConfigError::Invalid {
                message: "source.category and source.generation must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Concurrency budget as a non-zero count
    ///
    /// # Errors
    ///
    /// Returns an error if `general.jobs` is zero.
    pub fn jobs(&self) -> Result<NonZeroUsize, Error> {
        NonZeroUsize::new(self.general.jobs).ok_or_else(|| {
            ConfigError::InvalidValue {
                field: "jobs".to_string(),
                value: "0".to_string(),
            }
            .into()
        })
    }

    /// Get the local mirror root (with default)
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.paths
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the catalog cache directory (with default)
    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        self.paths.cache.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(constants::APP_DIR)
        })
    }

    /// Get the directory debug logs are written to
    #[must_use]
    pub fn logs_path(&self) -> PathBuf {
        self.cache_path().join(constants::LOGS_SUBDIR)
    }

    /// Catalog location: the explicit override, or the default CSV under the
    /// source URL
    #[must_use]
    pub fn index_location(&self) -> String {
        self.source.index.clone().unwrap_or_else(|| {
            format!(
                "{}/{}",
                self.source.url.trim_end_matches('/'),
                constants::INDEX_PATH
            )
        })
    }
}
