//! Configuration management.
//!
//! Settings are layered, later layers winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config`, `./bookid.toml` or `<config dir>/bookid/config.toml`)
//! 3. `BOOKID_*` environment variables (`BOOKID_TIMEOUT_SECS`,
//!    `BOOKID_GOOGLE_BOOKS__API_KEY`, ...)
//! 4. the short-hand variables `GOOGLE_BOOKS_API_KEY` (used when no key is
//!    configured) and `BOOKID_TIMEOUT` (`"30s"`, `"500ms"`, `"2m"`)
//!
//! # Configuration File Format
//!
//! ```toml
//! timeout_secs = 30
//!
//! [google_books]
//! api_key = "your-api-key"
//! base_url = "https://www.googleapis.com/books/v1"
//! max_results = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::parse_duration;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Google Books API settings
    #[serde(default)]
    pub google_books: GoogleBooksConfig,

    /// Deadline for one search, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_books: GoogleBooksConfig::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Search deadline. Falls back to the default for unusable values.
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or_else(|| Duration::from_secs_f64(default_timeout_secs()))
    }

    /// Apply the short-hand environment variables
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.google_books.api_key.is_none() {
            self.google_books.api_key = lookup("GOOGLE_BOOKS_API_KEY").filter(|k| !k.is_empty());
        }

        if let Some(raw) = lookup("BOOKID_TIMEOUT") {
            match parse_duration(&raw) {
                Some(timeout) => self.timeout_secs = timeout.as_secs_f64(),
                None => tracing::warn!("Ignoring unparseable BOOKID_TIMEOUT value: {}", raw),
            }
        }
    }
}

/// Google Books API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleBooksConfig {
    /// API key (optional, unauthenticated requests get a small quota)
    #[serde(default)]
    pub api_key: Option<String>,

    /// API root, without the `/volumes` path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Maximum number of candidates per search
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            max_results: default_max_results(),
        }
    }
}

fn default_timeout_secs() -> f64 {
    30.0
}

fn default_base_url() -> String {
    "https://www.googleapis.com/books/v1".to_string()
}

fn default_max_results() -> u32 {
    10
}

/// Load configuration from an optional file plus `BOOKID_*` environment variables
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("BOOKID")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let mut config: Config = settings.try_deserialize()?;
    config.apply_env_overrides();
    Ok(config)
}

/// Parse configuration from a TOML string, without environment overrides
pub fn load_config_from_str(toml_str: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Find the first existing configuration file in the default locations
pub fn find_config_file() -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from("bookid.toml")];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("bookid").join("config.toml"));
    }
    candidates.into_iter().find(|p| p.is_file())
}
