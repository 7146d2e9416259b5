#![forbid(unsafe_code)]

//! Grid configuration.
//!
//! [`GridConfig`] describes the startup collection. It can be built in code,
//! loaded from TOML or JSON (with the `config` feature), and overridden from
//! the environment.
//!
//! # Loading
//!
//! ```toml
//! # cardgrid.toml
//! card_count = 24
//! first_id = 100
//! url_template = "https://images.example.com/thumb/{index}.jpg"
//! ```
//!
//! ```rust,ignore
//! let config = GridConfig::from_toml_file("cardgrid.toml")?.apply_env()?;
//! let collection = Collection::from_config(&config)?;
//! ```
//!
//! # Defaults
//!
//! `GridConfig::default()` yields 50 cards with ids `1..=50` and random
//! 80x45 thumbnails.

#[cfg(feature = "config")]
use std::path::Path;

use std::fmt;

/// Environment variable overriding [`GridConfig::card_count`].
pub const ENV_CARD_COUNT: &str = "CARDGRID_CARD_COUNT";
/// Environment variable overriding [`GridConfig::first_id`].
pub const ENV_FIRST_ID: &str = "CARDGRID_FIRST_ID";
/// Environment variable overriding [`GridConfig::url_template`].
pub const ENV_URL_TEMPLATE: &str = "CARDGRID_URL_TEMPLATE";

/// Placeholder replaced by the zero-based creation index in `url_template`.
pub const INDEX_PLACEHOLDER: &str = "{index}";

/// Startup collection configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Number of cards created at startup (default: 50).
    pub card_count: u32,
    /// Id of the first card; ids are consecutive from here (default: 1).
    pub first_id: u64,
    /// Image url pattern; `{index}` becomes the zero-based creation index.
    pub url_template: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            card_count: 50,
            first_id: 1,
            url_template: "https://picsum.photos/80/45?random&{index}".to_string(),
        }
    }
}

impl GridConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup` (a stand-in for the process
    /// environment).
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_CARD_COUNT) {
            self.card_count = parse_env(ENV_CARD_COUNT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_FIRST_ID) {
            self.first_id = parse_env(ENV_FIRST_ID, &raw)?;
        }
        if let Some(raw) = lookup(ENV_URL_TEMPLATE) {
            self.url_template = raw;
        }
        self.validated()
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        // The last card gets `first_id + card_count - 1`.
        let last_id_fits = self.card_count == 0
            || self
                .first_id
                .checked_add(u64::from(self.card_count) - 1)
                .is_some();
        if !last_id_fits {
            errors.push(format!(
                "last card id overflows u64: first_id {} with card_count {}",
                self.first_id, self.card_count
            ));
        }

        if self.url_template.trim().is_empty() {
            errors.push("url_template must not be empty".into());
        }

        errors
    }

    /// Url for the card created at `index`.
    #[must_use]
    pub fn card_url(&self, index: u32) -> String {
        self.url_template
            .replace(INDEX_PLACEHOLDER, &index.to_string())
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Env {
        key,
        value: raw.to_string(),
    })
}

/// Errors from loading a [`GridConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// An environment override could not be parsed.
    Env { key: &'static str, value: String },
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Env { key, value } => write!(f, "invalid value for {key}: {value:?}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Env { .. } | Self::Validation(_) => None,
        }
    }
}
