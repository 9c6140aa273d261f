//! YAML Configuration File Support for doctail
//!
//! Loads a tailer's settings (normalizer capability and tail-tracking
//! descriptor) from a single YAML file.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # doctail tailer configuration
//! version: "1.0"
//! name: "orders-tailer"
//!
//! normalizer:
//!   object_mapper: true
//!
//! tail_tracking:
//!   increasing_field: "seq"
//!   persistent: true
//!   db: "local"
//!   collection: null        # tailTrackingDefault
//!   field: null             # lastTrackingValue
//!   persistent_id: "orders-1"
//! ```

use std::fs;
use std::path::Path;

use normalize::{MapperCapability, Normalizer};
use serde::{Deserialize, Serialize};
use tailtrack::{TailTrackingConfig, TailTrackingSettings};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Top-level YAML configuration for one tailer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DoctailConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub normalizer: NormalizerYamlConfig,

    /// Tail-tracking descriptor settings; `increasing_field` is mandatory
    #[serde(default)]
    pub tail_tracking: TailTrackingYamlConfig,
}

impl DoctailConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: DoctailConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.tail_tracking.validate()
    }

    /// Normalizer honoring `normalizer.object_mapper`.
    pub fn normalizer(&self) -> Normalizer {
        if self.normalizer.object_mapper {
            Normalizer::new()
        } else {
            Normalizer::with_capability(MapperCapability::Unavailable)
        }
    }

    /// Builds the immutable tail-tracking descriptor.
    pub fn tail_tracking_config(&self) -> Result<TailTrackingConfig, ConfigLoadError> {
        self.tail_tracking.to_settings().map(TailTrackingSettings::into_config)
    }
}

impl Default for DoctailConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            normalizer: NormalizerYamlConfig::default(),
            tail_tracking: TailTrackingYamlConfig::default(),
        }
    }
}

/// Normalizer YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerYamlConfig {
    /// Use the process object mapper. `false` drops object inputs as
    /// `capability_unavailable` even when a mapper is compiled in.
    #[serde(default = "true_value")]
    pub object_mapper: bool,
}

impl Default for NormalizerYamlConfig {
    fn default() -> Self {
        Self {
            object_mapper: true,
        }
    }
}

/// Tail-tracking YAML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TailTrackingYamlConfig {
    #[serde(default)]
    pub increasing_field: Option<String>,

    #[serde(default)]
    pub persistent: bool,

    #[serde(default)]
    pub db: Option<String>,

    /// Left as `None` here; the descriptor applies its own default
    #[serde(default)]
    pub collection: Option<String>,

    #[serde(default)]
    pub field: Option<String>,

    #[serde(default)]
    pub persistent_id: Option<String>,
}

impl TailTrackingYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.increasing_field.as_deref() {
            None => Err(ConfigLoadError::MissingField(
                "tail_tracking.increasing_field".to_string(),
            )),
            Some(field) if field.trim().is_empty() => Err(ConfigLoadError::Validation(
                "tail_tracking.increasing_field must not be blank".to_string(),
            )),
            Some(_) => Ok(()),
        }
    }

    fn to_settings(&self) -> Result<TailTrackingSettings, ConfigLoadError> {
        self.validate()?;
        Ok(TailTrackingSettings {
            increasing_field: self.increasing_field.clone().unwrap_or_default(),
            persistent: self.persistent,
            db: self.db.clone(),
            collection: self.collection.clone(),
            field: self.field.clone(),
            persistent_id: self.persistent_id.clone(),
        })
    }
}

fn true_value() -> bool {
    true
}
