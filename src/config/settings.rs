//! TOML-based configuration for schemasight.
//!
//! Every key is optional; missing keys take the engine defaults.
//!
//! Example configuration:
//! ```toml
//! [inference]
//! enabled = true
//! min_confidence = 0.5
//! exact_table_score = 0.70
//! plural_table_score = 0.60
//! pk_name_score = 0.55
//! pk_name_bonus = 0.20
//! unverified_type_penalty = 0.10
//!
//! [junction]
//! max_payload_columns = 2
//!
//! [render]
//! table_order = "supplied"  # or "alphabetical"
//! include_diagnostics = true
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::analysis::AnalysisOptions;
use crate::render::{RenderOptions, TableOrder};
use crate::semantic::inference::{thresholds, InferenceConfig, InferenceWeights};
use crate::semantic::JunctionConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SCHEMASIGHT_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub inference: InferenceSettings,
    pub junction: JunctionSettings,
    pub render: RenderSettings,
}

/// Implicit-FK detection settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InferenceSettings {
    /// Enable relationship inference.
    pub enabled: bool,

    /// Minimum confidence threshold (0.0 to 1.0).
    pub min_confidence: f64,

    pub exact_table_score: f64,
    pub plural_table_score: f64,
    pub pk_name_score: f64,
    pub pk_name_bonus: f64,
    pub unverified_type_penalty: f64,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_confidence: thresholds::confidence::MIN_CONFIDENCE,
            exact_table_score: thresholds::score::EXACT_TABLE,
            plural_table_score: thresholds::score::INFLECTED_TABLE,
            pk_name_score: thresholds::score::PRIMARY_KEY_NAME,
            pk_name_bonus: thresholds::adjustment::PRIMARY_KEY_NAME_BONUS,
            unverified_type_penalty: thresholds::adjustment::UNVERIFIED_TYPE_PENALTY,
        }
    }
}

/// Junction classifier settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct JunctionSettings {
    pub max_payload_columns: usize,
}

impl Default for JunctionSettings {
    fn default() -> Self {
        Self {
            max_payload_columns: JunctionConfig::default().max_payload_columns,
        }
    }
}

/// Renderer settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    pub table_order: TableOrder,
    pub include_diagnostics: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            table_order: TableOrder::Supplied,
            include_diagnostics: true,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SCHEMASIGHT_CONFIG`
    /// 2. `./schemasight.toml`
    /// 3. `<config dir>/schemasight/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("schemasight.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("schemasight").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Reject scores and thresholds outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let i = &self.inference;
        let checks = [
            ("inference.min_confidence", i.min_confidence),
            ("inference.exact_table_score", i.exact_table_score),
            ("inference.plural_table_score", i.plural_table_score),
            ("inference.pk_name_score", i.pk_name_score),
            ("inference.pk_name_bonus", i.pk_name_bonus),
            ("inference.unverified_type_penalty", i.unverified_type_penalty),
        ];
        for (key, value) in checks {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::InvalidConfig(format!(
                    "{} must be between 0 and 1, got {}",
                    key, value
                )));
            }
        }
        Ok(())
    }

    /// Engine options for these settings.
    pub fn analysis_options(&self) -> AnalysisOptions {
        let i = &self.inference;
        let weights = InferenceWeights {
            exact_table: i.exact_table_score,
            inflected_table: i.plural_table_score,
            primary_key_name: i.pk_name_score,
            primary_key_name_bonus: i.pk_name_bonus,
            unverified_type_penalty: i.unverified_type_penalty,
            ..Default::default()
        };
        let mut inference = InferenceConfig::default()
            .with_min_confidence(i.min_confidence)
            .with_weights(weights);
        inference.enabled = i.enabled;

        AnalysisOptions {
            inference,
            junction: JunctionConfig {
                max_payload_columns: self.junction.max_payload_columns,
            },
            render: RenderOptions {
                table_order: self.render.table_order,
                include_diagnostics: self.render.include_diagnostics,
            },
        }
    }
}
