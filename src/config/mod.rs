//! Configuration module for schemasight.
//!
//! Handles the TOML settings file and its mapping onto engine options.

mod settings;

pub use settings::{
    InferenceSettings, JunctionSettings, RenderSettings, Settings, SettingsError, CONFIG_ENV_VAR,
};
