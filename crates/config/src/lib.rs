//! Configuration for the front-desk call agent
//!
//! Supports loading configuration from:
//! - YAML files (config/default.yaml, config/{env}.yaml)
//! - Environment variables (FRONTDESK prefix)
//!
//! Domain configuration (the slot schema, canned prompt text, and the
//! assisted-composer system instruction) lives in the `domain` module.
//! The schema's field order is the single source of truth for the
//! default question sequence and the completion test.

pub mod domain;
pub mod settings;

pub use domain::{DomainPrompts, FieldSpec, SlotKey, SlotSchema};
pub use settings::{
    load_settings, ComposerStrategy, LlmSettings, NotifySettings, ObservabilityConfig,
    RuntimeEnvironment, ServerConfig, SessionSettings, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
