//! Configuration for the planner and the driver suite.
//!
//! Load from TOML to tune the `change` repeat count and the driver sizes
//! without code changes. Every section and field is optional.
//!
//! # Examples
//!
//! ```
//! use deltablue::config::Config;
//! use deltablue::Strength;
//!
//! let config = Config::from_toml_str(r#"
//!     [planner]
//!     change_repetitions = 3
//!
//!     [drivers]
//!     inner_iterations = [1, 15]
//!     chain_stay_strength = "default"
//! "#).unwrap();
//!
//! assert_eq!(config.planner.change_repetitions, 3);
//! assert_eq!(config.drivers.inner_iterations, vec![1, 15]);
//! assert_eq!(config.drivers.chain_edit_strength, Strength::Preferred);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::strength::Strength;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub planner: PlannerConfig,
    pub drivers: DriverConfig,
}

/// Planner behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Times `change` assigns the new value and executes its plan.
    pub change_repetitions: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            change_repetitions: 10,
        }
    }
}

/// Sizes and strengths used by the chain and projection drivers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Problem sizes `n` each driver runs with.
    pub inner_iterations: Vec<usize>,
    /// Number of values pushed through the chain (`0..chain_edits`).
    pub chain_edits: usize,
    pub chain_edit_strength: Strength,
    pub chain_stay_strength: Strength,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            inner_iterations: vec![1, 15, 150, 1500, 15000],
            chain_edits: 100,
            chain_edit_strength: Strength::Preferred,
            chain_stay_strength: Strength::StrongDefault,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be read, contains invalid TOML, or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.planner.validate()?;
        self.drivers.validate()
    }

    pub fn with_change_repetitions(mut self, repetitions: usize) -> Self {
        self.planner.change_repetitions = repetitions;
        self
    }

    pub fn with_inner_iterations(mut self, sizes: impl Into<Vec<usize>>) -> Self {
        self.drivers.inner_iterations = sizes.into();
        self
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.change_repetitions == 0 {
            return Err(ConfigError::Invalid(
                "planner.change_repetitions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl DriverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inner_iterations.is_empty() {
            return Err(ConfigError::Invalid(
                "drivers.inner_iterations must not be empty".to_string(),
            ));
        }
        if self.chain_edits == 0 {
            return Err(ConfigError::Invalid(
                "drivers.chain_edits must be at least 1".to_string(),
            ));
        }
        // A weaker edit can never override the stay at the end of the chain.
        if !self
            .chain_edit_strength
            .stronger_than(self.chain_stay_strength)
        {
            return Err(ConfigError::Invalid(format!(
                "drivers.chain_edit_strength ({}) must be stronger than drivers.chain_stay_strength ({})",
                self.chain_edit_strength, self.chain_stay_strength
            )));
        }
        Ok(())
    }
}
