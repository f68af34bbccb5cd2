//! User-authored joint configuration
//!
//! Drivers, sensors and weights are authored outside the CAD model and keyed by
//! joint name. The table is loaded once per export and only read afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::driver::Driver;
use crate::sensor::JointSensor;

/// Configuration for a single joint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JointConfig {
    pub driver: Option<Driver>,
    pub sensors: Vec<JointSensor>,
    /// Weight carried by the joint in kg
    pub weight: Option<f32>,
}

/// Configuration table keyed by joint name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigData {
    #[serde(default)]
    pub joints: BTreeMap<String, JointConfig>,
}

/// Configuration and settings file errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Unsupported file format: {0} (expected .ron or .json)")]
    UnsupportedFormat(String),
}

impl ConfigData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the entry for a joint
    pub fn insert(&mut self, joint_name: impl Into<String>, config: JointConfig) {
        self.joints.insert(joint_name.into(), config);
    }

    pub fn get(&self, joint_name: &str) -> Option<&JointConfig> {
        self.joints.get(joint_name)
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    /// Load a configuration file, choosing the format from its extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config: Self = load_file(path)?;
        tracing::info!(
            "Loaded configuration for {} joint(s) from {:?}",
            config.len(),
            path
        );
        Ok(config)
    }
}

/// Read a `.ron` or `.json` file into `T`
pub(crate) fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
    match extension.as_str() {
        "ron" => ron::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string())),
        "json" => {
            serde_json::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))
        }
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}
