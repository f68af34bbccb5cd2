//! Resolves which configuration entry applies to a joint

use crate::config::{ConfigData, JointConfig};
use crate::driver::Driver;
use crate::sensor::JointSensor;

/// Attachments resolved for one joint
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attachment {
    pub driver: Option<Driver>,
    pub sensors: Vec<JointSensor>,
    pub weight: Option<f32>,
}

impl Attachment {
    /// No driver, no sensors: the joint stays as modeled
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.driver.is_none() && self.sensors.is_empty() && self.weight.is_none()
    }
}

impl From<&JointConfig> for Attachment {
    fn from(config: &JointConfig) -> Self {
        Self {
            driver: config.driver.clone(),
            sensors: config.sensors.clone(),
            weight: config.weight,
        }
    }
}

/// Look up the attachment for `joint_name`.
///
/// Keys must match exactly. A missing entry is not an error; it yields an empty
/// attachment. The table is never modified.
pub fn match_joint(config: &ConfigData, joint_name: &str) -> Attachment {
    match config.get(joint_name) {
        Some(entry) => {
            tracing::debug!("Configuration matched joint '{}'", joint_name);
            Attachment::from(entry)
        }
        None => {
            tracing::debug!("No configuration for joint '{}'", joint_name);
            Attachment::none()
        }
    }
}

/// Configuration keys that no joint in `joint_names` refers to
pub fn unmatched_keys<'a, I>(config: &'a ConfigData, joint_names: I) -> Vec<&'a str>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let names: std::collections::HashSet<String> = joint_names
        .into_iter()
        .map(|n| n.as_ref().to_string())
        .collect();

    config
        .joints
        .keys()
        .filter(|key| !names.contains(key.as_str()))
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DriverType;

    fn config() -> ConfigData {
        let mut config = ConfigData::new();
        config.insert(
            "shoulder",
            JointConfig {
                driver: Some(Driver::new(DriverType::Motor)),
                sensors: vec![JointSensor::encoder(0, 1)],
                weight: None,
            },
        );
        config.insert("wrist", JointConfig::default());
        config
    }

    #[test]
    fn test_exact_match() {
        let attachment = match_joint(&config(), "shoulder");
        assert_eq!(attachment.driver.unwrap().driver_type, DriverType::Motor);
        assert_eq!(attachment.sensors.len(), 1);
    }

    #[test]
    fn test_miss_is_empty_attachment() {
        assert!(match_joint(&config(), "elbow").is_empty());
        // No case folding or prefix matching
        assert!(match_joint(&config(), "Shoulder").is_empty());
        assert!(match_joint(&config(), "shoulder ").is_empty());
    }

    #[test]
    fn test_matching_does_not_modify_table() {
        let config = config();
        let before = config.clone();
        let _ = match_joint(&config, "shoulder");
        let _ = match_joint(&config, "missing");
        assert_eq!(config, before);
    }

    #[test]
    fn test_unmatched_keys() {
        let config = config();
        assert_eq!(unmatched_keys(&config, ["shoulder"]), vec!["wrist"]);
        assert!(unmatched_keys(&config, ["shoulder", "wrist", "elbow"]).is_empty());
    }
}
