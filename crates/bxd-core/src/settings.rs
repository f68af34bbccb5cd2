//! Export settings stored as a RON file

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Output format to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Per-node meshes plus the BXDJ skeleton
    Legacy,
    /// Single JSON document
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Replaces the robot name taken from the model
    pub robot_name: Option<String>,
    pub output_dir: PathBuf,
    pub formats: Vec<ExportFormat>,
    pub pretty_json: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            robot_name: None,
            output_dir: PathBuf::from("export"),
            formats: vec![ExportFormat::Legacy, ExportFormat::Json],
            pretty_json: true,
        }
    }
}

impl ExportSettings {
    pub const FILE_NAME: &'static str = "export_settings.ron";
    pub const JSON_FILE_NAME: &'static str = "robot.json";

    /// Load settings from `path`, falling back to defaults when the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let settings = ron::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        tracing::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }

    pub fn wants(&self, format: ExportFormat) -> bool {
        self.formats.contains(&format)
    }

    /// Robot name to export under
    pub fn robot_name<'a>(&'a self, model_name: &'a str) -> &'a str {
        self.robot_name.as_deref().unwrap_or(model_name)
    }

    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(Self::JSON_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ExportSettings::default();
        assert!(settings.wants(ExportFormat::Legacy));
        assert!(settings.wants(ExportFormat::Json));
        assert!(settings.pretty_json);
        assert_eq!(settings.robot_name("model"), "model");
        assert_eq!(settings.json_path(), PathBuf::from("export/robot.json"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: ExportSettings =
            ron::from_str(r#"(robot_name: Some("Team 1234"), formats: [Json])"#).unwrap();
        assert_eq!(settings.robot_name("model"), "Team 1234");
        assert!(!settings.wants(ExportFormat::Legacy));
        assert_eq!(settings.output_dir, PathBuf::from("export"));
        assert!(settings.pretty_json);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ExportSettings::load(dir.path().join(ExportSettings::FILE_NAME)).unwrap();
        assert_eq!(settings, ExportSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(ExportSettings::FILE_NAME);
        let settings = ExportSettings {
            robot_name: Some("bot".into()),
            output_dir: PathBuf::from("out"),
            formats: vec![ExportFormat::Legacy],
            pretty_json: false,
        };

        settings.save(&path).unwrap();
        assert_eq!(ExportSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ExportSettings::FILE_NAME);
        std::fs::write(&path, "(formats: [Pdf])").unwrap();
        assert!(matches!(
            ExportSettings::load(&path),
            Err(ConfigError::Deserialize(_))
        ));
    }
}
