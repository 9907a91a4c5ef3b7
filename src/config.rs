//! User settings.
//!
//! Persisted as JSON in the platform config directory
//! (`<config dir>/annotator/settings.json`).

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::vocabulary::raw::CONFIG_FILE_NAME;

pub const DEFAULT_CONFIG_NAME: &str = "Neurobagel";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding one sub-directory per vocabulary configuration
    pub vocabulary_dir: PathBuf,
    /// Configuration in use
    pub selected_config: String,
    /// Where exported dictionaries are written
    pub output_dir: PathBuf,
    /// Refuse to export dictionaries that fail schema validation
    pub require_valid_export: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vocabulary_dir: PathBuf::from("vocabularies"),
            selected_config: DEFAULT_CONFIG_NAME.to_owned(),
            output_dir: PathBuf::from("."),
            require_valid_export: true,
        }
    }
}

impl Settings {
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("annotator").join("settings.json"))
    }

    /// Load settings, falling back to defaults when none were saved.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&contents).context("Failed to parse settings JSON")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }

    /// Directory of the vocabulary configuration called `name`.
    pub fn config_dir(&self, name: &str) -> PathBuf {
        self.vocabulary_dir.join(name)
    }

    /// Directory of the selected vocabulary configuration.
    pub fn selected_config_dir(&self) -> PathBuf {
        self.config_dir(&self.selected_config)
    }
}

/// Names of the vocabulary configurations in `dir`, sorted.
///
/// A configuration is a sub-directory containing a `config.json`.
pub fn available_configs(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read vocabulary directory: {}", dir.display()))?;

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|path| path.join(CONFIG_FILE_NAME).is_file())
        .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(str::to_owned))
        .collect();
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let temp_dir = tempdir()?;
        let settings = Settings::load_from(&temp_dir.path().join("settings.json"))?;
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.selected_config, "Neurobagel");
        assert!(settings.require_valid_export);
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("nested").join("settings.json");
        let settings = Settings {
            selected_config: "Custom".to_owned(),
            require_valid_export: false,
            ..Settings::default()
        };
        settings.save_to(&path)?;
        assert_eq!(Settings::load_from(&path)?, settings);
        Ok(())
    }

    #[test]
    fn test_config_dirs_live_under_vocabulary_dir() {
        let settings = Settings {
            vocabulary_dir: PathBuf::from("vocab"),
            ..Settings::default()
        };
        assert_eq!(
            settings.selected_config_dir(),
            Path::new("vocab").join("Neurobagel")
        );
        assert_eq!(settings.config_dir("Custom"), Path::new("vocab").join("Custom"));
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{"output_dir": "exports"}"#)?;
        let settings = Settings::load_from(&path)?;
        assert_eq!(settings.output_dir, PathBuf::from("exports"));
        assert_eq!(settings.selected_config, DEFAULT_CONFIG_NAME);
        Ok(())
    }

    #[test]
    fn test_available_configs() -> Result<()> {
        let temp_dir = tempdir()?;
        for name in ["Neurobagel", "Alpha"] {
            let dir = temp_dir.path().join(name);
            std::fs::create_dir_all(&dir)?;
            std::fs::write(dir.join(CONFIG_FILE_NAME), "{}")?;
        }
        std::fs::create_dir_all(temp_dir.path().join("empty"))?;
        std::fs::write(temp_dir.path().join("stray.json"), "{}")?;

        assert_eq!(available_configs(temp_dir.path())?, vec!["Alpha", "Neurobagel"]);
        Ok(())
    }
}
