//! Configuration loading and typed config structures for the game.
//!
//! The game config is an optional YAML file. Every field has a default, so
//! an absent or empty file yields a playable configuration. Achievement
//! thresholds live here so they can be tuned without touching the engine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use kitchen_types::AchievementRule;
use serde::Deserialize;

use crate::generation::AiIdPolicy;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Where and how often progress is written.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Generation fallback settings.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Replacement achievement rules. `None` keeps the catalog defaults.
    #[serde(default)]
    pub achievements: Option<Vec<AchievementRule>>,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// `KITCHEN_SAVE_DIR` replaces `storage.directory` when set to a
    /// non-blank value. Callers pass `|name| std::env::var(name).ok()` for
    /// the process environment.
    #[must_use]
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("KITCHEN_SAVE_DIR").filter(|d| !d.trim().is_empty()) {
            self.storage.directory = PathBuf::from(dir);
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.autosave_interval_secs == 0 {
            return Err(ConfigError::Invalid(String::from(
                "storage.autosave_interval_secs must be at least 1",
            )));
        }
        if self.generation.max_id_len == 0 {
            return Err(ConfigError::Invalid(String::from(
                "generation.max_id_len must be at least 1",
            )));
        }
        if self.generation.difficulty == 0 {
            return Err(ConfigError::Invalid(String::from(
                "generation.difficulty must be at least 1",
            )));
        }
        Ok(())
    }

    /// Period of the durability safeguard save.
    pub const fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.storage.autosave_interval_secs)
    }

    /// Id and difficulty policy for generated ingredients.
    pub fn ai_id_policy(&self) -> AiIdPolicy {
        AiIdPolicy {
            prefix: self.generation.id_prefix.clone(),
            max_len: self.generation.max_id_len,
            difficulty: self.generation.difficulty,
        }
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON blob per storage key.
    #[serde(default = "default_storage_directory")]
    pub directory: PathBuf,

    /// Seconds between safeguard saves.
    #[serde(default = "default_autosave_interval_secs")]
    pub autosave_interval_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: default_storage_directory(),
            autosave_interval_secs: default_autosave_interval_secs(),
        }
    }
}

/// Generation fallback configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerationConfig {
    /// Whether unmatched combinations are sent to the generation service.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Prefix marking generated ids.
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Maximum length of the sanitized name part of a generated id.
    #[serde(default = "default_max_id_len")]
    pub max_id_len: usize,

    /// Difficulty assigned to every generated ingredient.
    #[serde(default = "default_generated_difficulty")]
    pub difficulty: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            id_prefix: default_id_prefix(),
            max_id_len: default_max_id_len(),
            difficulty: default_generated_difficulty(),
        }
    }
}

fn default_storage_directory() -> PathBuf {
    PathBuf::from("kitchen-save")
}

const fn default_autosave_interval_secs() -> u64 {
    30
}

const fn default_true() -> bool {
    true
}

fn default_id_prefix() -> String {
    String::from("ai_")
}

const fn default_max_id_len() -> usize {
    30
}

const fn default_generated_difficulty() -> u32 {
    3
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kitchen_types::Threshold;

    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = GameConfig::parse("").unwrap();
        assert_eq!(config.storage.directory, PathBuf::from("kitchen-save"));
        assert_eq!(config.storage.autosave_interval_secs, 30);
        assert!(config.generation.enabled);
        assert_eq!(config.generation.id_prefix, "ai_");
        assert_eq!(config.generation.max_id_len, 30);
        assert_eq!(config.generation.difficulty, 3);
        assert!(config.achievements.is_none());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = "generation:\n  enabled: false\n";
        let config = GameConfig::parse(yaml).unwrap();
        assert!(!config.generation.enabled);
        assert_eq!(config.generation.difficulty, 3);
        assert_eq!(config.autosave_interval(), Duration::from_secs(30));
    }

    #[test]
    fn achievements_are_configurable() {
        let yaml = r"
achievements:
  - id: tiny
    name: Tiny
    description: One thing.
    threshold:
      non_basic_discoveries: 1
  - id: deep
    name: Deep
    description: Go deep.
    threshold:
      max_difficulty: 6
";
        let config = GameConfig::parse(yaml).unwrap();
        let rules = config.achievements.unwrap_or_default();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.get(1).map(|r| r.threshold), Some(Threshold::MaxDifficulty(6)));
    }

    #[test]
    fn save_dir_override_comes_from_lookup() {
        let yaml = "storage:\n  directory: from-file\n";
        let config = GameConfig::parse(yaml).unwrap();
        assert_eq!(config.storage.directory, PathBuf::from("from-file"));

        let overridden = config.clone().with_env_overrides(|name| {
            (name == "KITCHEN_SAVE_DIR").then(|| String::from("/tmp/elsewhere"))
        });
        assert_eq!(overridden.storage.directory, PathBuf::from("/tmp/elsewhere"));

        let blank = config.clone().with_env_overrides(|_| Some(String::from("  ")));
        assert_eq!(blank.storage.directory, PathBuf::from("from-file"));

        let untouched = config.clone().with_env_overrides(|_| None);
        assert_eq!(untouched, config);
    }

    #[test]
    fn zero_interval_rejected() {
        let yaml = "storage:\n  autosave_interval_secs: 0\n";
        assert!(matches!(GameConfig::parse(yaml), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_yaml_rejected() {
        assert!(matches!(
            GameConfig::parse("generation: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }
}
