//! Configuration file support.
//!
//! Settings are read from a TOML file. Everything is optional; a missing
//! file means built-in defaults.
//!
//! # Configuration File Format
//!
//! ```toml
//! log_file = "file_log.txt"
//! directory = "/home/me/Downloads"
//! enabled = ["Documents", "Images"]
//!
//! [filters]
//! ignored_suffixes = [".crdownload", ".part"]
//! exclude_patterns = ["~$*"]
//!
//! [[categories]]
//! name = "Books"
//! extensions = ["epub", ".mobi"]
//! ```

use crate::classifier::Classifier;
use crate::file_category::{CategoryRule, RuleSet};
use crate::run_log::DEFAULT_LOG_FILE;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".foldersortrc.toml";

/// Errors that can occur during configuration loading.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax, structure or values.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern { pattern: String, reason: String },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern { pattern, reason } => {
                write!(f, "Invalid glob pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path of the cumulative run log.
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Directory to organize when none is given on the command line.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Categories enabled by default. All categories when absent.
    #[serde(default)]
    pub enabled: Option<Vec<String>>,

    #[serde(default)]
    pub filters: FilterRules,

    /// Extra categories, placed before the `Unknown` catch-all.
    #[serde(default)]
    pub categories: Vec<CustomCategory>,
}

/// Additional rules for files that must never be moved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    /// Suffixes added to the built-in ignored set.
    #[serde(default)]
    pub ignored_suffixes: Vec<String>,

    /// Glob patterns matched against the file name.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// A user-defined category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomCategory {
    pub name: String,
    pub extensions: Vec<String>,
}

impl AppConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.foldersortrc.toml` in the current directory
    /// 3. Look for `~/.config/foldersort/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read, or if any discovered file is malformed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("foldersort")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Path of the run log, defaulting to `file_log.txt`.
    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }

    /// Builds the classifier: the standard rules extended with custom
    /// categories, extra ignored suffixes and compiled exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid glob pattern, a custom category with
    /// no extensions, or a custom category that reuses an existing name.
    pub fn build_classifier(&self) -> Result<Classifier, ConfigError> {
        let mut rules = RuleSet::standard();

        for custom in &self.categories {
            let name = custom.name.trim();
            if name.is_empty() {
                return Err(ConfigError::ConfigInvalid(
                    "category name must not be empty".to_string(),
                ));
            }
            if rules.resolve_name(name).is_some() {
                return Err(ConfigError::ConfigInvalid(format!(
                    "category '{}' is already defined",
                    name
                )));
            }
            let rule = CategoryRule::new(name, &custom.extensions);
            if rule.is_catch_all() {
                return Err(ConfigError::ConfigInvalid(format!(
                    "category '{}' has no extensions",
                    name
                )));
            }
            rules.insert_before_catch_all(rule);
        }

        for suffix in &self.filters.ignored_suffixes {
            rules.add_ignored_suffix(suffix.trim());
        }

        let exclude_patterns = self
            .filters
            .exclude_patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| ConfigError::InvalidGlobPattern {
                    pattern: pattern.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Classifier::new(rules).with_exclude_patterns(exclude_patterns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Decision;
    use crate::file_category::EnabledCategories;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.log_file(), PathBuf::from("file_log.txt"));
        assert!(config.enabled.is_none());
        assert!(config.build_classifier().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = AppConfig::from_toml(
            r#"
            log_file = "/var/log/sort.txt"
            directory = "/data/inbox"
            enabled = ["Documents", "Books"]

            [filters]
            ignored_suffixes = [".crdownload"]
            exclude_patterns = ["~$*"]

            [[categories]]
            name = "Books"
            extensions = ["epub", ".MOBI"]
            "#,
        )
        .unwrap();

        assert_eq!(config.log_file(), PathBuf::from("/var/log/sort.txt"));
        assert_eq!(config.directory, Some(PathBuf::from("/data/inbox")));
        assert_eq!(config.categories.len(), 1);

        let classifier = config.build_classifier().unwrap();
        let enabled = EnabledCategories::all(classifier.rules());
        assert_eq!(
            classifier.classify("novel.mobi", &enabled),
            Decision::MoveTo("Books".to_string())
        );
        assert_eq!(classifier.classify("big.iso.crdownload", &enabled), Decision::Ignore);
        assert_eq!(classifier.classify("~$draft.docx", &enabled), Decision::Ignore);
    }

    #[test]
    fn test_custom_category_comes_before_unknown() {
        let config = AppConfig {
            categories: vec![CustomCategory {
                name: "Books".to_string(),
                extensions: vec!["epub".to_string()],
            }],
            ..Default::default()
        };
        let classifier = config.build_classifier().unwrap();
        let names: Vec<_> = classifier.rules().names().collect();
        assert_eq!(names[names.len() - 2..], ["Books", "Unknown"]);
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let config = AppConfig {
            categories: vec![CustomCategory {
                name: "images".to_string(),
                extensions: vec!["webp".to_string()],
            }],
            ..Default::default()
        };
        assert!(matches!(
            config.build_classifier(),
            Err(ConfigError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_category_without_extensions_rejected() {
        let config = AppConfig {
            categories: vec![CustomCategory {
                name: "Empty".to_string(),
                extensions: Vec::new(),
            }],
            ..Default::default()
        };
        assert!(config.build_classifier().is_err());
    }

    #[test]
    fn test_invalid_glob_pattern_returns_error() {
        let config = AppConfig {
            filters: FilterRules {
                exclude_patterns: vec!["[invalid".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.build_classifier(),
            Err(ConfigError::InvalidGlobPattern { .. })
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AppConfig::from_toml("enabled = 3"),
            Err(ConfigError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "log_file = \"custom.log\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.log_file(), PathBuf::from("custom.log"));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = AppConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }
}
