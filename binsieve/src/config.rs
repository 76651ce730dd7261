//! Scan configuration, loadable from YAML files and mergeable with CLI
//! arguments.
//!
//! Configuration locations, in order of precedence:
//! 1. Custom config file passed via `--config`
//! 2. Local `.binsieve.yaml` in the current directory
//! 3. Global `$CONFIG_DIR/binsieve/config.yaml`
//!
//! Example:
//! ```yaml
//! root_path: "/var/log"
//! bindings:
//!   - option: substring
//!     value: "panic"
//!   - option: bit-seq
//!     value: "0b1100101"
//! use_or: true
//! invert: false
//! log_level: "info"
//! ```
//!
//! CLI values take precedence over config file values; the merge rules live
//! in `merge_with_cli`.

use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::combine::CombinationPolicy;

/// A matcher option name paired with the value to bind to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionBinding {
    pub option: String,
    pub value: String,
}

/// Configuration for one scan run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Root directory to scan
    #[serde(default = "default_root")]
    pub root_path: PathBuf,

    /// Matcher option bindings, routed by option name
    #[serde(default)]
    pub bindings: Vec<OptionBinding>,

    /// Report files matching any criterion instead of all
    #[serde(default)]
    pub use_or: bool,

    /// Invert the final per-file decision
    #[serde(default)]
    pub invert: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            root_path: default_root(),
            bindings: Vec::new(),
            use_or: false,
            invert: false,
            log_level: default_log_level(),
        }
    }
}

impl ScanConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from an explicit file. An explicit
    /// path that does not exist is an error; the default locations are
    /// simply skipped when absent.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::Message(format!(
                    "configuration file {} not found",
                    path.display()
                )));
            }
        }

        let mut builder = ConfigBuilder::builder();

        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("binsieve/config.yaml")),
            // Local config
            Some(PathBuf::from(".binsieve.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values; CLI values win
    pub fn merge_with_cli(mut self, cli_config: ScanConfig) -> Self {
        if cli_config.root_path != default_root() {
            self.root_path = cli_config.root_path;
        }
        if !cli_config.bindings.is_empty() {
            self.bindings = cli_config.bindings;
        }
        if cli_config.use_or {
            self.use_or = true;
        }
        if cli_config.invert {
            self.invert = true;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }

    pub fn policy(&self) -> CombinationPolicy {
        CombinationPolicy {
            use_or: self.use_or,
            invert: self.invert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let config_content = r#"
            root_path: "/data"
            bindings:
              - option: substring
                value: "hello"
              - option: bit-seq
                value: "0b101"
            use_or: true
            invert: true
            log_level: "debug"
        "#;

        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = ScanConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.root_path, PathBuf::from("/data"));
        assert_eq!(config.bindings.len(), 2);
        assert_eq!(config.bindings[0].option, "substring");
        assert_eq!(config.bindings[1].value, "0b101");
        assert!(config.use_or);
        assert!(config.invert);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_default_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(b"root_path: \"/data\"\n").unwrap();

        let config = ScanConfig::load_from(Some(&config_path)).unwrap();
        assert!(config.bindings.is_empty());
        assert!(!config.use_or);
        assert!(!config.invert);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_merge_with_cli() {
        let file_config = ScanConfig {
            root_path: PathBuf::from("/data"),
            bindings: vec![OptionBinding {
                option: "substring".to_string(),
                value: "from-file".to_string(),
            }],
            use_or: false,
            invert: false,
            log_level: "warn".to_string(),
        };

        let cli_config = ScanConfig {
            root_path: PathBuf::from("/tmp/scan"),
            bindings: vec![OptionBinding {
                option: "byte-seq".to_string(),
                value: "0xff".to_string(),
            }],
            use_or: true,
            invert: false,
            log_level: "debug".to_string(),
        };

        let merged = file_config.merge_with_cli(cli_config);
        assert_eq!(merged.root_path, PathBuf::from("/tmp/scan"));
        assert_eq!(merged.bindings[0].option, "byte-seq");
        assert!(merged.use_or);
        assert!(!merged.invert);
        assert_eq!(merged.log_level, "debug");
    }

    #[test]
    fn test_merge_keeps_file_values_for_defaults() {
        let file_config = ScanConfig {
            root_path: PathBuf::from("/data"),
            use_or: true,
            ..Default::default()
        };

        let merged = file_config.merge_with_cli(ScanConfig::default());
        assert_eq!(merged.root_path, PathBuf::from("/data"));
        assert!(merged.use_or);
    }

    #[test]
    fn test_invalid_config() {
        let config_content = r#"
            root_path: []
            use_or: "maybe"
        "#;

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        assert!(ScanConfig::load_from(Some(&config_path)).is_err());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ScanConfig::load_from(Some(Path::new("nonexistent.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_policy_from_config() {
        let config = ScanConfig {
            use_or: true,
            invert: true,
            ..Default::default()
        };
        let policy = config.policy();
        assert!(policy.use_or);
        assert!(policy.invert);
    }
}
