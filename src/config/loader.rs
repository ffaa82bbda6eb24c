//! Configuration loading and discovery for `sprout.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::SproutConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "sprout.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML parsing error
    #[error("Failed to parse sprout.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Number of parallel jobs for the native build
    pub jobs: Option<usize>,
    /// Override the build root
    pub build_root: Option<PathBuf>,
}

/// Find sprout.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find sprout.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a sprout.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
pub fn load_config(path: Option<&Path>) -> Result<SproutConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
pub fn load_config_file(path: &Path) -> Result<SproutConfig, ConfigError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    parse_config(&contents)
}

/// Parse and validate configuration text.
pub fn parse_config(contents: &str) -> Result<SproutConfig, ConfigError> {
    let config: SproutConfig = toml::from_str(contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Configuration used when no sprout.toml is found.
pub fn default_config() -> SproutConfig {
    SproutConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut SproutConfig, overrides: &CliOverrides) {
    if let Some(jobs) = overrides.jobs {
        config.build.jobs = Some(jobs);
    }

    if let Some(ref root) = overrides.build_root {
        config.build.root = root.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_from_walks_up() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "").unwrap();
        let nested = temp.path().join("magnolia/src/core");
        fs::create_dir_all(&nested).unwrap();

        let found = find_config_from(nested).unwrap();
        assert_eq!(found, temp.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_find_config_ignores_directories() {
        let temp = TempDir::new().unwrap();
        let inner = temp.path().join("inner");
        fs::create_dir_all(inner.join(CONFIG_FILE_NAME)).unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "").unwrap();

        assert_eq!(find_config_from(inner).unwrap(), temp.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_load_config_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[project]\nname = \"magnolia\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.project.name, "magnolia");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = load_config(Some(&temp.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[project\nname = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let err = parse_config("[build]\njobs = 0\n").unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("build.jobs"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = default_config();
        let overrides = CliOverrides { jobs: Some(3), build_root: Some(PathBuf::from("out")) };
        merge_cli_overrides(&mut config, &overrides);

        assert_eq!(config.build.jobs, Some(3));
        assert_eq!(config.build.root, PathBuf::from("out"));
    }

    #[test]
    fn test_merge_empty_overrides_keeps_config() {
        let mut config = default_config();
        merge_cli_overrides(&mut config, &CliOverrides::default());
        assert_eq!(config, default_config());
    }
}
