//! Configuration loader
//!
//! Loads composer configuration from YAML with environment overrides.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::ComposerConfig;
use crate::error::ConfigError;

pub const ENV_CONFIG_PATH: &str = "CRM_PAGES_CONFIG";
pub const ENV_CONTENT_PLACEHOLDER: &str = "CRM_PAGES_CONTENT_PLACEHOLDER";
pub const ENV_RECIPIENT_KEY: &str = "CRM_PAGES_RECIPIENT_KEY";
pub const ENV_ACTION_BASE_URL: &str = "CRM_PAGES_ACTION_BASE_URL";

const DEFAULT_CONFIG_PATH: &str = "config/composer.yaml";

pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Loader that uses built-in defaults plus environment overrides only
    pub fn defaults() -> Self {
        Self { path: None }
    }

    /// Create loader from CRM_PAGES_CONFIG or default to "config/composer.yaml"
    ///
    /// Path resolution order:
    /// 1. CRM_PAGES_CONFIG environment variable (explicit override)
    /// 2. Relative "config/composer.yaml" (works when running from workspace root)
    /// 3. No file - built-in defaults
    pub fn from_env() -> Self {
        if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
            return Self::new(path);
        }

        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            return Self::new(DEFAULT_CONFIG_PATH);
        }

        Self::defaults()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load, apply environment overrides, validate
    pub fn load(&self) -> Result<ComposerConfig, ConfigError> {
        let config = match &self.path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                info!("Loaded composer config from {}", path.display());
                Self::parse(&content)?
            }
            None => {
                debug!("No composer config file, using defaults");
                ComposerConfig::default()
            }
        };

        let config = apply_overrides(config, |key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML; missing keys take their defaults
    pub fn parse(yaml: &str) -> Result<ComposerConfig, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(ComposerConfig::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Overlay environment values (looked up through `lookup`) onto `config`
pub fn apply_overrides<F>(mut config: ComposerConfig, lookup: F) -> ComposerConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(marker) = lookup(ENV_CONTENT_PLACEHOLDER) {
        config.content_placeholder = marker;
    }
    if let Some(key) = lookup(ENV_RECIPIENT_KEY) {
        config.recipient_key = key;
    }
    if let Some(url) = lookup(ENV_ACTION_BASE_URL) {
        config.action_link_base_url = url;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_parse_partial_yaml_keeps_defaults() {
        let config = ConfigLoader::parse("content_placeholder: \"<!-- body -->\"\n").unwrap();
        assert_eq!(config.content_placeholder, "<!-- body -->");
        assert_eq!(config.action_namespace, "#a");
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(ConfigLoader::parse("").unwrap(), ComposerConfig::default());
    }

    #[test]
    fn test_parse_rejects_unknown_shape() {
        assert!(matches!(
            ConfigLoader::parse("content_placeholder: [1, 2]"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_overrides_replace_values() {
        let env: HashMap<&str, &str> = [
            (ENV_CONTENT_PLACEHOLDER, "@@body@@"),
            (ENV_ACTION_BASE_URL, "https://go.example.com"),
        ]
        .into_iter()
        .collect();

        let config = apply_overrides(ComposerConfig::default(), |key| {
            env.get(key).map(|v| v.to_string())
        });

        assert_eq!(config.content_placeholder, "@@body@@");
        assert_eq!(config.action_link_base_url, "https://go.example.com");
        assert_eq!(config.recipient_key, "__recipient_id");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "recipient_key: rcpt").unwrap();
        writeln!(file, "action_namespace: \"#link\"").unwrap();

        let config = ConfigLoader::new(file.path()).load().unwrap();
        assert_eq!(config.recipient_key, "rcpt");
        assert_eq!(config.action_namespace, "#link");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let loader = ConfigLoader::new("/nonexistent/composer.yaml");
        assert!(matches!(loader.load(), Err(ConfigError::Io { .. })));
    }
}
