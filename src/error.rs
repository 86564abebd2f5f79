//! Error types for page composition and configuration
//!
//! Unresolved placeholders are not errors; see `crm_templates::Resolver`.

use std::path::PathBuf;

use crm_templates::TemplateError;
use thiserror::Error;

/// Errors from [`crate::PageComposer::compile`]
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("missing required input: {0}")]
    MissingRequiredInput(&'static str),

    #[error("content placeholder must not be empty")]
    EmptyContentPlaceholder,

    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

/// Errors from loading composer configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_required_input() {
        let e = ComposeError::MissingRequiredInput("content page");
        assert_eq!(e.to_string(), "missing required input: content page");
    }

    #[test]
    fn display_template_disposed() {
        let e = ComposeError::from(TemplateError::Disposed);
        assert_eq!(e.to_string(), "template error: resolver has been disposed");
    }

    #[test]
    fn display_empty_content_placeholder() {
        let e = ComposeError::EmptyContentPlaceholder;
        assert_eq!(e.to_string(), "content placeholder must not be empty");
    }

    #[test]
    fn display_invalid_config() {
        let e = ConfigError::Invalid("empty marker".into());
        assert_eq!(e.to_string(), "invalid configuration: empty marker");
    }
}
