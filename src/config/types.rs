//! Composer configuration types

use std::sync::Arc;

use crm_templates::{
    Resolver, ResolverConfig, UrlActionLinks, DEFAULT_ACTION_NAMESPACE, DEFAULT_RECIPIENT_KEY,
};
use serde::{Deserialize, Serialize};

use crate::composer::{PageComposer, DEFAULT_CONTENT_PLACEHOLDER};
use crate::error::ConfigError;

pub const DEFAULT_ACTION_LINK_BASE_URL: &str = "https://links.invalid";

/// Reserved markers and collaborator settings for page composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Literal marker in master HTML replaced by the next layer's HTML
    pub content_placeholder: String,
    /// Property-map key carrying the current recipient id
    pub recipient_key: String,
    /// Placeholder namespace for action links
    pub action_namespace: String,
    /// Base URL of tokens minted by the built-in action-link provider
    pub action_link_base_url: String,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            content_placeholder: DEFAULT_CONTENT_PLACEHOLDER.to_string(),
            recipient_key: DEFAULT_RECIPIENT_KEY.to_string(),
            action_namespace: DEFAULT_ACTION_NAMESPACE.to_string(),
            action_link_base_url: DEFAULT_ACTION_LINK_BASE_URL.to_string(),
        }
    }
}

impl ComposerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content_placeholder.is_empty() {
            return Err(ConfigError::Invalid(
                "content_placeholder must not be empty".into(),
            ));
        }
        if self.recipient_key.trim().is_empty() {
            return Err(ConfigError::Invalid("recipient_key must not be empty".into()));
        }

        // Must be something the placeholder scanner can produce as a namespace
        let valid_namespace = self
            .action_namespace
            .strip_prefix('#')
            .is_some_and(|rest| {
                !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
            });
        if !valid_namespace {
            return Err(ConfigError::Invalid(format!(
                "action_namespace '{}' must be '#' followed by letters, digits or '_'",
                self.action_namespace
            )));
        }

        if self.action_link_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "action_link_base_url must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            action_namespace: self.action_namespace.clone(),
            recipient_key: self.recipient_key.clone(),
        }
    }

    /// Resolver backed by the built-in URL action-link provider
    pub fn build_resolver(&self) -> Resolver {
        let links = Arc::new(UrlActionLinks::new(self.action_link_base_url.clone()));
        Resolver::with_config(links, self.resolver_config())
    }

    /// Composer wired with [`ComposerConfig::build_resolver`]
    pub fn build_composer(&self) -> Result<PageComposer, ConfigError> {
        self.validate()?;
        PageComposer::with_placeholder(
            Arc::new(self.build_resolver()),
            self.content_placeholder.clone(),
        )
        .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
