//! Placeholder Resolver
//!
//! Substitutes `{{namespace.field}}` expressions in arbitrary text.
//!
//! Resolution runs in two phases:
//!
//! 1. Substitution: every placeholder is replaced. `{{#a.<id>}}` becomes an
//!    action-link token, `{{ns.field}}` becomes the field's string form, and
//!    anything unresolvable becomes empty text.
//! 2. Identity binding: when the property map carries a recipient id, the
//!    action-link provider rebinds every token in the substituted text to that
//!    recipient. Substitution happens before recipient identity is final, so
//!    this is a distinct, idempotent post-pass over the whole text.

use std::sync::Arc;

use tracing::trace;

use crate::accessor::AccessorCache;
use crate::error::TemplateError;
use crate::links::ActionLinkProvider;
use crate::placeholder::{scan, Placeholder, Segment};
use crate::properties::{PropertyMap, DEFAULT_RECIPIENT_KEY};

/// Default reserved namespace for action links
pub const DEFAULT_ACTION_NAMESPACE: &str = "#a";

/// Reserved names used by the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Namespace whose field is an action id, e.g. `{{#a.42}}`
    pub action_namespace: String,
    /// Property-map key carrying the current recipient id
    pub recipient_key: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            action_namespace: DEFAULT_ACTION_NAMESPACE.to_string(),
            recipient_key: DEFAULT_RECIPIENT_KEY.to_string(),
        }
    }
}

/// Resolves placeholders against a property map
///
/// Owns the accessor cache. After [`Resolver::dispose`] every call fails with
/// [`TemplateError::Disposed`].
pub struct Resolver {
    cache: AccessorCache,
    links: Arc<dyn ActionLinkProvider>,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(links: Arc<dyn ActionLinkProvider>) -> Self {
        Self::with_config(links, ResolverConfig::default())
    }

    pub fn with_config(links: Arc<dyn ActionLinkProvider>, config: ResolverConfig) -> Self {
        Self {
            cache: AccessorCache::new(),
            links,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn cache(&self) -> &AccessorCache {
        &self.cache
    }

    /// Substitute every placeholder in `text`, then bind action links to the
    /// recipient if one is present in `properties`
    pub fn interpolate(&self, text: &str, properties: &PropertyMap) -> Result<String, TemplateError> {
        if self.cache.is_disposed() {
            return Err(TemplateError::Disposed);
        }

        for model in properties.models() {
            self.cache.prepare(model)?;
        }

        let recipient = properties.id(&self.config.recipient_key);

        let mut output = String::with_capacity(text.len());
        for segment in scan(text) {
            match segment {
                Segment::Text(literal) => output.push_str(literal),
                Segment::Placeholder(placeholder) => {
                    output.push_str(&self.substitute(&placeholder, properties, recipient)?)
                }
            }
        }

        match recipient {
            Some(recipient_id) => Ok(self.links.rewrite_tokens(&output, recipient_id)),
            None => Ok(output),
        }
    }

    fn substitute(
        &self,
        placeholder: &Placeholder<'_>,
        properties: &PropertyMap,
        recipient: Option<i64>,
    ) -> Result<String, TemplateError> {
        if placeholder.is_namespace(&self.config.action_namespace) {
            return Ok(match placeholder.field.parse::<i64>() {
                Ok(action_id) => self.links.create_token(action_id, recipient),
                Err(_) => {
                    trace!("Non-numeric action id '{}'", placeholder.field);
                    String::new()
                }
            });
        }

        let Some(model) = properties.model(placeholder.namespace) else {
            trace!("Unresolved namespace '{}'", placeholder.namespace);
            return Ok(String::new());
        };

        let descriptor = self.cache.describe(model)?;
        if !descriptor.has_field(placeholder.field) {
            trace!(
                "Unresolved field '{}.{}' on {}",
                placeholder.namespace,
                placeholder.field,
                model.type_name()
            );
            return Ok(String::new());
        }

        Ok(descriptor
            .value(placeholder.field)
            .map(|value| value.to_string())
            .unwrap_or_default())
    }

    /// Release the accessor cache; later calls fail with `Disposed`
    pub fn dispose(&self) {
        self.cache.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.cache.is_disposed()
    }
}
