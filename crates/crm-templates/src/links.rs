//! Action Links
//!
//! Action links are opaque, trackable tokens. The resolver emits them while
//! substituting `{{#a.<id>}}` placeholders and, once the recipient is known,
//! asks the provider to bind every token in the finished text to that
//! recipient. The binding pass must be idempotent.

use regex::Regex;

/// Collaborator that mints and rebinds action-link tokens
pub trait ActionLinkProvider: Send + Sync {
    /// Token for `action_id`, bound to `recipient_id` when known
    fn create_token(&self, action_id: i64, recipient_id: Option<i64>) -> String;

    /// Bind every token in `text` to `recipient_id`
    fn rewrite_tokens(&self, text: &str, recipient_id: i64) -> String;
}

/// Marker used in the recipient slot of an unbound token
pub const UNBOUND_RECIPIENT: &str = "~";

/// In-process provider that renders tokens as URLs
///
/// Format: `{base}/a/{action_id}/{recipient_id}/`, with [`UNBOUND_RECIPIENT`]
/// in the recipient segment until the token is bound. The trailing `/` ends
/// the token, so text that follows it is never read as part of the recipient.
#[derive(Debug, Clone)]
pub struct UrlActionLinks {
    base_url: String,
    token_re: Regex,
}

impl UrlActionLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let token_re = Regex::new(&format!(
            r"(?P<action>{}/a/-?\d+)/(?:~|-?\d+)/",
            regex::escape(&base_url)
        ))
        .expect("escaped base url is a valid pattern");
        Self { base_url, token_re }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ActionLinkProvider for UrlActionLinks {
    fn create_token(&self, action_id: i64, recipient_id: Option<i64>) -> String {
        match recipient_id {
            Some(recipient) => format!("{}/a/{}/{}/", self.base_url, action_id, recipient),
            None => format!("{}/a/{}/{}/", self.base_url, action_id, UNBOUND_RECIPIENT),
        }
    }

    fn rewrite_tokens(&self, text: &str, recipient_id: i64) -> String {
        let replacement = format!("${{action}}/{}/", recipient_id);
        self.token_re
            .replace_all(text, replacement.as_str())
            .into_owned()
    }
}
