//! Shared Page Types for crm-pages
//!
//! Pages and portals are owned by the storage layer. Everything here is a
//! plain value: the composer reads these shapes and produces new ones, it
//! never mutates what storage handed it.
//!
//! ## Rules
//!
//! 1. Page identity (`id`, `uri`) belongs to the page that was requested
//! 2. Optional text is `Option<String>` - `None` means "not specified"
//! 3. Reference order is significant and preserved end to end

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// PORTAL
// ============================================================================

/// Handle to the portal that owns a page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortalRef {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
}

impl PortalRef {
    pub fn new(id: Uuid) -> Self {
        Self { id, name: None }
    }

    pub fn named(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }
}

// ============================================================================
// PAGE REFERENCES
// ============================================================================

/// What a page reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Stylesheet,
    Script,
    Link,
}

/// A linked resource declared by a page (stylesheet, script, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageReference {
    pub kind: ReferenceKind,
    pub uri: String,
}

impl PageReference {
    pub fn stylesheet(uri: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Stylesheet,
            uri: uri.into(),
        }
    }

    pub fn script(uri: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Script,
            uri: uri.into(),
        }
    }

    pub fn link(uri: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Link,
            uri: uri.into(),
        }
    }
}

// ============================================================================
// PAGE
// ============================================================================

/// A published page, or one layer of a page under composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: Uuid,
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_content: Option<String>,
    #[serde(default)]
    pub style_content: Option<String>,
    #[serde(default)]
    pub references: Vec<PageReference>,
}

impl Page {
    /// Create an empty page with the given identity
    pub fn new(id: Uuid, uri: impl Into<String>) -> Self {
        Self {
            id,
            uri: uri.into(),
            name: None,
            description: None,
            html_content: None,
            style_content: None,
            references: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html_content = Some(html.into());
        self
    }

    pub fn with_style(mut self, css: impl Into<String>) -> Self {
        self.style_content = Some(css.into());
        self
    }

    pub fn with_reference(mut self, reference: PageReference) -> Self {
        self.references.push(reference);
        self
    }

    /// HTML content, empty when the page has none
    pub fn html(&self) -> &str {
        self.html_content.as_deref().unwrap_or_default()
    }

    /// Style content, empty when the page has none
    pub fn style(&self) -> &str {
        self.style_content.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let id = Uuid::new_v4();
        let page = Page::new(id, "/welcome")
            .with_name("Welcome")
            .with_html("<p>Hi</p>")
            .with_reference(PageReference::stylesheet("/site.css"));

        assert_eq!(page.id, id);
        assert_eq!(page.uri, "/welcome");
        assert_eq!(page.name.as_deref(), Some("Welcome"));
        assert_eq!(page.html(), "<p>Hi</p>");
        assert_eq!(page.style(), "");
        assert_eq!(page.references.len(), 1);
    }

    #[test]
    fn test_page_deserializes_with_defaults() {
        let page: Page = serde_yaml::from_str(
            r#"
id: 6f1c1d52-7a53-4f43-9d39-55f4d2cf1a0e
uri: /landing
html_content: "<main>[[slot]]</main>"
references:
  - kind: script
    uri: /app.js
"#,
        )
        .unwrap();

        assert_eq!(page.uri, "/landing");
        assert!(page.name.is_none());
        assert!(page.style_content.is_none());
        assert_eq!(page.references, vec![PageReference::script("/app.js")]);
    }

    #[test]
    fn test_reference_kind_serializes_snake_case() {
        let json = serde_json::to_string(&PageReference::stylesheet("/a.css")).unwrap();
        assert_eq!(json, r#"{"kind":"stylesheet","uri":"/a.css"}"#);
    }
}
