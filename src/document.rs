//! Composition documents
//!
//! A self-contained YAML description of one compilation: portal, master
//! chain, content page, model records and flags. Used by `page_compile` and
//! by fixtures in tests.
//!
//! ```yaml
//! portal:
//!   id: 2d3c5b8e-0a4f-4d7e-9a51-3f0c1f1e9b10
//!   name: Spring
//! masters:
//!   - id: 7c0f...
//!     uri: /layout
//!     html_content: "<body>[[slot]]</body>"
//! content:
//!   id: 91b2...
//!   uri: /offer
//!   html_content: "<p>Hi {{contact.firstname}}</p>"
//! contact:
//!   id: 0e8e...
//!   first_name: Jane
//! recipient_id: 7
//! merge: true
//! interpolate_html: true
//! ```

use crm_pages_types::{Page, PortalRef};
use crm_templates::{PropertyMap, PropertyValue};
use serde::{Deserialize, Serialize};

use crate::composer::{CompositionFlags, CompositionOptions};
use crate::error::ConfigError;
use crate::models::{Campaign, Contact, PortalProfile};

pub const CONTACT_NAMESPACE: &str = "contact";
pub const CAMPAIGN_NAMESPACE: &str = "campaign";
pub const PORTAL_NAMESPACE: &str = "portal";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionDocument {
    pub portal: Option<PortalRef>,
    #[serde(default)]
    pub masters: Vec<Page>,
    pub content: Option<Page>,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub campaign: Option<Campaign>,
    #[serde(default)]
    pub portal_profile: Option<PortalProfile>,
    #[serde(default)]
    pub recipient_id: Option<i64>,
    #[serde(default = "default_true")]
    pub merge: bool,
    #[serde(default = "default_true")]
    pub interpolate_html: bool,
    #[serde(default)]
    pub interpolate_style: bool,
}

fn default_true() -> bool {
    true
}

impl CompositionDocument {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn flags(&self) -> CompositionFlags {
        let mut flags = CompositionFlags::empty();
        flags.set(CompositionFlags::MERGE_MASTER_AND_CONTENT, self.merge);
        flags.set(CompositionFlags::INTERPOLATE_HTML_CONTENT, self.interpolate_html);
        flags.set(CompositionFlags::INTERPOLATE_STYLE_CONTENT, self.interpolate_style);
        flags
    }

    /// Property map with the document's records; the recipient id is stored
    /// under `recipient_key`
    pub fn properties(&self, recipient_key: &str) -> PropertyMap {
        let mut properties = PropertyMap::new();
        if let Some(contact) = &self.contact {
            properties.insert_object(CONTACT_NAMESPACE, contact.clone());
        }
        if let Some(campaign) = &self.campaign {
            properties.insert_object(CAMPAIGN_NAMESPACE, campaign.clone());
        }
        if let Some(profile) = &self.portal_profile {
            properties.insert_object(PORTAL_NAMESPACE, profile.clone());
        }
        if let Some(recipient_id) = self.recipient_id {
            properties.insert(recipient_key, PropertyValue::Id(recipient_id));
        }
        properties
    }

    pub fn into_options(self, recipient_key: &str) -> CompositionOptions {
        let properties = self.properties(recipient_key);
        let flags = self.flags();
        CompositionOptions {
            portal: self.portal,
            content_page: self.content,
            master_pages: self.masters,
            properties,
            flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
portal:
  id: 2d3c5b8e-0a4f-4d7e-9a51-3f0c1f1e9b10
masters:
  - id: 7c0f2a4e-4b0d-4d8e-8f7a-1a2b3c4d5e6f
    uri: /layout
    html_content: "<body>[[slot]]</body>"
content:
  id: 91b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d
  uri: /offer
  html_content: "<p>Hi {{contact.firstname}}</p>"
contact:
  id: 0e8e1f2a-3b4c-4d5e-9f6a-7b8c9d0e1f2a
  first_name: Jane
recipient_id: 7
"#;

    #[test]
    fn test_parse_document_defaults() {
        let doc = CompositionDocument::from_yaml(DOC).unwrap();
        assert_eq!(doc.masters.len(), 1);
        assert!(doc.merge);
        assert!(doc.interpolate_html);
        assert!(!doc.interpolate_style);
        assert_eq!(
            doc.flags(),
            CompositionFlags::MERGE_MASTER_AND_CONTENT | CompositionFlags::INTERPOLATE_HTML_CONTENT
        );
    }

    #[test]
    fn test_properties_include_records_and_recipient() {
        let doc = CompositionDocument::from_yaml(DOC).unwrap();
        let properties = doc.properties("rcpt");

        assert!(properties.model(CONTACT_NAMESPACE).is_some());
        assert!(properties.model(CAMPAIGN_NAMESPACE).is_none());
        assert_eq!(properties.id("rcpt"), Some(7));
    }

    #[test]
    fn test_into_options_moves_pages() {
        let options = CompositionDocument::from_yaml(DOC)
            .unwrap()
            .into_options("__recipient_id");

        assert!(options.portal.is_some());
        assert_eq!(options.master_pages[0].uri, "/layout");
        assert_eq!(options.content_page.map(|p| p.uri), Some("/offer".into()));
    }
}
