//! CRM model types exposed to page and message placeholders
//!
//! | Namespace (by convention) | Type | Fields |
//! |---|---|---|
//! | `contact` | [`Contact`] | id, firstname, lastname, fullname, email, emailname, company, created |
//! | `campaign` | [`Campaign`] | id, name, subject, starts |
//! | `portal` | [`PortalProfile`] | name, url |

use chrono::{DateTime, Utc};
use crm_templates::{FieldDeclarations, Fields};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An email address with optional display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub address: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl EmailAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            display_name: None,
        }
    }
}

/// A CRM contact - the usual recipient of a page or message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<EmailAddress>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Contact {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            email: None,
            company: None,
            created_at: None,
        }
    }

    /// "First Last", whichever parts are present
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

impl Fields for Contact {
    fn declare(fields: &mut FieldDeclarations<Self>) {
        fields
            .field("id", |c| Some(c.id))
            .field("firstname", |c| c.first_name.clone())
            .field("lastname", |c| c.last_name.clone())
            .field("fullname", Contact::full_name)
            .nested("email", |c| c.email.as_ref(), |e| Some(e.address.clone()))
            .nested("emailname", |c| c.email.as_ref(), |e| e.display_name.clone())
            .field("company", |c| c.company.clone())
            .field("created", |c| c.created_at);
    }
}

/// A marketing campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
}

impl Fields for Campaign {
    fn declare(fields: &mut FieldDeclarations<Self>) {
        fields
            .field("id", |c| Some(c.id))
            .field("name", |c| Some(c.name.clone()))
            .field("subject", |c| c.subject.clone())
            .field("starts", |c| c.starts_at);
    }
}

/// Public-facing details of the portal a page is published on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalProfile {
    pub name: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Fields for PortalProfile {
    fn declare(fields: &mut FieldDeclarations<Self>) {
        fields
            .field("name", |p| Some(p.name.clone()))
            .field("url", |p| p.base_url.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_templates::{AccessorCache, FieldValue};

    fn contact() -> Contact {
        Contact {
            first_name: Some("Jane".into()),
            last_name: Some("Doe".into()),
            email: Some(EmailAddress {
                address: "jane@example.com".into(),
                display_name: Some("Jane D.".into()),
            }),
            ..Contact::new(Uuid::nil())
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(contact().full_name().as_deref(), Some("Jane Doe"));

        let mut only_last = Contact::new(Uuid::nil());
        only_last.last_name = Some("Doe".into());
        assert_eq!(only_last.full_name().as_deref(), Some("Doe"));

        assert_eq!(Contact::new(Uuid::nil()).full_name(), None);
    }

    #[test]
    fn test_contact_email_exposes_address() {
        let cache = AccessorCache::new();
        let contact = contact();
        let descriptor = cache.describe(&contact).unwrap();

        assert_eq!(
            descriptor.value("email"),
            Some(FieldValue::from("jane@example.com"))
        );
        assert_eq!(
            descriptor.value("EmailName"),
            Some(FieldValue::from("Jane D."))
        );
    }

    #[test]
    fn test_contact_without_email() {
        let cache = AccessorCache::new();
        let contact = Contact::new(Uuid::nil());
        let descriptor = cache.describe(&contact).unwrap();

        assert!(descriptor.has_field("email"));
        assert_eq!(descriptor.value("email"), None);
    }

    #[test]
    fn test_declared_fields() {
        let cache = AccessorCache::new();
        let map = cache.prepare(&contact()).unwrap();
        assert_eq!(
            map.field_names(),
            vec![
                "company",
                "created",
                "email",
                "emailname",
                "firstname",
                "fullname",
                "id",
                "lastname"
            ]
        );
    }
}
