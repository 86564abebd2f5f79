//! crm-pages - Page Composition for the CRM Marketing Backend
//!
//! Published pages are built from a chain of master pages and one content
//! page, then personalised for a recipient by resolving placeholders.
//!
//! ## Pipeline
//!
//! ```text
//! model objects -> AccessorCache -> Resolver -> PageComposer -> compiled page
//! ```
//!
//! - [`crm_templates`]: field accessors, placeholder scanner, resolver
//! - [`composer`]: master/content merge and interpolation
//! - [`config`]: reserved markers and collaborator settings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crm_pages::{CompositionFlags, CompositionOptions, ComposerConfig};
//! use crm_pages_types::{Page, PortalRef};
//! use uuid::Uuid;
//!
//! let composer = ComposerConfig::default().build_composer().unwrap();
//! let options = CompositionOptions::new(
//!     PortalRef::new(Uuid::new_v4()),
//!     Page::new(Uuid::new_v4(), "/offer").with_html("<p>Hi</p>"),
//! )
//! .with_master(Page::new(Uuid::new_v4(), "/layout").with_html("<div>[[slot]]</div>"))
//! .with_flags(CompositionFlags::MERGE_MASTER_AND_CONTENT);
//!
//! let result = composer.compile(&options).unwrap();
//! assert_eq!(result.compiled_page.html(), "<div><p>Hi</p></div>");
//! ```

pub mod composer;
pub mod config;
pub mod document;
pub mod error;
pub mod models;
pub mod telemetry;

pub use composer::{
    CompositionFlags, CompositionOptions, CompositionResult, PageComposer,
    DEFAULT_CONTENT_PLACEHOLDER,
};
pub use config::{ComposerConfig, ConfigLoader};
pub use document::CompositionDocument;
pub use error::{ComposeError, ConfigError};
pub use models::{Campaign, Contact, EmailAddress, PortalProfile};

// Re-export the interpolation layer for callers that only depend on crm-pages
pub use crm_templates;
