//! Placeholder Interpolation for CRM Pages and Messages
//!
//! Model objects expose named fields; text refers to them with
//! `{{namespace.field}}` placeholders that are resolved against a property
//! map of namespace → object.
//!
//! Key concepts:
//! - Fields are declared statically per type ([`Fields`]) and turned into a
//!   cached [`AccessorMap`] the first time the type is seen
//! - Unresolvable placeholders become empty text, never errors
//! - `{{#a.<id>}}` emits an action-link token; tokens are bound to the
//!   recipient in a second pass once the whole text is substituted
//!
//! # Example
//!
//! ```ignore
//! let resolver = Resolver::new(Arc::new(UrlActionLinks::new("https://t.example.com")));
//! let props = PropertyMap::new()
//!     .with_object("to", contact)
//!     .with(DEFAULT_RECIPIENT_KEY, PropertyValue::Id(7));
//! let html = resolver.interpolate("Hi {{to.firstname}} <a href=\"{{#a.42}}\">", &props)?;
//! ```

mod accessor;
mod error;
mod links;
mod message;
pub mod placeholder;
mod properties;
mod resolver;
mod value;

pub use accessor::{
    AccessorCache, AccessorMap, Extractor, FieldDeclarations, Fields, Model, ObjectDescriptor,
};
pub use error::TemplateError;
pub use links::{ActionLinkProvider, UrlActionLinks, UNBOUND_RECIPIENT};
pub use message::MessageTemplate;
pub use properties::{PropertyMap, PropertyValue, DEFAULT_RECIPIENT_KEY};
pub use resolver::{Resolver, ResolverConfig, DEFAULT_ACTION_NAMESPACE};
pub use value::FieldValue;
