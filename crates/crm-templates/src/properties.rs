//! Property maps: namespace → model object for one interpolation call

use std::collections::HashMap;
use std::sync::Arc;

use crate::accessor::Model;

/// Default reserved key carrying the current recipient id
pub const DEFAULT_RECIPIENT_KEY: &str = "__recipient_id";

/// Value bound to a namespace
#[derive(Clone)]
pub enum PropertyValue {
    Null,
    Object(Arc<dyn Model>),
    Id(i64),
}

impl PropertyValue {
    pub fn object<T: Model>(value: T) -> Self {
        PropertyValue::Object(Arc::new(value))
    }

    pub fn as_model(&self) -> Option<&dyn Model> {
        match self {
            PropertyValue::Object(model) => Some(model.as_ref()),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<i64> {
        match self {
            PropertyValue::Id(id) => Some(*id),
            _ => None,
        }
    }
}

impl std::fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Null => f.write_str("Null"),
            PropertyValue::Object(model) => write!(f, "Object({})", model.type_name()),
            PropertyValue::Id(id) => write!(f, "Id({})", id),
        }
    }
}

/// Namespace → value, matched case-insensitively
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    entries: HashMap<String, PropertyValue>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `namespace`, replacing any previous value
    pub fn insert(&mut self, namespace: impl AsRef<str>, value: PropertyValue) {
        self.entries
            .insert(namespace.as_ref().to_lowercase(), value);
    }

    /// Bind a model object under `namespace`
    pub fn insert_object<T: Model>(&mut self, namespace: impl AsRef<str>, value: T) {
        self.insert(namespace, PropertyValue::object(value));
    }

    /// Builder form of [`PropertyMap::insert`]
    pub fn with(mut self, namespace: impl AsRef<str>, value: PropertyValue) -> Self {
        self.insert(namespace, value);
        self
    }

    pub fn with_object<T: Model>(self, namespace: impl AsRef<str>, value: T) -> Self {
        self.with(namespace, PropertyValue::object(value))
    }

    /// Bind the current recipient id under the reserved `key`
    /// (usually [`DEFAULT_RECIPIENT_KEY`])
    pub fn with_recipient(self, key: impl AsRef<str>, recipient_id: i64) -> Self {
        self.with(key, PropertyValue::Id(recipient_id))
    }

    pub fn get(&self, namespace: &str) -> Option<&PropertyValue> {
        self.entries.get(&namespace.to_lowercase())
    }

    /// Model bound to `namespace`, if it is an object
    pub fn model(&self, namespace: &str) -> Option<&dyn Model> {
        self.get(namespace).and_then(PropertyValue::as_model)
    }

    /// Id bound to `key`, if it is an id
    pub fn id(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(PropertyValue::as_id)
    }

    /// Every bound model object
    pub fn models(&self) -> impl Iterator<Item = &dyn Model> {
        self.entries.values().filter_map(PropertyValue::as_model)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
