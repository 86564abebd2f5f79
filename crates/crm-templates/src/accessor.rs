//! Field Accessors
//!
//! Model types declare, once, which of their fields may be substituted into
//! text. The first time a value of a type is seen the declarations are turned
//! into an [`AccessorMap`] and cached for the lifetime of the
//! [`AccessorCache`]; every later resolution of that type shares the map.
//!
//! ```ignore
//! impl Fields for Contact {
//!     fn declare(fields: &mut FieldDeclarations<Self>) {
//!         fields
//!             .field("firstname", |c| Some(c.first_name.clone()))
//!             .nested("email", |c| c.email.as_ref(), |e| Some(e.address.clone()));
//!     }
//! }
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::error::TemplateError;
use crate::value::FieldValue;

/// Type-erased extractor: `None` when the instance is not the declaring type
/// or the declared property is unset
pub type Extractor = Arc<dyn Fn(&dyn Any) -> Option<FieldValue> + Send + Sync>;

// ============================================================================
// DECLARATIONS
// ============================================================================

/// Static field registration for a model type
pub trait Fields: Any + Send + Sync + Sized {
    /// Declare the fields this type exposes to placeholders
    fn declare(fields: &mut FieldDeclarations<Self>);
}

/// Builder handed to [`Fields::declare`]
pub struct FieldDeclarations<T> {
    entries: Vec<(String, Extractor)>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Fields> FieldDeclarations<T> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Expose a property directly under `name`
    pub fn field<F, V>(&mut self, name: &str, get: F) -> &mut Self
    where
        F: Fn(&T) -> Option<V> + Send + Sync + 'static,
        V: Into<FieldValue>,
    {
        let extractor: Extractor = Arc::new(move |instance: &dyn Any| -> Option<FieldValue> {
            instance
                .downcast_ref::<T>()
                .and_then(|t| get(t))
                .map(Into::into)
        });
        self.entries.push((name.to_string(), extractor));
        self
    }

    /// Expose a sub-property of a nested object under `name`
    ///
    /// Yields `None` when the root object is unset.
    pub fn nested<R, U, S, V>(&mut self, name: &str, root: R, sub: S) -> &mut Self
    where
        R: Fn(&T) -> Option<&U> + Send + Sync + 'static,
        U: 'static,
        S: Fn(&U) -> Option<V> + Send + Sync + 'static,
        V: Into<FieldValue>,
    {
        let extractor: Extractor = Arc::new(move |instance: &dyn Any| -> Option<FieldValue> {
            let owner = instance.downcast_ref::<T>()?;
            let nested = root(owner)?;
            sub(nested).map(Into::into)
        });
        self.entries.push((name.to_string(), extractor));
        self
    }
}

// ============================================================================
// MODEL
// ============================================================================

/// Object-safe view of any [`Fields`] type
///
/// Implemented for every `Fields` type; property maps hold `Arc<dyn Model>`.
pub trait Model: Any + Send + Sync {
    /// Runtime type of the instance, the cache key
    fn model_type(&self) -> TypeId;

    fn type_name(&self) -> &'static str;

    /// Build a fresh accessor map for this instance's type
    fn build_accessors(&self) -> AccessorMap;

    fn as_any(&self) -> &dyn Any;
}

impl<T: Fields> Model for T {
    fn model_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn build_accessors(&self) -> AccessorMap {
        AccessorMap::build::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// ACCESSOR MAP
// ============================================================================

/// Field name → extractor for one model type. Immutable once built.
pub struct AccessorMap {
    type_name: &'static str,
    accessors: HashMap<String, Extractor>,
}

impl AccessorMap {
    /// Run `T`'s declarations and index them by lower-cased field name
    ///
    /// A later declaration of the same name replaces an earlier one.
    pub fn build<T: Fields>() -> Self {
        let type_name = std::any::type_name::<T>();
        let mut declarations = FieldDeclarations::<T>::new();
        T::declare(&mut declarations);

        let mut accessors = HashMap::with_capacity(declarations.entries.len());
        for (name, extractor) in declarations.entries {
            if accessors.insert(name.to_lowercase(), extractor).is_some() {
                warn!(
                    "Duplicate field declaration '{}' on {}; last declaration wins",
                    name, type_name
                );
            }
        }

        debug!("Built accessor map for {} ({} fields)", type_name, accessors.len());

        Self {
            type_name,
            accessors,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    /// Case-insensitive field lookup
    pub fn get(&self, field: &str) -> Option<&Extractor> {
        self.accessors.get(&field.to_lowercase())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Declared field names, lower-cased, sorted
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.accessors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for AccessorMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessorMap")
            .field("type_name", &self.type_name)
            .field("fields", &self.field_names())
            .finish()
    }
}

// ============================================================================
// OBJECT DESCRIPTOR
// ============================================================================

/// One model instance paired with its type's accessor map
pub struct ObjectDescriptor<'a> {
    instance: &'a dyn Model,
    accessors: Arc<AccessorMap>,
}

impl<'a> ObjectDescriptor<'a> {
    pub fn new(instance: &'a dyn Model, accessors: Arc<AccessorMap>) -> Self {
        Self {
            instance,
            accessors,
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.accessors.contains(field)
    }

    /// Extract `field`; `None` for an undeclared field or an unset value
    pub fn value(&self, field: &str) -> Option<FieldValue> {
        let extractor = self.accessors.get(field)?;
        extractor(self.instance.as_any())
    }

    pub fn accessors(&self) -> &Arc<AccessorMap> {
        &self.accessors
    }
}

// ============================================================================
// CACHE
// ============================================================================

/// Process-lifetime cache of accessor maps keyed by runtime type
///
/// Lookups of known types take the shared read lock only. A new type takes
/// the write lock, re-checks, then builds, so each type is built exactly once
/// and every caller observes the same `Arc<AccessorMap>`.
pub struct AccessorCache {
    maps: RwLock<HashMap<TypeId, Arc<AccessorMap>>>,
    disposed: AtomicBool,
}

impl AccessorCache {
    pub fn new() -> Self {
        Self {
            maps: RwLock::new(HashMap::new()),
            disposed: AtomicBool::new(false),
        }
    }

    /// Ensure `instance`'s type has an accessor map and return it
    pub fn prepare(&self, instance: &dyn Model) -> Result<Arc<AccessorMap>, TemplateError> {
        self.ensure_live()?;
        let type_id = instance.model_type();

        {
            let maps = self
                .maps
                .read()
                .map_err(|e| TemplateError::LockPoisoned(e.to_string()))?;
            if let Some(map) = maps.get(&type_id) {
                return Ok(Arc::clone(map));
            }
        }

        let mut maps = self
            .maps
            .write()
            .map_err(|e| TemplateError::LockPoisoned(e.to_string()))?;

        // Another writer may have built it while we waited for the lock
        if let Some(map) = maps.get(&type_id) {
            return Ok(Arc::clone(map));
        }

        let map = Arc::new(instance.build_accessors());
        maps.insert(type_id, Arc::clone(&map));
        Ok(map)
    }

    /// Previously prepared map for `type_id`, if any
    pub fn get(&self, type_id: TypeId) -> Result<Option<Arc<AccessorMap>>, TemplateError> {
        self.ensure_live()?;
        let maps = self
            .maps
            .read()
            .map_err(|e| TemplateError::LockPoisoned(e.to_string()))?;
        Ok(maps.get(&type_id).cloned())
    }

    pub fn get_of<T: Fields>(&self) -> Result<Option<Arc<AccessorMap>>, TemplateError> {
        self.get(TypeId::of::<T>())
    }

    /// Prepare `instance` and pair it with its map
    pub fn describe<'a>(
        &self,
        instance: &'a dyn Model,
    ) -> Result<ObjectDescriptor<'a>, TemplateError> {
        let accessors = self.prepare(instance)?;
        Ok(ObjectDescriptor::new(instance, accessors))
    }

    /// Number of types with a cached map
    pub fn len(&self) -> usize {
        self.maps
            .read()
            .map(|maps| maps.len())
            .unwrap_or_else(|e| e.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached map; all later calls fail with `Disposed`
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut maps = self.maps.write().unwrap_or_else(PoisonError::into_inner);
        debug!("Disposing accessor cache ({} types)", maps.len());
        maps.clear();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn ensure_live(&self) -> Result<(), TemplateError> {
        if self.is_disposed() {
            Err(TemplateError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl Default for AccessorCache {
    fn default() -> Self {
        Self::new()
    }
}
