use std::any::TypeId;
use std::collections::HashMap;

use crate::any::AnyValue;

/// Type-map storage for singleton resources.
///
/// At most one value per type, owned by the enclosing world. Resources are
/// stored opaquely; nothing here requires them to be cloneable or
/// comparable, which keeps move-only platform handles valid resources.
pub(crate) struct Resources {
    map: HashMap<TypeId, AnyValue>,
}

impl Resources {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Insert a resource, replacing any previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.map.insert(TypeId::of::<T>(), AnyValue::opaque(value));
    }

    /// Get an immutable reference to a resource.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref().ok())
    }

    /// Get a mutable reference to a resource.
    pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut().ok())
    }

    /// Remove a resource, returning it if it existed.
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.into_inner().ok())
    }

    /// Check whether a resource of this type exists.
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::new()
    }
}
