use std::any::{Any, TypeId};

use crate::error::EcsError;

type ErasedBox = Box<dyn Any + Send + Sync>;

/// Capability table for the concrete type held by an [`AnyValue`].
///
/// Captured at construction, where the concrete type and its trait bounds
/// are still known; a value stored without a table cannot be cloned or
/// compared afterwards.
#[derive(Clone, Copy)]
struct ValueOps {
    clone: fn(&(dyn Any + Send + Sync)) -> ErasedBox,
    eq: fn(&(dyn Any + Send + Sync), &(dyn Any + Send + Sync)) -> bool,
}

fn clone_value<T: Clone + Send + Sync + 'static>(value: &(dyn Any + Send + Sync)) -> ErasedBox {
    let value = value
        .downcast_ref::<T>()
        .expect("capability table type mismatch");
    Box::new(value.clone())
}

fn eq_values<T: PartialEq + Send + Sync + 'static>(
    a: &(dyn Any + Send + Sync),
    b: &(dyn Any + Send + Sync),
) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

struct Held {
    value: ErasedBox,
    type_id: TypeId,
    type_name: &'static str,
    ops: Option<ValueOps>,
}

/// A type-safe container for a single value of any type.
///
/// The box remembers the concrete type it was constructed with; extraction
/// must request exactly that type (no widening, no inheritance-style
/// matching). Cloning and equality delegate to the held value and fail with
/// [`EcsError::NotCloneable`] / [`EcsError::NotComparable`] when the value
/// was stored via [`opaque`](AnyValue::opaque).
pub struct AnyValue {
    held: Option<Held>,
}

impl AnyValue {
    /// An empty box holding nothing.
    pub fn empty() -> Self {
        Self { held: None }
    }

    /// Store a value along with its clone and equality capabilities.
    pub fn new<T>(value: T) -> Self
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        Self {
            held: Some(Held {
                value: Box::new(value),
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
                ops: Some(ValueOps {
                    clone: clone_value::<T>,
                    eq: eq_values::<T>,
                }),
            }),
        }
    }

    /// Store a value with no capabilities beyond typed extraction.
    ///
    /// For move-only types such as platform handles. `try_clone` and
    /// `try_eq` on the resulting box report the corresponding error.
    pub fn opaque<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            held: Some(Held {
                value: Box::new(value),
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
                ops: None,
            }),
        }
    }

    /// Whether a value is currently held.
    pub fn has_value(&self) -> bool {
        self.held.is_some()
    }

    /// The type identity of the held value, or `None` if empty.
    pub fn value_type(&self) -> Option<TypeId> {
        self.held.as_ref().map(|h| h.type_id)
    }

    /// The type name of the held value, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.held.as_ref().map_or("<empty>", |h| h.type_name)
    }

    /// Borrow the held value as `T`.
    ///
    /// Fails with [`EcsError::TypeMismatch`] unless `T` is exactly the type
    /// the box was constructed with.
    pub fn downcast_ref<T: 'static>(&self) -> Result<&T, EcsError> {
        let held = self.held.as_ref().ok_or(EcsError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found: "<empty>",
        })?;
        held.value
            .downcast_ref::<T>()
            .ok_or(EcsError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                found: held.type_name,
            })
    }

    /// Borrow the held value mutably as `T`.
    pub fn downcast_mut<T: 'static>(&mut self) -> Result<&mut T, EcsError> {
        let held = self.held.as_mut().ok_or(EcsError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found: "<empty>",
        })?;
        let type_name = held.type_name;
        held.value
            .downcast_mut::<T>()
            .ok_or(EcsError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                found: type_name,
            })
    }

    /// Consume the box and return the held value.
    pub fn into_inner<T: Send + Sync + 'static>(self) -> Result<T, EcsError> {
        let held = self.held.ok_or(EcsError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found: "<empty>",
        })?;
        match held.value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(EcsError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                found: held.type_name,
            }),
        }
    }

    /// Produce an independent box holding a copy of the same value.
    ///
    /// Cloning an empty box yields an empty box.
    pub fn try_clone(&self) -> Result<AnyValue, EcsError> {
        let Some(held) = self.held.as_ref() else {
            return Ok(Self::empty());
        };
        let ops = held.ops.ok_or(EcsError::NotCloneable(held.type_name))?;
        Ok(Self {
            held: Some(Held {
                value: (ops.clone)(held.value.as_ref()),
                type_id: held.type_id,
                type_name: held.type_name,
                ops: Some(ops),
            }),
        })
    }

    /// Compare the held values for equality.
    ///
    /// Type identity is compared first: boxes differing in held type or in
    /// value presence are not equal (two empty boxes are equal). When the
    /// types match, comparison delegates to the held value; a value stored
    /// without equality support surfaces [`EcsError::NotComparable`] rather
    /// than silently comparing unequal.
    pub fn try_eq(&self, other: &AnyValue) -> Result<bool, EcsError> {
        let (a, b) = match (self.held.as_ref(), other.held.as_ref()) {
            (None, None) => return Ok(true),
            (Some(a), Some(b)) => (a, b),
            _ => return Ok(false),
        };
        if a.type_id != b.type_id {
            return Ok(false);
        }
        let ops = a.ops.ok_or(EcsError::NotComparable(a.type_name))?;
        Ok((ops.eq)(a.value.as_ref(), b.value.as_ref()))
    }
}

impl Default for AnyValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyValue")
            .field("type", &self.type_name())
            .finish()
    }
}
