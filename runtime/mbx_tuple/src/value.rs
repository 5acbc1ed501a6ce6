//! Borrowed value handles.

use std::any::Any;
use std::fmt;

/// Non-owning handle to a tuple element's value.
///
/// The handle is valid for as long as the tuple is borrowed. It carries no
/// type descriptor of its own; pair it with the element's `TypeDesc` (or a
/// `TypeInfo` equality function) to compare it.
#[derive(Clone, Copy)]
pub struct ValueRef<'t>(&'t (dyn Any + Send + Sync));

impl<'t> ValueRef<'t> {
    pub(crate) fn new(value: &'t (dyn Any + Send + Sync)) -> Self {
        ValueRef(value)
    }

    /// The value as `&dyn Any`, for type-erased comparison.
    #[inline]
    pub fn as_any(self) -> &'t dyn Any {
        self.0
    }

    /// Downcast to a concrete type.
    #[inline]
    pub fn downcast_ref<T: Any>(self) -> Option<&'t T> {
        self.0.downcast_ref::<T>()
    }

    /// Check whether the value has concrete type `T`.
    #[inline]
    pub fn is<T: Any>(self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueRef(..)")
    }
}
