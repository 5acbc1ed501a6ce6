//! Matched values ready to bind to handler parameters.

use std::any::Any;

use mbx_tuple::{AnyTuple, Mapping, ValueRef};
use mbx_types::TypeDesc;

/// A successful match: the tuple plus the positions its slots consumed.
///
/// Index `i` refers to the `i`-th non-stretch slot of the pattern, which is
/// also the `i`-th handler argument.
#[derive(Clone, Debug)]
pub struct Bindings<'t> {
    tuple: &'t AnyTuple,
    mapping: Mapping,
}

impl<'t> Bindings<'t> {
    pub(crate) fn new(tuple: &'t AnyTuple, mapping: Mapping) -> Self {
        Bindings { tuple, mapping }
    }

    /// Number of bound values.
    #[inline]
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    /// Check if nothing was bound (e.g. a pattern of only stretches).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Tuple position of argument `i`.
    #[inline]
    pub fn position(&self, i: usize) -> Option<usize> {
        self.mapping.get(i).copied()
    }

    /// Descriptor of argument `i`.
    pub fn type_at(&self, i: usize) -> Option<TypeDesc> {
        self.tuple.type_at(self.position(i)?)
    }

    /// Value handle of argument `i`.
    pub fn value(&self, i: usize) -> Option<ValueRef<'t>> {
        self.tuple.value_at(self.position(i)?)
    }

    /// Typed access to argument `i`.
    pub fn get<T: Any>(&self, i: usize) -> Option<&'t T> {
        self.value(i)?.downcast_ref::<T>()
    }

    /// Bound arguments in handler order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeDesc, ValueRef<'t>)> + '_ {
        let elements = self.tuple.elements();
        self.mapping
            .iter()
            .map(move |&pos| (elements[pos].ty(), elements[pos].value()))
    }

    /// The raw position mapping.
    #[inline]
    pub fn mapping(&self) -> &[usize] {
        &self.mapping
    }

    /// Take the position mapping.
    pub fn into_mapping(self) -> Mapping {
        self.mapping
    }
}

#[cfg(test)]
mod tests;
