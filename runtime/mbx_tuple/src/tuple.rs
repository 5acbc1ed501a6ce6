//! Heterogeneous message tuples.
//!
//! Values are stored type-erased behind `Arc<dyn Any + Send + Sync>` next to
//! the descriptor they were registered under. The only way to build an
//! element is through a `TypeRegistry`, so an element's descriptor always
//! agrees with its value's concrete type.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use mbx_types::{MessageValue, TypeDesc, TypeRegistry};

use crate::{TupleCursor, ValueRef};

/// One tuple element: a descriptor and the value it describes.
#[derive(Clone)]
pub struct Element {
    ty: TypeDesc,
    value: Arc<dyn Any + Send + Sync>,
}

impl Element {
    /// Create an element, resolving `T` through `registry`.
    pub fn new<T: MessageValue>(registry: &TypeRegistry, value: T) -> Self {
        Element {
            ty: registry.resolve::<T>(),
            value: Arc::new(value),
        }
    }

    /// The element's type descriptor.
    #[inline]
    pub fn ty(&self) -> TypeDesc {
        self.ty
    }

    /// Borrow the element's value.
    #[inline]
    pub fn value(&self) -> ValueRef<'_> {
        ValueRef::new(&*self.value)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element").field("ty", &self.ty).finish_non_exhaustive()
    }
}

/// An immutable, cheaply clonable message tuple.
#[derive(Clone)]
pub struct AnyTuple {
    elements: Arc<[Element]>,
}

impl Default for AnyTuple {
    fn default() -> Self {
        AnyTuple::from_elements(Vec::new())
    }
}

impl AnyTuple {
    /// Start building a tuple whose types resolve through `registry`.
    pub fn builder(registry: &TypeRegistry) -> TupleBuilder<'_> {
        TupleBuilder {
            registry,
            elements: Vec::new(),
        }
    }

    /// Create a tuple from already-built elements.
    pub fn from_elements(elements: Vec<Element>) -> Self {
        AnyTuple {
            elements: elements.into(),
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the tuple has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Descriptor of the element at `pos`.
    #[inline]
    pub fn type_at(&self, pos: usize) -> Option<TypeDesc> {
        self.elements.get(pos).map(Element::ty)
    }

    /// Value handle of the element at `pos`.
    #[inline]
    pub fn value_at(&self, pos: usize) -> Option<ValueRef<'_>> {
        self.elements.get(pos).map(Element::value)
    }

    /// Typed access to the element at `pos`.
    ///
    /// Returns `None` if `pos` is out of bounds or the element is not a `T`.
    pub fn get<T: Any>(&self, pos: usize) -> Option<&T> {
        self.value_at(pos)?.downcast_ref::<T>()
    }

    /// All elements in order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Iterate over the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// A cursor positioned at the first element, recording nothing.
    pub fn cursor(&self) -> TupleCursor<'_, '_> {
        TupleCursor::new(self)
    }

    /// Render the tuple as `(3, "x", :get)` using `registry` for value formatting.
    pub fn display<'a>(&'a self, registry: &'a TypeRegistry) -> TupleDisplay<'a> {
        TupleDisplay {
            tuple: self,
            registry,
        }
    }
}

impl fmt::Debug for AnyTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.elements.iter().map(Element::ty))
            .finish()
    }
}

impl<'a> IntoIterator for &'a AnyTuple {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builder for `AnyTuple`.
pub struct TupleBuilder<'r> {
    registry: &'r TypeRegistry,
    elements: Vec<Element>,
}

impl TupleBuilder<'_> {
    /// Append a value.
    #[must_use]
    pub fn push<T: MessageValue>(mut self, value: T) -> Self {
        self.elements.push(Element::new(self.registry, value));
        self
    }

    /// Finish the tuple.
    pub fn build(self) -> AnyTuple {
        AnyTuple::from_elements(self.elements)
    }
}

/// Registry-aware display adaptor returned by `AnyTuple::display`.
pub struct TupleDisplay<'a> {
    tuple: &'a AnyTuple,
    registry: &'a TypeRegistry,
}

impl fmt::Display for TupleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, element) in self.tuple.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match self.registry.info(element.ty) {
                Some(info) => (info.fmt_fn())(element.value().as_any(), f)?,
                None => write!(f, "<{}>", element.ty)?,
            }
        }
        f.write_str(")")
    }
}
