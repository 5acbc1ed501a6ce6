//! Pattern slots and literals.
//!
//! A slot is one position of a compiled pattern. The enum is closed: every
//! consumer matches exhaustively on `Exact`, `Wildcard` and `Stretch`.
//!
//! `ExactSlot` keeps its fields private so a literal can never disagree with
//! the slot's descriptor: a slot built from a literal takes the literal's
//! descriptor.
//!
//! Where the Rust type behind the descriptor is known, the slot also keeps
//! its `TypeId`. Descriptors are plain indices, so a pattern and a tuple built
//! against different registries can agree on a descriptor while meaning
//! different types; `accepts` rejects such elements and debug builds panic.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use mbx_tuple::ValueRef;
use mbx_types::{EqFn, FmtFn, MessageValue, TypeDesc, TypeRegistry};

/// A value an `Exact` slot compares against.
///
/// Carries the type-erased equality and formatting functions of its type,
/// so comparing needs no registry access at match time.
#[derive(Clone)]
pub struct Literal {
    ty: TypeDesc,
    value: Arc<dyn Any + Send + Sync>,
    eq: EqFn,
    fmt: FmtFn,
}

impl Literal {
    /// Create a literal, resolving `T` through `registry`.
    pub fn new<T: MessageValue>(registry: &TypeRegistry, value: T) -> Self {
        let (ty, info) = registry.resolve_info::<T>();
        Literal {
            ty,
            value: Arc::new(value),
            eq: info.eq_fn(),
            fmt: info.fmt_fn(),
        }
    }

    /// Descriptor of the literal's type.
    #[inline]
    pub fn ty(&self) -> TypeDesc {
        self.ty
    }

    /// Compare against an element value under the literal type's equality.
    #[inline]
    pub fn matches(&self, value: ValueRef<'_>) -> bool {
        (self.eq)(&*self.value, value.as_any())
    }

    /// `TypeId` of the literal value.
    #[inline]
    pub fn rust_id(&self) -> TypeId {
        let value: &dyn Any = &*self.value;
        value.type_id()
    }

    /// Typed access to the literal value.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.fmt)(&*self.value, f)
    }
}

/// An `Exact` slot: a required descriptor and an optional literal.
#[derive(Clone, Debug)]
pub struct ExactSlot {
    ty: TypeDesc,
    rust_id: Option<TypeId>,
    literal: Option<Literal>,
}

impl ExactSlot {
    /// Match any value of type `ty`.
    ///
    /// Built-in descriptors are checked against their Rust type; dynamic ones
    /// are compared by index only. Prefer `of_rust_type` for those.
    pub fn of_type(ty: TypeDesc) -> Self {
        ExactSlot {
            ty,
            rust_id: ty.builtin_rust_id(),
            literal: None,
        }
    }

    /// Match any value of type `ty`, which was resolved for the Rust type `rust_id`.
    pub fn of_rust_type(ty: TypeDesc, rust_id: TypeId) -> Self {
        ExactSlot {
            ty,
            rust_id: Some(rust_id),
            literal: None,
        }
    }

    /// Match only values equal to `literal` (and therefore of its type).
    pub fn literal(literal: Literal) -> Self {
        ExactSlot {
            ty: literal.ty(),
            rust_id: Some(literal.rust_id()),
            literal: Some(literal),
        }
    }

    /// Required descriptor.
    #[inline]
    pub fn ty(&self) -> TypeDesc {
        self.ty
    }

    /// The literal, if this slot compares values.
    #[inline]
    pub fn literal_value(&self) -> Option<&Literal> {
        self.literal.as_ref()
    }

    /// Check a tuple element against this slot.
    ///
    /// The type check runs first, so a literal's equality function only ever
    /// sees values of its own type.
    ///
    /// # Panics
    /// In debug builds, if the descriptors agree but the element's Rust type
    /// differs from the slot's, which means the pattern and the tuple were
    /// built against different registries.
    #[inline]
    pub fn accepts(&self, ty: TypeDesc, value: ValueRef<'_>) -> bool {
        if ty != self.ty {
            return false;
        }
        let foreign = self
            .rust_id
            .is_some_and(|id| id != value.as_any().type_id());
        debug_assert!(
            !foreign,
            "descriptor {ty} names another Rust type in this tuple; \
             the pattern and the tuple come from different registries"
        );
        !foreign && self.literal.as_ref().map_or(true, |lit| lit.matches(value))
    }
}

/// One position in a compiled pattern.
#[derive(Clone, Debug)]
pub enum PatternSlot {
    /// Exactly one element of the slot's type, optionally equal to a literal.
    Exact(ExactSlot),
    /// Exactly one element of any type.
    Wildcard,
    /// Zero or more elements of any type; never bound.
    Stretch,
}

impl PatternSlot {
    /// The descriptor this slot requires, `None` for `Wildcard` and `Stretch`.
    #[inline]
    pub fn descriptor(&self) -> Option<TypeDesc> {
        match self {
            PatternSlot::Exact(exact) => Some(exact.ty()),
            PatternSlot::Wildcard | PatternSlot::Stretch => None,
        }
    }

    /// The literal this slot compares against, if any.
    #[inline]
    pub fn literal(&self) -> Option<&Literal> {
        match self {
            PatternSlot::Exact(exact) => exact.literal_value(),
            PatternSlot::Wildcard | PatternSlot::Stretch => None,
        }
    }

    /// Check if this is a `Stretch` slot.
    #[inline]
    pub fn is_stretch(&self) -> bool {
        matches!(self, PatternSlot::Stretch)
    }
}

impl From<ExactSlot> for PatternSlot {
    fn from(exact: ExactSlot) -> Self {
        PatternSlot::Exact(exact)
    }
}
