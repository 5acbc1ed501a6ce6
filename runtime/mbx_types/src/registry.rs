//! Registry mapping Rust types to canonical descriptors.
//!
//! Resolution is O(1) after the first call for a type and safe to perform
//! concurrently. Each descriptor carries a `TypeInfo` holding a type-erased
//! equality function and debug formatter, so literal comparison never needs
//! to know the concrete type.
//!
//! # Thread Safety
//! Uses a single `RwLock`. Lookups of already-registered types only take the
//! read lock; registering a new type double-checks under the write lock.

use std::any::{Any, TypeId};
use std::fmt;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{Atom, TypeDesc};

/// Bound for every value that can travel inside a message tuple.
///
/// Blanket-implemented; callers never implement it by hand.
pub trait MessageValue: Any + PartialEq + fmt::Debug + Send + Sync {}

impl<T: Any + PartialEq + fmt::Debug + Send + Sync> MessageValue for T {}

/// Type-erased equality. Returns `false` if either side is not the registered type.
pub type EqFn = fn(&dyn Any, &dyn Any) -> bool;

/// Type-erased debug formatter.
pub type FmtFn = fn(&dyn Any, &mut fmt::Formatter<'_>) -> fmt::Result;

/// Marker type meaning "any number of elements" when resolved as a constraint.
///
/// `TypeRegistry::resolve_constraint::<Anything>()` returns `None`; pattern
/// builders turn that into a stretch slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Anything;

/// Per-type information stored next to each descriptor.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    name: &'static str,
    rust_id: TypeId,
    eq: EqFn,
    fmt: FmtFn,
}

impl TypeInfo {
    fn of<T: MessageValue>(name: &'static str) -> Self {
        TypeInfo {
            name,
            rust_id: TypeId::of::<T>(),
            eq: erased_eq::<T>,
            fmt: erased_fmt::<T>,
        }
    }

    /// Human-readable type name (`"int"` for built-ins, the Rust path otherwise).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The Rust `TypeId` this descriptor was created for.
    pub fn rust_id(&self) -> TypeId {
        self.rust_id
    }

    /// The type-erased equality function.
    pub fn eq_fn(&self) -> EqFn {
        self.eq
    }

    /// The type-erased debug formatter.
    pub fn fmt_fn(&self) -> FmtFn {
        self.fmt
    }

    /// Compare two erased values under this type's `PartialEq`.
    #[inline]
    pub fn values_equal(&self, a: &dyn Any, b: &dyn Any) -> bool {
        (self.eq)(a, b)
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn erased_eq<T: MessageValue>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn erased_fmt<T: MessageValue>(value: &dyn Any, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value.downcast_ref::<T>() {
        Some(value) => fmt::Debug::fmt(value, f),
        None => f.write_str("<?>"),
    }
}

/// Error when registering a type fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry ran out of 32-bit descriptor indices.
    Overflow { count: usize },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Overflow { count } => write!(
                f,
                "type registry exceeded capacity: {} types, max is {}",
                count,
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

struct RegistryInner {
    /// Rust type -> descriptor.
    by_rust_id: FxHashMap<TypeId, TypeDesc>,
    /// Descriptor index -> info.
    infos: Vec<TypeInfo>,
}

impl RegistryInner {
    fn insert(&mut self, info: TypeInfo) -> Result<TypeDesc, RegistryError> {
        let raw = u32::try_from(self.infos.len()).map_err(|_| RegistryError::Overflow {
            count: self.infos.len(),
        })?;
        let desc = TypeDesc::from_raw(raw);
        self.infos.push(info);
        self.by_rust_id.insert(info.rust_id, desc);
        Ok(desc)
    }
}

/// Registry of message value types.
///
/// Create one per runtime (or per test) and pass it to tuple and pattern
/// builders. Descriptors are only meaningful within the registry that
/// produced them.
pub struct TypeRegistry {
    inner: RwLock<RegistryInner>,
}

impl TypeRegistry {
    /// Create a registry with the built-in types pre-interned.
    pub fn new() -> Self {
        let builtins = [
            (TypeDesc::INT, TypeInfo::of::<i64>("int")),
            (TypeDesc::FLOAT, TypeInfo::of::<f64>("float")),
            (TypeDesc::BOOL, TypeInfo::of::<bool>("bool")),
            (TypeDesc::STR, TypeInfo::of::<String>("str")),
            (TypeDesc::CHAR, TypeInfo::of::<char>("char")),
            (TypeDesc::BYTE, TypeInfo::of::<u8>("byte")),
            (TypeDesc::UNIT, TypeInfo::of::<()>("unit")),
            (TypeDesc::ATOM, TypeInfo::of::<Atom>("atom")),
        ];

        let mut inner = RegistryInner {
            by_rust_id: FxHashMap::default(),
            infos: Vec::with_capacity(64),
        };
        for (expected, info) in builtins {
            // Eight entries cannot overflow a u32 index.
            let desc = inner
                .insert(info)
                .unwrap_or_else(|e| unreachable!("{e}"));
            debug_assert_eq!(desc, expected);
        }

        TypeRegistry {
            inner: RwLock::new(inner),
        }
    }

    /// Try to resolve `T` to its descriptor, registering it on first use.
    pub fn try_resolve<T: MessageValue>(&self) -> Result<TypeDesc, RegistryError> {
        self.try_resolve_info::<T>().map(|(desc, _)| desc)
    }

    /// Like `try_resolve`, also returning the descriptor's `TypeInfo`.
    pub fn try_resolve_info<T: MessageValue>(&self) -> Result<(TypeDesc, TypeInfo), RegistryError> {
        let rust_id = TypeId::of::<T>();

        // Fast path: already registered
        {
            let guard = self.inner.read();
            if let Some(&desc) = guard.by_rust_id.get(&rust_id) {
                return Ok((desc, guard.infos[desc.index()]));
            }
        }

        // Slow path: need to insert
        let mut guard = self.inner.write();

        // Double-check after acquiring write lock
        if let Some(&desc) = guard.by_rust_id.get(&rust_id) {
            return Ok((desc, guard.infos[desc.index()]));
        }

        let info = TypeInfo::of::<T>(std::any::type_name::<T>());
        let desc = guard.insert(info)?;
        tracing::debug!(?desc, name = info.name, "registered message type");
        Ok((desc, info))
    }

    /// Resolve `T` to its descriptor, registering it on first use.
    ///
    /// # Panics
    /// Panics if the registry exceeds `u32` capacity. Use `try_resolve` for
    /// fallible resolution.
    #[inline]
    pub fn resolve<T: MessageValue>(&self) -> TypeDesc {
        self.try_resolve::<T>().unwrap_or_else(|e| panic!("{}", e))
    }

    /// Resolve `T` together with its `TypeInfo`.
    ///
    /// # Panics
    /// Panics if the registry exceeds `u32` capacity.
    #[inline]
    pub fn resolve_info<T: MessageValue>(&self) -> (TypeDesc, TypeInfo) {
        self.try_resolve_info::<T>().unwrap_or_else(|e| panic!("{}", e))
    }

    /// Resolve `T` as a slot constraint.
    ///
    /// Returns `None` for the `Anything` marker, which constrains nothing.
    pub fn resolve_constraint<T: MessageValue>(&self) -> Option<TypeDesc> {
        if TypeId::of::<T>() == TypeId::of::<Anything>() {
            None
        } else {
            Some(self.resolve::<T>())
        }
    }

    /// Look up a Rust type without registering it.
    pub fn lookup(&self, rust_id: TypeId) -> Option<TypeDesc> {
        self.inner.read().by_rust_id.get(&rust_id).copied()
    }

    /// Get the info for a descriptor, if it belongs to this registry.
    pub fn info(&self, desc: TypeDesc) -> Option<TypeInfo> {
        self.inner.read().infos.get(desc.index()).copied()
    }

    /// Get the display name for a descriptor.
    ///
    /// Falls back to `"<unknown>"` for descriptors this registry never issued.
    pub fn name(&self, desc: TypeDesc) -> &'static str {
        self.info(desc).map_or("<unknown>", |info| info.name)
    }

    /// Number of registered types, built-ins included.
    pub fn len(&self) -> usize {
        self.inner.read().infos.len()
    }

    /// Always false: built-ins are registered at construction.
    pub fn is_empty(&self) -> bool {
        self.inner.read().infos.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("len", &self.len())
            .finish()
    }
}
