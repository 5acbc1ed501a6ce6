//! Canonical type descriptor handle.
//!
//! `TypeDesc` is the only type representation the matcher sees.
//! Descriptors are handed out by a `TypeRegistry` and compared by index.
//!
//! # Design
//!
//! - 32-bit indices, `Copy`, O(1) equality
//! - Built-in types have fixed indices (0-7) so they can be named without a registry
//! - Dynamic types are numbered from `FIRST_DYNAMIC` in registration order

use std::any::TypeId;
use std::fmt;

use crate::Atom;

/// A 32-bit index into a `TypeRegistry`.
///
/// Two descriptors from the same registry are equal iff they identify the
/// same Rust type. Dynamic descriptors from different registries are not
/// comparable; built-in descriptors mean the same type everywhere.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeDesc(u32);

impl TypeDesc {
    // === Built-in Types (indices 0-7) ===
    // Pre-interned by `TypeRegistry::new` in this exact order.

    /// `i64`.
    pub const INT: Self = Self(0);
    /// `f64`.
    pub const FLOAT: Self = Self(1);
    /// `bool`.
    pub const BOOL: Self = Self(2);
    /// `String`.
    pub const STR: Self = Self(3);
    /// `char`.
    pub const CHAR: Self = Self(4);
    /// `u8`.
    pub const BYTE: Self = Self(5);
    /// `()`.
    pub const UNIT: Self = Self(6);
    /// `Atom`.
    pub const ATOM: Self = Self(7);

    /// Number of pre-interned built-in types.
    pub const BUILTIN_COUNT: u32 = 8;

    /// First index for types registered at runtime.
    pub const FIRST_DYNAMIC: u32 = Self::BUILTIN_COUNT;

    /// Create a descriptor from a raw index.
    ///
    /// The caller must ensure the index is valid in the registry it is used with.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into the registry's info table.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is a pre-interned built-in type.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }

    /// Get the short name for built-in types.
    ///
    /// Returns `None` for dynamic types, whose names live in the registry.
    #[inline]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("int"),
            1 => Some("float"),
            2 => Some("bool"),
            3 => Some("str"),
            4 => Some("char"),
            5 => Some("byte"),
            6 => Some("unit"),
            7 => Some("atom"),
            _ => None,
        }
    }

    /// The Rust type behind a built-in descriptor.
    ///
    /// Returns `None` for dynamic types, whose identity depends on the registry.
    pub fn builtin_rust_id(self) -> Option<TypeId> {
        let id = match self {
            Self::INT => TypeId::of::<i64>(),
            Self::FLOAT => TypeId::of::<f64>(),
            Self::BOOL => TypeId::of::<bool>(),
            Self::STR => TypeId::of::<String>(),
            Self::CHAR => TypeId::of::<char>(),
            Self::BYTE => TypeId::of::<u8>(),
            Self::UNIT => TypeId::of::<()>(),
            Self::ATOM => TypeId::of::<Atom>(),
            _ => return None,
        };
        Some(id)
    }
}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::INT => write!(f, "TypeDesc::INT"),
            Self::FLOAT => write!(f, "TypeDesc::FLOAT"),
            Self::BOOL => write!(f, "TypeDesc::BOOL"),
            Self::STR => write!(f, "TypeDesc::STR"),
            Self::CHAR => write!(f, "TypeDesc::CHAR"),
            Self::BYTE => write!(f, "TypeDesc::BYTE"),
            Self::UNIT => write!(f, "TypeDesc::UNIT"),
            Self::ATOM => write!(f, "TypeDesc::ATOM"),
            _ => write!(f, "TypeDesc({})", self.0),
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "type#{}", self.0),
        }
    }
}

// Compile-time size assertion: TypeDesc must be exactly 4 bytes
const _: () = assert!(std::mem::size_of::<TypeDesc>() == 4);
