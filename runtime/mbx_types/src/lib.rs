//! mbx Types - type identity for message matching.
//!
//! This crate provides:
//! - `TypeDesc`, the canonical 32-bit type handle compared by index
//! - `TypeRegistry`, which maps Rust types to descriptors and keeps a
//!   type-erased equality and debug function next to each one
//! - `Atom`, the constant-string tag type used to label messages
//!
//! # Design
//!
//! - Built-in types have fixed descriptors (`TypeDesc::INT`, `TypeDesc::STR`, ...)
//! - Descriptor equality is O(1) and means exact type identity, no coercion
//! - The registry is an explicit object; nothing here is process-global

mod atom;
mod desc;
mod registry;

pub use atom::Atom;
pub use desc::TypeDesc;
pub use registry::{Anything, EqFn, FmtFn, MessageValue, RegistryError, TypeInfo, TypeRegistry};
