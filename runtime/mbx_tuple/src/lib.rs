//! mbx Tuple - runtime message tuples.
//!
//! This crate provides:
//! - `AnyTuple`, an immutable heterogeneous tuple of registry-typed values
//! - `ValueRef`, a borrowed handle to one element's value
//! - `TupleCursor`, the forward-only view the matcher consumes, with
//!   optional recording of consumed positions into a `Mapping`
//!
//! Tuples share their storage through `Arc`, so cloning a message to fan it
//! out to several mailboxes never copies the element values.

mod cursor;
mod tuple;
mod value;

pub use cursor::{Checkpoint, Mapping, TupleCursor};
pub use tuple::{AnyTuple, Element, TupleBuilder, TupleDisplay};
pub use value::ValueRef;
