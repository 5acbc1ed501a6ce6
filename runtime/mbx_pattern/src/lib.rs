//! mbx Pattern - structural matching of actor messages.
//!
//! This crate provides:
//! - `PatternSlot` / `ExactSlot` / `Literal`, the slot vocabulary
//! - `Pattern` and `PatternBuilder`, compiled reusable patterns
//! - `PatternCursor` and `do_match`, the cursor-level matching primitive
//! - `Bindings`, typed access to the values a match consumed
//!
//! # Matching Model
//!
//! Matching is a predicate: the outcome is match or no-match, never an error.
//! Slots compare by exact type identity (`TypeDesc` equality) and, for
//! literals, by the value type's own `PartialEq`. No conversions happen.
//!
//! On success the matcher yields a position mapping with one absolute tuple
//! index per non-stretch slot, strictly increasing, in pattern order.

mod bindings;
mod cursor;
mod matcher;
mod pattern;
mod slot;

#[cfg(test)]
mod test_helpers;

pub use bindings::Bindings;
pub use cursor::PatternCursor;
pub use matcher::do_match;
pub use pattern::{Pattern, PatternBuilder, PatternDisplay};
pub use slot::{ExactSlot, Literal, PatternSlot};

// The cursor-level API is usually driven together with these.
pub use mbx_tuple::{AnyTuple, Mapping, TupleCursor};
