//! Compiled patterns.
//!
//! A `Pattern` is built once per declared handler and reused for every
//! incoming message. It is immutable and `Send + Sync`, so one instance can
//! be shared by every actor that dispatches on it.
//!
//! # Construction
//!
//! ```text
//! let pattern = Pattern::builder(&registry)
//!     .value(Atom::new("get"))   // literal: only :get
//!     .of::<i64>()               // any int
//!     .wildcard()                // any single element
//!     .stretch()                 // everything else
//!     .build();
//! ```
//!
//! `of::<Anything>()` is the same as `stretch()`.

use std::any::TypeId;
use std::fmt;

use mbx_tuple::{AnyTuple, Mapping, TupleCursor};
use mbx_types::{MessageValue, TypeDesc, TypeRegistry};

use crate::{do_match, Bindings, ExactSlot, Literal, PatternCursor, PatternSlot};

/// An immutable, positional pattern.
#[derive(Clone, Debug)]
pub struct Pattern {
    slots: Box<[PatternSlot]>,
    /// Number of slots that bind exactly one element.
    arity: usize,
    has_stretch: bool,
}

impl Pattern {
    /// Start building a pattern whose types resolve through `registry`.
    pub fn builder(registry: &TypeRegistry) -> PatternBuilder<'_> {
        PatternBuilder {
            registry,
            slots: Vec::new(),
        }
    }

    /// Create a pattern from slots.
    pub fn new(slots: Vec<PatternSlot>) -> Self {
        let arity = slots.iter().filter(|slot| !slot.is_stretch()).count();
        let has_stretch = arity != slots.len();
        Pattern {
            slots: slots.into_boxed_slice(),
            arity,
            has_stretch,
        }
    }

    /// All slots in order.
    #[inline]
    pub fn slots(&self) -> &[PatternSlot] {
        &self.slots
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the pattern has no slots (it then matches only the empty tuple).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of non-stretch slots.
    ///
    /// This is both the minimum tuple length and the length of a successful
    /// mapping.
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Check if any slot is a `Stretch`.
    #[inline]
    pub fn has_stretch(&self) -> bool {
        self.has_stretch
    }

    /// Per-slot required descriptors; `None` for `Wildcard` and `Stretch`.
    pub fn descriptors(&self) -> impl Iterator<Item = Option<TypeDesc>> + '_ {
        self.slots.iter().map(PatternSlot::descriptor)
    }

    /// Per-slot literals; `Some` only for `Exact` slots carrying one.
    pub fn literals(&self) -> impl Iterator<Item = Option<&Literal>> + '_ {
        self.slots.iter().map(PatternSlot::literal)
    }

    /// A cursor at the first slot.
    pub fn cursor(&self) -> PatternCursor<'_> {
        PatternCursor::new(self)
    }

    /// Check whether an element count can possibly match, without looking at elements.
    #[inline]
    pub fn admits_len(&self, len: usize) -> bool {
        if self.has_stretch {
            len >= self.arity
        } else {
            len == self.arity
        }
    }

    /// Check if `tuple` matches.
    pub fn matches(&self, tuple: &AnyTuple) -> bool {
        self.admits_len(tuple.len()) && do_match(&mut self.cursor(), &mut tuple.cursor())
    }

    /// Match `tuple`, returning the position mapping on success.
    pub fn match_tuple(&self, tuple: &AnyTuple) -> Option<Mapping> {
        let mut mapping = Mapping::new();
        self.match_into(tuple, &mut mapping).then_some(mapping)
    }

    /// Match `tuple`, appending positions to `mapping`.
    ///
    /// On failure `mapping` is restored to its previous length.
    pub fn match_into(&self, tuple: &AnyTuple, mapping: &mut Mapping) -> bool {
        if !self.admits_len(tuple.len()) {
            return false;
        }

        let before = mapping.len();
        let matched = {
            let mut cursor = TupleCursor::new(tuple).recording(mapping);
            do_match(&mut self.cursor(), &mut cursor)
        };
        if !matched {
            mapping.truncate(before);
        }
        debug_assert!(!matched || mapping.len() - before == self.arity);
        matched
    }

    /// Match `tuple` and pair the mapping with it for argument extraction.
    pub fn bind<'t>(&self, tuple: &'t AnyTuple) -> Option<Bindings<'t>> {
        self.match_tuple(tuple)
            .map(|mapping| Bindings::new(tuple, mapping))
    }

    /// Render the pattern as `(:get, int, _, ..)`.
    pub fn display<'a>(&'a self, registry: &'a TypeRegistry) -> PatternDisplay<'a> {
        PatternDisplay {
            pattern: self,
            registry,
        }
    }
}

impl FromIterator<PatternSlot> for Pattern {
    fn from_iter<I: IntoIterator<Item = PatternSlot>>(iter: I) -> Self {
        Pattern::new(iter.into_iter().collect())
    }
}

/// Builder for `Pattern`.
pub struct PatternBuilder<'r> {
    registry: &'r TypeRegistry,
    slots: Vec<PatternSlot>,
}

impl PatternBuilder<'_> {
    /// Append an `Exact` slot matching only `value`.
    #[must_use]
    pub fn value<T: MessageValue>(self, value: T) -> Self {
        let literal = Literal::new(self.registry, value);
        self.slot(ExactSlot::literal(literal).into())
    }

    /// Append an `Exact` slot matching any `T`, or a `Stretch` if `T` is `Anything`.
    #[must_use]
    pub fn of<T: MessageValue>(self) -> Self {
        let slot = match self.registry.resolve_constraint::<T>() {
            Some(ty) => ExactSlot::of_rust_type(ty, TypeId::of::<T>()).into(),
            None => PatternSlot::Stretch,
        };
        self.slot(slot)
    }

    /// Append a `Wildcard` slot.
    #[must_use]
    pub fn wildcard(self) -> Self {
        self.slot(PatternSlot::Wildcard)
    }

    /// Append a `Stretch` slot.
    #[must_use]
    pub fn stretch(self) -> Self {
        self.slot(PatternSlot::Stretch)
    }

    /// Append an arbitrary slot.
    #[must_use]
    pub fn slot(mut self, slot: PatternSlot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Finish the pattern.
    pub fn build(self) -> Pattern {
        Pattern::new(self.slots)
    }
}

/// Registry-aware display adaptor returned by `Pattern::display`.
pub struct PatternDisplay<'a> {
    pattern: &'a Pattern,
    registry: &'a TypeRegistry,
}

impl fmt::Display for PatternDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, slot) in self.pattern.slots().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match slot {
                PatternSlot::Exact(exact) => match exact.literal_value() {
                    Some(literal) => write!(f, "{literal:?}")?,
                    None => f.write_str(self.registry.name(exact.ty()))?,
                },
                PatternSlot::Wildcard => f.write_str("_")?,
                PatternSlot::Stretch => f.write_str("..")?,
            }
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests;
