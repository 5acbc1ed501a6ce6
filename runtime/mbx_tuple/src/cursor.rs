//! Forward-only cursor over a message tuple.
//!
//! The cursor yields (descriptor, value) pairs in order and can record the
//! absolute position of elements it is told to keep. Recording goes into a
//! caller-supplied `Mapping`; without one, `record_position` is a no-op.
//!
//! # Backtracking
//!
//! `checkpoint` and `rewind` let a matcher try an alternative and undo both
//! the position and any positions it recorded meanwhile. Rewinding never
//! moves the cursor past where it was when the checkpoint was taken.

use smallvec::SmallVec;

use mbx_types::TypeDesc;

use crate::{AnyTuple, ValueRef};

/// Absolute tuple positions consumed by non-stretch pattern slots, in pattern order.
///
/// Eight inline entries cover the usual handler arities without allocating.
pub type Mapping = SmallVec<[usize; 8]>;

/// Saved cursor state for `TupleCursor::rewind`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    pos: usize,
    recorded: usize,
}

/// Forward cursor over an `AnyTuple`.
///
/// `'t` borrows the tuple, `'m` borrows the optional mapping collector.
pub struct TupleCursor<'t, 'm> {
    tuple: &'t AnyTuple,
    pos: usize,
    mapping: Option<&'m mut Mapping>,
}

impl<'t, 'm> TupleCursor<'t, 'm> {
    /// A cursor at the first element, recording nothing.
    pub fn new(tuple: &'t AnyTuple) -> Self {
        Self::starting_at(tuple, 0)
    }

    /// A cursor at absolute position `pos`.
    ///
    /// Recorded positions stay absolute, so a mapping produced from an offset
    /// cursor indexes the original tuple directly.
    pub fn starting_at(tuple: &'t AnyTuple, pos: usize) -> Self {
        debug_assert!(
            pos <= tuple.len(),
            "cursor start {pos} is past the end of a {}-element tuple",
            tuple.len()
        );
        TupleCursor {
            tuple,
            pos,
            mapping: None,
        }
    }

    /// Record consumed positions into `mapping` from now on.
    pub fn recording<'n>(self, mapping: &'n mut Mapping) -> TupleCursor<'t, 'n> {
        TupleCursor {
            tuple: self.tuple,
            pos: self.pos,
            mapping: Some(mapping),
        }
    }

    /// True when no elements remain.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.tuple.len()
    }

    /// Move to the next element.
    ///
    /// Advancing an exhausted cursor is a caller bug.
    #[inline]
    pub fn advance(&mut self) {
        debug_assert!(!self.at_end(), "advanced a tuple cursor past the end");
        self.pos += 1;
    }

    /// Move past every remaining element.
    #[inline]
    pub fn skip_to_end(&mut self) {
        self.pos = self.pos.max(self.tuple.len());
    }

    /// Absolute position of the current element.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of elements not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.tuple.len().saturating_sub(self.pos)
    }

    /// Descriptor of the current element.
    ///
    /// # Panics
    /// Panics if the cursor is at the end.
    #[inline]
    pub fn current_type(&self) -> TypeDesc {
        debug_assert!(!self.at_end(), "read the type of an exhausted tuple cursor");
        self.tuple.elements()[self.pos].ty()
    }

    /// Value handle of the current element.
    ///
    /// # Panics
    /// Panics if the cursor is at the end.
    #[inline]
    pub fn current_value(&self) -> ValueRef<'t> {
        debug_assert!(!self.at_end(), "read the value of an exhausted tuple cursor");
        self.tuple.elements()[self.pos].value()
    }

    /// Append the current absolute position to the mapping, if recording.
    #[inline]
    pub fn record_position(&mut self) {
        if let Some(mapping) = self.mapping.as_deref_mut() {
            mapping.push(self.pos);
        }
    }

    /// Save the current position and mapping length.
    #[inline]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            recorded: self.mapping.as_deref().map_or(0, Mapping::len),
        }
    }

    /// Restore a checkpoint, dropping positions recorded after it.
    #[inline]
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        if let Some(mapping) = self.mapping.as_deref_mut() {
            mapping.truncate(checkpoint.recorded);
        }
    }
}
