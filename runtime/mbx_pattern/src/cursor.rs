//! Forward cursor over a compiled pattern's slots.
//!
//! Cloning a cursor is cheap (a slice reference and an index) and is how the
//! matcher explores an alternative without losing its place.

use crate::{Pattern, PatternSlot};

/// Position within a pattern's slot sequence.
#[derive(Clone, Debug)]
pub struct PatternCursor<'p> {
    slots: &'p [PatternSlot],
    pos: usize,
}

impl<'p> PatternCursor<'p> {
    /// A cursor at the first slot of `pattern`.
    pub fn new(pattern: &'p Pattern) -> Self {
        Self::over(pattern.slots())
    }

    /// A cursor over a bare slot slice.
    pub fn over(slots: &'p [PatternSlot]) -> Self {
        PatternCursor { slots, pos: 0 }
    }

    /// True when every slot has been consumed.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.slots.len()
    }

    /// The current slot, or `None` at the end.
    #[inline]
    pub fn current(&self) -> Option<&'p PatternSlot> {
        self.slots.get(self.pos)
    }

    /// Move to the next slot.
    #[inline]
    pub fn advance(&mut self) {
        debug_assert!(!self.at_end(), "advanced a pattern cursor past the end");
        self.pos += 1;
    }

    /// Index of the current slot.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Slots not yet consumed.
    #[inline]
    pub fn rest(&self) -> &'p [PatternSlot] {
        self.slots.get(self.pos..).unwrap_or_default()
    }

    /// Number of unconsumed slots that take exactly one element.
    pub fn fixed_remaining(&self) -> usize {
        self.rest().iter().filter(|slot| !slot.is_stretch()).count()
    }

    /// Check if any unconsumed slot is a `Stretch`.
    pub fn stretch_remaining(&self) -> bool {
        self.rest().iter().any(PatternSlot::is_stretch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_slots_and_counts_rest() {
        let slots = [
            PatternSlot::Wildcard,
            PatternSlot::Stretch,
            PatternSlot::Wildcard,
        ];
        let mut cursor = PatternCursor::over(&slots);
        assert_eq!(cursor.fixed_remaining(), 2);
        assert!(cursor.stretch_remaining());

        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.fixed_remaining(), 1);
        assert!(!cursor.stretch_remaining());

        cursor.advance();
        assert!(cursor.at_end());
        assert!(cursor.current().is_none());
        assert!(cursor.rest().is_empty());
    }

    #[test]
    fn clones_are_independent() {
        let slots = [PatternSlot::Wildcard, PatternSlot::Wildcard];
        let mut cursor = PatternCursor::over(&slots);
        let saved = cursor.clone();
        cursor.advance();
        assert_eq!(saved.position(), 0);
        assert_eq!(cursor.position(), 1);
    }
}
