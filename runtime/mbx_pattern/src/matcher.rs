//! Lock-step matching of a pattern cursor against a tuple cursor.
//!
//! # Algorithm
//!
//! The slots between stretches form *runs*, each consuming a fixed number of
//! elements. Slots are consumed left to right:
//!
//! - `Exact` and `Wildcard` consume exactly one element, recording its position.
//! - A trailing `Stretch` absorbs whatever is left.
//! - A `Stretch` followed by another stretch later on places the run between
//!   them at the leftmost offset where it matches, and commits to it. The
//!   later stretch can absorb anything the earlier one skipped, so a later
//!   failure is never fixed by widening an earlier stretch.
//! - The last `Stretch` with slots after it has exactly one possible width:
//!   the rest must end the tuple.
//!
//! Adjacent stretches collapse into one. Each run is tried at most once per
//! tuple offset, so an attempt costs at most pattern length × tuple length
//! slot checks, and the result equals the leftmost-first backtracking
//! assignment.

use mbx_tuple::TupleCursor;

use crate::{PatternCursor, PatternSlot};

/// Match `pattern` against `tuple`, advancing both cursors.
///
/// Returns `true` iff the remaining slots match the remaining elements. On
/// success, the tuple cursor has recorded one absolute position per
/// non-stretch slot, in pattern order. On failure, the cursors' positions and
/// the recorded positions are unspecified; build fresh cursors for another
/// attempt.
#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(slots = pattern.rest().len(), elements = tuple.remaining())
)]
pub fn do_match(pattern: &mut PatternCursor<'_>, tuple: &mut TupleCursor<'_, '_>) -> bool {
    let matched = match_slots(pattern, tuple);
    tracing::trace!(matched, "match finished");
    matched
}

fn match_slots(pattern: &mut PatternCursor<'_>, tuple: &mut TupleCursor<'_, '_>) -> bool {
    if !match_run(pattern, tuple) {
        return false;
    }
    if pattern.at_end() {
        tuple.at_end()
    } else {
        match_stretch(pattern, tuple)
    }
}

/// Match one-element slots up to the next `Stretch` or the end of the pattern.
fn match_run(pattern: &mut PatternCursor<'_>, tuple: &mut TupleCursor<'_, '_>) -> bool {
    while let Some(slot) = pattern.current() {
        let accepted = match slot {
            PatternSlot::Exact(exact) => {
                !tuple.at_end() && exact.accepts(tuple.current_type(), tuple.current_value())
            }
            PatternSlot::Wildcard => !tuple.at_end(),
            PatternSlot::Stretch => return true,
        };
        if !accepted {
            return false;
        }
        tuple.record_position();
        tuple.advance();
        pattern.advance();
    }
    true
}

/// Match starting at a `Stretch` slot.
fn match_stretch(pattern: &mut PatternCursor<'_>, tuple: &mut TupleCursor<'_, '_>) -> bool {
    loop {
        while pattern.current().is_some_and(PatternSlot::is_stretch) {
            pattern.advance();
        }

        if pattern.at_end() {
            tuple.skip_to_end();
            return true;
        }

        let Some(max_width) = tuple.remaining().checked_sub(pattern.fixed_remaining()) else {
            return false;
        };

        if !pattern.stretch_remaining() {
            for _ in 0..max_width {
                tuple.advance();
            }
            return match_run(pattern, tuple) && tuple.at_end();
        }

        if !place_run(pattern, tuple, max_width) {
            return false;
        }
    }
}

/// Place the run after a stretch at the smallest width in `0..=max_width` where it matches.
///
/// On success both cursors sit just past the run, at the next stretch.
fn place_run(
    pattern: &mut PatternCursor<'_>,
    tuple: &mut TupleCursor<'_, '_>,
    max_width: usize,
) -> bool {
    for width in 0..=max_width {
        let before = tuple.checkpoint();
        let mut run = pattern.clone();
        if match_run(&mut run, tuple) {
            tracing::trace!(width, "stretch placed");
            *pattern = run;
            return true;
        }
        tuple.rewind(before);
        if width < max_width {
            tuple.advance();
        }
    }
    tracing::trace!(max_width, "no placement for run");
    false
}
