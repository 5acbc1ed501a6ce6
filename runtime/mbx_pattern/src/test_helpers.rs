//! Test helpers for matcher unit testing.
//!
//! Provides a registry fixture and a small closed set of sample values so
//! property tests can generate tuples and patterns over the same types.

use mbx_tuple::{AnyTuple, Mapping, TupleBuilder};
use mbx_types::{Atom, TypeRegistry};

use crate::{Pattern, PatternBuilder, PatternSlot};

/// Owns a registry and hands out builders bound to it.
pub struct Fixture {
    pub registry: TypeRegistry,
}

impl Fixture {
    pub fn new() -> Self {
        Fixture {
            registry: TypeRegistry::new(),
        }
    }

    pub fn pattern(&self) -> PatternBuilder<'_> {
        Pattern::builder(&self.registry)
    }

    pub fn tuple(&self) -> TupleBuilder<'_> {
        AnyTuple::builder(&self.registry)
    }

    /// Build a tuple from sample values.
    pub fn tuple_of(&self, samples: &[Sample]) -> AnyTuple {
        samples
            .iter()
            .fold(self.tuple(), |b, sample| sample.push_onto(b))
            .build()
    }
}

/// Build a `Mapping` from a slice, for comparisons.
pub fn mapping(positions: &[usize]) -> Mapping {
    positions.iter().copied().collect()
}

/// A value of one of a few message types.
#[derive(Clone, Debug, PartialEq)]
pub enum Sample {
    Int(i64),
    Str(&'static str),
    Tag(&'static str),
}

impl Sample {
    pub fn push_onto<'r>(&self, builder: TupleBuilder<'r>) -> TupleBuilder<'r> {
        match self {
            Sample::Int(n) => builder.push(*n),
            Sample::Str(s) => builder.push((*s).to_string()),
            Sample::Tag(s) => builder.push(Atom::new(*s)),
        }
    }

    /// A literal slot matching exactly this sample.
    pub fn literal_slot(&self, fixture: &Fixture) -> PatternSlot {
        let builder = match self {
            Sample::Int(n) => fixture.pattern().value(*n),
            Sample::Str(s) => fixture.pattern().value((*s).to_string()),
            Sample::Tag(s) => fixture.pattern().value(Atom::new(*s)),
        };
        builder.build().slots()[0].clone()
    }

    /// A type-only slot matching any value of this sample's type.
    pub fn type_slot(&self, fixture: &Fixture) -> PatternSlot {
        let builder = match self {
            Sample::Int(_) => fixture.pattern().of::<i64>(),
            Sample::Str(_) => fixture.pattern().of::<String>(),
            Sample::Tag(_) => fixture.pattern().of::<Atom>(),
        };
        builder.build().slots()[0].clone()
    }
}

pub mod strategies {
    use proptest::prelude::*;

    use super::Sample;

    pub fn sample() -> impl Strategy<Value = Sample> {
        prop_oneof![
            (-3_i64..3).prop_map(Sample::Int),
            prop_oneof![Just("a"), Just("b")].prop_map(Sample::Str),
            prop_oneof![Just("get"), Just("put")].prop_map(Sample::Tag),
        ]
    }

    pub fn samples(max_len: usize) -> impl Strategy<Value = Vec<Sample>> {
        proptest::collection::vec(sample(), 0..=max_len)
    }
}
