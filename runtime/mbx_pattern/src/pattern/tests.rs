use std::sync::Arc;

use pretty_assertions::assert_eq;

use mbx_tuple::Mapping;
use mbx_types::{Atom, TypeDesc};

use crate::test_helpers::{mapping, Fixture};
use crate::{Pattern, PatternSlot};

#[test]
fn shape_summary() {
    let fx = Fixture::new();
    let pattern = fx
        .pattern()
        .value(Atom::new("get"))
        .of::<i64>()
        .wildcard()
        .stretch()
        .build();

    assert_eq!(pattern.len(), 4);
    assert_eq!(pattern.arity(), 3);
    assert!(pattern.has_stretch());
    assert!(!pattern.is_empty());
}

#[test]
fn parallel_views() {
    let fx = Fixture::new();
    let pattern = fx
        .pattern()
        .value(3_i64)
        .of::<String>()
        .wildcard()
        .stretch()
        .build();

    let descriptors: Vec<_> = pattern.descriptors().collect();
    assert_eq!(
        descriptors,
        vec![Some(TypeDesc::INT), Some(TypeDesc::STR), None, None]
    );

    let literals: Vec<Option<i64>> = pattern
        .literals()
        .map(|lit| lit.and_then(|l| l.downcast_ref::<i64>().copied()))
        .collect();
    assert_eq!(literals, vec![Some(3), None, None, None]);
}

#[test]
fn length_admission() {
    let fx = Fixture::new();
    let fixed = fx.pattern().wildcard().wildcard().build();
    assert!(fixed.admits_len(2));
    assert!(!fixed.admits_len(1));
    assert!(!fixed.admits_len(3));

    let open = fx.pattern().wildcard().stretch().build();
    assert!(!open.admits_len(0));
    assert!(open.admits_len(1));
    assert!(open.admits_len(10));
}

#[test]
fn documented_examples() {
    let fx = Fixture::new();
    let three_then_any = fx.pattern().value(3_i64).wildcard().build();
    let get_then_rest = fx.pattern().value(Atom::new("get")).stretch().build();
    let two_any = fx.pattern().wildcard().wildcard().build();
    let get_only = fx.pattern().value(Atom::new("get")).build();

    let t1 = fx.tuple().push(3_i64).push("x".to_string()).build();
    let t2 = fx.tuple().push(4_i64).push("x".to_string()).build();
    let t3 = fx
        .tuple()
        .push(Atom::new("get"))
        .push(1_i64)
        .push(2_i64)
        .push(3_i64)
        .build();
    let t4 = fx.tuple().push(1_i64).build();
    let t5 = fx.tuple().push(Atom::new("get")).push(1_i64).build();

    assert_eq!(three_then_any.match_tuple(&t1), Some(mapping(&[0, 1])));
    assert_eq!(three_then_any.match_tuple(&t2), None);
    assert_eq!(get_then_rest.match_tuple(&t3), Some(mapping(&[0])));
    assert_eq!(two_any.match_tuple(&t4), None);
    assert_eq!(get_only.match_tuple(&t5), None);
}

#[test]
fn match_into_appends_and_restores_on_failure() {
    let fx = Fixture::new();
    let pattern = fx.pattern().of::<i64>().build();
    let good = fx.tuple().push(1_i64).build();
    let bad = fx.tuple().push(true).build();

    let mut buffer: Mapping = mapping(&[99]);
    assert!(pattern.match_into(&good, &mut buffer));
    assert_eq!(buffer, mapping(&[99, 0]));

    assert!(!pattern.match_into(&bad, &mut buffer));
    assert_eq!(buffer, mapping(&[99, 0]));
}

#[test]
fn matches_agrees_with_match_tuple() {
    let fx = Fixture::new();
    let pattern = fx.pattern().stretch().of::<bool>().build();
    let yes = fx.tuple().push(1_i64).push(false).build();
    let no = fx.tuple().push(false).push(1_i64).build();

    assert!(pattern.matches(&yes));
    assert!(pattern.match_tuple(&yes).is_some());
    assert!(!pattern.matches(&no));
    assert!(pattern.match_tuple(&no).is_none());
}

#[test]
fn collects_from_slots() {
    let pattern: Pattern = [PatternSlot::Wildcard, PatternSlot::Stretch]
        .into_iter()
        .collect();
    assert_eq!(pattern.arity(), 1);
    assert!(pattern.has_stretch());
}

#[test]
fn display_renders_textual_syntax() {
    let fx = Fixture::new();
    let pattern = fx
        .pattern()
        .value(Atom::new("get"))
        .value(3_i64)
        .value("x".to_string())
        .of::<f64>()
        .wildcard()
        .stretch()
        .build();

    assert_eq!(
        pattern.display(&fx.registry).to_string(),
        "(:get, 3, \"x\", float, _, ..)"
    );
}

#[test]
fn shared_across_threads() {
    let fx = Fixture::new();
    let pattern = Arc::new(fx.pattern().value(Atom::new("ping")).stretch().build());
    let tuple = Arc::new(fx.tuple().push(Atom::new("ping")).push(1_i64).build());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pattern = Arc::clone(&pattern);
            let tuple = Arc::clone(&tuple);
            std::thread::spawn(move || pattern.match_tuple(&tuple))
        })
        .collect();

    for handle in handles {
        let result = handle.join().expect("matcher thread panicked");
        assert_eq!(result, Some(mapping(&[0])));
    }
}

#[test]
#[should_panic(expected = "different registries")]
#[cfg(debug_assertions)]
fn matching_a_tuple_from_another_registry_fails_loudly() {
    #[derive(Debug, PartialEq)]
    struct Ours;
    #[derive(Debug, PartialEq)]
    struct Theirs;

    let ours = Fixture::new();
    let theirs = Fixture::new();
    let pattern = ours.pattern().of::<Ours>().stretch().build();
    let tuple = theirs.tuple().push(Theirs).push(1_i64).build();
    assert_eq!(pattern.descriptors().next().flatten(), Some(tuple.elements()[0].ty()));
    // Matching within one registry is unaffected.
    assert!(pattern.matches(&ours.tuple().push(Ours).build()));

    let _ = pattern.match_tuple(&tuple);
}
