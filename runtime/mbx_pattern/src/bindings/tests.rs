use pretty_assertions::assert_eq;

use mbx_types::{Atom, TypeDesc};

use crate::test_helpers::Fixture;

#[test]
fn binds_values_in_slot_order() {
    let fx = Fixture::new();
    let pattern = fx
        .pattern()
        .value(Atom::new("put"))
        .stretch()
        .of::<String>()
        .of::<i64>()
        .build();
    let tuple = fx
        .tuple()
        .push(Atom::new("put"))
        .push(true)
        .push("key".to_string())
        .push(42_i64)
        .build();

    let bindings = pattern.bind(&tuple).expect("pattern should match");
    assert_eq!(bindings.len(), 3);
    assert_eq!(bindings.mapping(), &[0, 2, 3]);

    assert_eq!(bindings.get::<Atom>(0), Some(&Atom::new("put")));
    assert_eq!(bindings.get::<String>(1).map(String::as_str), Some("key"));
    assert_eq!(bindings.get::<i64>(2), Some(&42));
    assert_eq!(bindings.type_at(2), Some(TypeDesc::INT));

    // Out of range and wrong type are both None
    assert_eq!(bindings.get::<i64>(3), None);
    assert_eq!(bindings.get::<bool>(2), None);
}

#[test]
fn iter_yields_descriptors_and_values() {
    let fx = Fixture::new();
    let pattern = fx.pattern().wildcard().wildcard().build();
    let tuple = fx.tuple().push('a').push(1_u8).build();

    let bindings = pattern.bind(&tuple).expect("pattern should match");
    let types: Vec<TypeDesc> = bindings.iter().map(|(ty, _)| ty).collect();
    assert_eq!(types, vec![TypeDesc::CHAR, TypeDesc::BYTE]);

    let chars: Vec<Option<&char>> = bindings
        .iter()
        .map(|(_, value)| value.downcast_ref::<char>())
        .collect();
    assert_eq!(chars, vec![Some(&'a'), None]);
}

#[test]
fn stretch_only_pattern_binds_nothing() {
    let fx = Fixture::new();
    let pattern = fx.pattern().stretch().build();
    let tuple = fx.tuple().push(1_i64).build();

    let bindings = pattern.bind(&tuple).expect("stretch matches anything");
    assert!(bindings.is_empty());
    assert!(bindings.value(0).is_none());
    assert!(bindings.into_mapping().is_empty());
}

#[test]
fn no_bindings_without_match() {
    let fx = Fixture::new();
    let pattern = fx.pattern().of::<bool>().build();
    let tuple = fx.tuple().push(1_i64).build();
    assert!(pattern.bind(&tuple).is_none());
}
