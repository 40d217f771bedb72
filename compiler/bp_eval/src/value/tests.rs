use super::*;
use pretty_assertions::assert_eq;

#[test]
fn truthiness() {
    assert!(!Value::Nil.is_truthy());
    assert!(!Value::Bool(false).is_truthy());
    assert!(Value::Int(0).is_truthy());
    assert!(Value::array(vec![]).is_truthy());
}

#[test]
fn hashes_compare_without_order() {
    let interner = StringInterner::new();
    let a = Value::Sym(interner.intern("a"));
    let b = Value::Sym(interner.intern("b"));
    let left = Value::hash(vec![(a.clone(), Value::Int(1)), (b.clone(), Value::Int(2))]);
    let right = Value::hash(vec![(b, Value::Int(2)), (a, Value::Int(1))]);
    assert!(left.equals(&right));
    assert!(!left.equals(&Value::hash(vec![])));
}

#[test]
fn arrays_compare_elementwise() {
    let one_two = Value::array(vec![Value::Int(1), Value::Int(2)]);
    assert!(one_two.equals(&Value::array(vec![Value::Int(1), Value::Int(2)])));
    assert!(!one_two.equals(&Value::array(vec![Value::Int(1)])));
    assert!(!one_two.equals(&Value::Int(1)));
}

#[test]
fn inspect_formats() {
    let interner = StringInterner::new();
    let a = Value::Sym(interner.intern("a"));
    let value = Value::array(vec![
        Value::Int(1),
        Value::str("x"),
        Value::Nil,
        Value::hash(vec![(a, Value::Int(2)), (Value::Int(3), Value::Bool(true))]),
    ]);
    assert_eq!(value.inspect(&interner), r#"[1, "x", nil, {a: 2, 3 => true}]"#);

    let range = Value::Range {
        start: Some(1),
        end: Some(-2),
        exclusive: false,
    };
    assert_eq!(range.inspect(&interner), "1..-2");
}

#[test]
fn objects_compare_by_identity() {
    let interner = StringInterner::new();
    let make = || {
        Value::object(Object {
            class: interner.intern("Point"),
            sequence: None,
            entries: None,
        })
    };
    let first = make();
    assert!(first.equals(&first.clone()));
    assert!(!first.equals(&make()));
    assert_eq!(first.class_name(&interner), "Point");
    assert_eq!(first.inspect(&interner), "#<Point>");
}
