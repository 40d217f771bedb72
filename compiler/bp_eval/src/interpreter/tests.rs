#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use bp_ir::{AstBuilder, Span};
use pretty_assertions::assert_eq;

fn eval_with(build: impl FnOnce(&mut AstBuilder<'_>) -> ExprId) -> (EvalResult, StringInterner) {
    let interner = StringInterner::new();
    let mut arena = ExprArena::new();
    let root = build(&mut AstBuilder::new(&mut arena, &interner));
    let result = Interpreter::new(&arena, &interner).eval(root);
    (result, interner)
}

fn int_array(b: &mut AstBuilder<'_>, values: &[i64]) -> ExprId {
    let elements: Vec<ExprId> = values.iter().map(|&v| b.int(v)).collect();
    b.array(elements)
}

fn assert_int_array(value: &Value, expected: &[i64]) {
    let Value::Array(elements) = value else {
        panic!("expected an array, got {value:?}");
    };
    let actual: Vec<i64> = elements
        .borrow()
        .iter()
        .map(|v| match v {
            Value::Int(n) => *n,
            other => panic!("expected an integer, got {other:?}"),
        })
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn and_or_return_operands() {
    let (result, _) = eval_with(|b| {
        let nil = b.nil();
        let two = b.int(2);
        b.arena.push(ExprKind::Or(nil, two), Span::DUMMY)
    });
    assert!(matches!(result, Ok(Value::Int(2))));
}

#[test]
fn unassigned_locals_read_nil() {
    let (result, _) = eval_with(|b| b.lvar("missing"));
    assert!(matches!(result, Ok(Value::Nil)));
}

#[test]
fn assign_then_read() {
    let (result, _) = eval_with(|b| {
        let seven = b.int(7);
        let assign = b.assign("x", seven);
        let read = b.lvar("x");
        b.begin([assign, read])
    });
    assert!(matches!(result, Ok(Value::Int(7))));
}

#[test]
fn negative_index_and_range_slices() {
    let (last, _) = eval_with(|b| {
        let arr = int_array(b, &[1, 2, 3]);
        let idx = b.int(-1);
        b.send(arr, "[]", [idx])
    });
    assert!(matches!(last, Ok(Value::Int(3))));

    // [1, 2, 2, 3][1..-2] == [2, 2]
    let (middle, _) = eval_with(|b| {
        let arr = int_array(b, &[1, 2, 2, 3]);
        let from = b.int(1);
        let to = b.int(-2);
        let range = b.range(from, to, false);
        b.send(arr, "[]", [range])
    });
    assert_int_array(&middle.unwrap(), &[2, 2]);

    // [1, 3][1..-2] == []
    let (empty, _) = eval_with(|b| {
        let arr = int_array(b, &[1, 3]);
        let from = b.int(1);
        let to = b.int(-2);
        let range = b.range(from, to, false);
        b.send(arr, "[]", [range])
    });
    assert_int_array(&empty.unwrap(), &[]);
}

#[test]
fn case_equality_on_classes_and_ranges() {
    let (is_array, _) = eval_with(|b| {
        let class = b.constant("Array");
        let arr = int_array(b, &[]);
        b.send(class, "===", [arr])
    });
    assert!(matches!(is_array, Ok(Value::Bool(true))));

    let (in_range, _) = eval_with(|b| {
        let one = b.int(1);
        let five = b.int(5);
        let range = b.range(one, five, true);
        let five = b.int(5);
        b.send(range, "===", [five])
    });
    assert!(matches!(in_range, Ok(Value::Bool(false))));
}

#[test]
fn delete_mutates_shared_hash_but_not_dup() {
    let (result, _) = eval_with(|b| {
        let one = b.int(1);
        let hash = b.hash([("a", one)]);
        let store = b.assign("h", hash);
        let h = b.lvar("h");
        let copy = b.send(h, "dup", []);
        let store_copy = b.assign("d", copy);
        let d = b.lvar("d");
        let key = b.sym("a");
        let delete = b.send(d, "delete", [key]);
        let h = b.lvar("h");
        let key = b.sym("a");
        let still_there = b.send(h, "key?", [key]);
        b.begin([store, store_copy, delete, still_there])
    });
    assert!(matches!(result, Ok(Value::Bool(true))));
}

#[test]
fn raise_reports_class_and_message() {
    let (result, _) = eval_with(|b| {
        let arr = int_array(b, &[1]);
        let message = b.send(arr, "inspect", []);
        b.arena.push(
            ExprKind::Raise {
                class: b.interner.intern("NoMatchingPatternError"),
                message,
            },
            Span::DUMMY,
        )
    });
    assert_eq!(
        result.unwrap_err(),
        EvalError::Raised {
            class: "NoMatchingPatternError".to_string(),
            message: "[1]".to_string(),
        }
    );
}

#[test]
fn sugar_is_not_evaluated() {
    let (result, _) = eval_with(|b| {
        let value = b.int(1);
        let pattern = b.p_var("x");
        let body = b.nil();
        let clause = b.in_clause(pattern, body);
        b.case_match(value, [clause])
    });
    assert_eq!(result.unwrap_err(), EvalError::Unlowered("case statement"));
}

#[test]
fn unknown_constants_fail_until_defined() {
    let interner = StringInterner::new();
    let mut arena = ExprArena::new();
    let root = AstBuilder::new(&mut arena, &interner).constant("Point");

    let mut interp = Interpreter::new(&arena, &interner);
    assert_eq!(
        interp.eval(root).unwrap_err(),
        EvalError::UndefinedConstant("Point".to_string())
    );
    interp.define_class("Point");
    assert!(matches!(interp.eval(root), Ok(Value::Class(_))));
}

#[test]
fn calls_are_counted_per_method() {
    let interner = StringInterner::new();
    let mut arena = ExprArena::new();
    let mut b = AstBuilder::new(&mut arena, &interner);
    let arr = int_array(&mut b, &[1, 2]);
    let first = b.send(arr, "length", []);
    let arr = int_array(&mut b, &[3]);
    let second = b.send(arr, "length", []);
    let root = b.begin([first, second]);

    let mut interp = Interpreter::new(&arena, &interner);
    assert!(matches!(interp.eval(root), Ok(Value::Int(1))));
    assert_eq!(interp.call_count("length"), 2);
    assert_eq!(interp.call_count("deconstruct"), 0);
}

#[test]
fn objects_filter_requested_keys() {
    let interner = StringInterner::new();
    let x = Value::Sym(interner.intern("x"));
    let y = Value::Sym(interner.intern("y"));
    let point = Value::object(crate::Object {
        class: interner.intern("Point"),
        sequence: Some(Value::array(vec![Value::Int(1), Value::Int(2)])),
        entries: Some(Value::hash(vec![(x, Value::Int(1)), (y, Value::Int(2))])),
    });

    let mut arena = ExprArena::new();
    let mut b = AstBuilder::new(&mut arena, &interner);
    let recv = b.lvar("p");
    let key = b.sym("x");
    let keys = b.array([key]);
    let call = b.send(recv, "deconstruct_keys", [keys]);
    let root = b.send(call, "length", []);

    let mut interp = Interpreter::new(&arena, &interner);
    interp.set_local("p", point);
    assert!(matches!(interp.eval(root), Ok(Value::Int(1))));
}
