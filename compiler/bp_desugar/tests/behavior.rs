//! End-to-end behavior of rewritten statements.
//!
//! Each test builds an input tree, rewrites it, and runs the output through
//! the reference interpreter with the matchee bound to `v`.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use bp_desugar::{desugar_default, DesugarResult};
use bp_eval::{EvalError, EvalResult, Interpreter, Object, Value};
use bp_ir::{AstBuilder, CaseClause, ExprArena, ExprId, GuardKind, PatternId, StringInterner};
use pretty_assertions::assert_eq;

struct Program {
    interner: StringInterner,
    output: DesugarResult,
}

impl Program {
    fn build(build: impl FnOnce(&mut AstBuilder<'_>) -> ExprId) -> Program {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let root = build(&mut AstBuilder::new(&mut arena, &interner));
        let output = desugar_default(&arena, root, &interner).expect("rewrite failed");
        Program { interner, output }
    }

    /// `case v; in p0 then 0; in p1 then 1; ...; [else :none]; end`
    fn case(
        default: bool,
        patterns: impl FnOnce(&mut AstBuilder<'_>) -> Vec<PatternId>,
    ) -> Program {
        Program::build(|b| {
            let patterns = patterns(b);
            let mut clauses: Vec<CaseClause> = patterns
                .into_iter()
                .zip(0..)
                .map(|(pattern, i)| {
                    let body = b.int(i);
                    b.in_clause(pattern, body)
                })
                .collect();
            if default {
                let none = b.sym("none");
                clauses.push(b.else_clause(none));
            }
            let matchee = b.lvar("v");
            b.case_match(matchee, clauses)
        })
    }

    fn interpreter(&self) -> Interpreter<'_> {
        let mut interp = Interpreter::new(&self.output.arena, &self.interner);
        interp.define_class("Point");
        interp
    }

    fn run(&self, matchee: Value) -> (EvalResult, Interpreter<'_>) {
        let mut interp = self.interpreter();
        let result = self.run_in(&mut interp, matchee);
        (result, interp)
    }

    fn run_in(&self, interp: &mut Interpreter<'_>, matchee: Value) -> EvalResult {
        interp.set_local("v", matchee);
        interp.eval(self.output.root)
    }

    fn sym(&self, name: &str) -> Value {
        Value::Sym(self.interner.intern(name))
    }

    fn hash(&self, entries: &[(&str, Value)]) -> Value {
        Value::hash(
            entries
                .iter()
                .map(|(key, value)| (self.sym(key), value.clone()))
                .collect(),
        )
    }

    fn show(&self, value: &Value) -> String {
        value.inspect(&self.interner)
    }
}

fn ints(values: &[i64]) -> Value {
    Value::array(values.iter().map(|&v| Value::Int(v)).collect())
}

fn clause_taken(result: &EvalResult) -> Option<i64> {
    match result {
        Ok(Value::Int(i)) => Some(*i),
        _ => None,
    }
}

fn local(interp: &Interpreter<'_>, program: &Program, name: &str) -> String {
    let value = interp.local(name).unwrap_or(&Value::Nil);
    program.show(value)
}

// Clause chain

#[test]
fn first_variable_clause_always_matches() {
    let program = Program::case(false, |b| vec![b.p_var("x"), b.p_var("y")]);
    for matchee in [Value::Int(5), Value::Nil, ints(&[1, 2])] {
        let (result, interp) = program.run(matchee.clone());
        assert_eq!(clause_taken(&result), Some(0));
        assert!(interp.local("x").unwrap().equals(&matchee));
        assert!(interp.local("y").is_none());
    }
}

#[test]
fn exhausted_chain_raises_with_inspected_matchee() {
    let program = Program::case(false, |b| vec![b.p_int(1), b.p_int(2)]);
    let (result, _) = program.run(ints(&[1, 2]));
    assert_eq!(
        result.unwrap_err(),
        EvalError::Raised {
            class: "NoMatchingPatternError".to_string(),
            message: "[1, 2]".to_string(),
        }
    );
}

#[test]
fn default_clause_runs_when_nothing_matches() {
    let program = Program::case(true, |b| vec![b.p_int(1)]);
    let (result, _) = program.run(Value::Int(9));
    assert!(result.unwrap().equals(&program.sym("none")));
}

#[test]
fn clauses_are_tried_in_order() {
    let program = Program::case(false, |b| {
        let one_to_five = {
            let lo = b.int(1);
            let hi = b.int(5);
            b.range(lo, hi, false)
        };
        let range = b.p_value(one_to_five);
        vec![b.p_const("String"), range, b.p_const("Integer")]
    });
    assert_eq!(clause_taken(&program.run(Value::Int(3)).0), Some(1));
    assert_eq!(clause_taken(&program.run(Value::Int(30)).0), Some(2));
    assert_eq!(clause_taken(&program.run(Value::str("s")).0), Some(0));
}

#[test]
fn guards_filter_matches() {
    let program = Program::build(|b| {
        let x = b.p_var("x");
        let pattern = b.p_array([x]);
        let read = b.lvar("x");
        let two = b.int(2);
        let cond = b.send(read, "==", [two]);
        let body = b.int(0);
        let guarded = b.guarded_clause(pattern, GuardKind::If, cond, body);
        let none = b.sym("none");
        let default = b.else_clause(none);
        let matchee = b.lvar("v");
        b.case_match(matchee, [guarded, default])
    });
    assert_eq!(clause_taken(&program.run(ints(&[2])).0), Some(0));
    let (result, _) = program.run(ints(&[1]));
    assert!(result.unwrap().equals(&program.sym("none")));
}

// Array patterns

#[test]
fn array_rest_binds_the_middle() {
    let program = Program::case(true, |b| {
        let one = b.p_int(1);
        let rest = b.p_rest(Some("rest"));
        let three = b.p_int(3);
        vec![b.p_array([one, rest, three])]
    });

    let (result, interp) = program.run(ints(&[1, 2, 2, 3]));
    assert_eq!(clause_taken(&result), Some(0));
    assert_eq!(local(&interp, &program, "rest"), "[2, 2]");

    let (result, interp) = program.run(ints(&[1, 3]));
    assert_eq!(clause_taken(&result), Some(0));
    assert_eq!(local(&interp, &program, "rest"), "[]");

    let (result, _) = program.run(ints(&[2, 3]));
    assert_eq!(clause_taken(&result), None);
}

#[test]
fn suffix_elements_are_read_from_the_end() {
    let program = Program::case(false, |b| {
        let rest = b.p_rest(None);
        let x = b.p_var("x");
        let y = b.p_var("y");
        vec![b.p_array([rest, x, y])]
    });
    let (result, interp) = program.run(ints(&[1, 2, 3, 4]));
    assert_eq!(clause_taken(&result), Some(0));
    assert_eq!(local(&interp, &program, "x"), "3");
    assert_eq!(local(&interp, &program, "y"), "4");
}

#[test]
fn array_length_must_fit() {
    let program = Program::case(true, |b| {
        let x = b.p_var("x");
        let exact = b.p_array([x]);
        let a = b.p_var("a");
        let bee = b.p_var("b");
        let rest = b.p_rest(None);
        let at_least = b.p_array([a, bee, rest]);
        vec![exact, at_least]
    });
    assert_eq!(clause_taken(&program.run(ints(&[1])).0), Some(0));
    assert_eq!(clause_taken(&program.run(ints(&[1, 2])).0), Some(1));
    assert_eq!(clause_taken(&program.run(ints(&[1, 2, 3])).0), Some(1));
    assert_eq!(clause_taken(&program.run(ints(&[])).0), None);
}

#[test]
fn array_clauses_deconstruct_once() {
    let program = Program::case(false, |b| {
        let one = b.p_int(1);
        let x = b.p_var("x");
        let first = b.p_array([one, x]);
        let a = b.p_var("a");
        let bee = b.p_var("b");
        let second = b.p_array([a, bee]);
        vec![first, second]
    });
    let (result, interp) = program.run(ints(&[2, 3]));
    assert_eq!(clause_taken(&result), Some(1));
    assert_eq!(interp.call_count("deconstruct"), 1);
    assert_eq!(local(&interp, &program, "b"), "3");
}

#[test]
fn nested_arrays_match_elementwise() {
    let program = Program::case(true, |b| {
        let x = b.p_var("x");
        let one = b.p_int(1);
        let inner = b.p_array([one, x]);
        let tail = b.p_rest(Some("tail"));
        vec![b.p_array([inner, tail])]
    });
    let nested = Value::array(vec![ints(&[1, 7]), Value::Int(8)]);
    let (result, interp) = program.run(nested);
    assert_eq!(clause_taken(&result), Some(0));
    assert_eq!(local(&interp, &program, "x"), "7");
    assert_eq!(local(&interp, &program, "tail"), "[8]");

    let (result, _) = program.run(Value::array(vec![Value::Int(1)]));
    assert_eq!(clause_taken(&result), None);
}

#[test]
fn repeated_runs_do_not_reuse_the_cache() {
    let program = Program::case(true, |b| {
        let x = b.p_var("x");
        let y = b.p_var("y");
        let pair = b.p_array([x, y]);
        let z = b.p_var("z");
        let single = b.p_array([z]);
        vec![pair, single]
    });
    let mut interp = program.interpreter();
    let first = program.run_in(&mut interp, ints(&[1]));
    assert_eq!(clause_taken(&first), Some(1));
    // Same interpreter, same locals: the cached `[1]` must not leak.
    let second = program.run_in(&mut interp, Value::Int(5));
    assert!(second.unwrap().equals(&program.sym("none")));
}

// Hash patterns

#[test]
fn hash_retry_sees_keys_removed_by_earlier_clause() {
    let program = Program::case(false, |b| {
        let one = b.p_int(1);
        let a = b.p_pair("a", one);
        let any = b.p_var("_");
        let c = b.p_pair("c", any);
        let first = b.p_hash([a, c]);
        let one = b.p_int(1);
        let a = b.p_pair("a", one);
        let any = b.p_var("_");
        let bee = b.p_pair("b", any);
        let second = b.p_hash([a, bee]);
        vec![first, second]
    });
    let matchee = program.hash(&[("a", Value::Int(1)), ("b", Value::Int(2))]);
    let (result, interp) = program.run(matchee.clone());
    assert_eq!(clause_taken(&result), Some(1));
    assert_eq!(interp.call_count("deconstruct_keys"), 1);
    // The matchee itself is untouched.
    assert_eq!(program.show(&matchee), "{a: 1, b: 2}");
}

#[test]
fn hash_rest_binds_remaining_keys() {
    let program = Program::case(false, |b| {
        let a = b.p_key("a");
        let rest = b.p_rest(Some("rest"));
        vec![b.p_hash([a, rest])]
    });
    let matchee = program.hash(&[("a", Value::Int(1)), ("b", Value::Int(2))]);
    let (result, interp) = program.run(matchee);
    assert_eq!(clause_taken(&result), Some(0));
    assert_eq!(local(&interp, &program, "a"), "1");
    assert_eq!(local(&interp, &program, "rest"), "{b: 2}");
}

#[test]
fn nil_rest_requires_no_other_keys() {
    let program = Program::case(true, |b| {
        let a = b.p_key("a");
        let none = b.p_nil_rest();
        vec![b.p_hash([a, none])]
    });
    let exact = program.hash(&[("a", Value::Int(1))]);
    assert_eq!(clause_taken(&program.run(exact).0), Some(0));
    let extra = program.hash(&[("a", Value::Int(1)), ("b", Value::Int(2))]);
    assert_eq!(clause_taken(&program.run(extra).0), None);
}

#[test]
fn empty_hash_pattern_checks_shape_only() {
    let program = Program::case(true, |b| vec![b.p_hash([])]);
    assert_eq!(clause_taken(&program.run(program.hash(&[])).0), Some(0));
    let full = program.hash(&[("a", Value::Int(1))]);
    assert_eq!(clause_taken(&program.run(full).0), Some(0));
    assert_eq!(clause_taken(&program.run(Value::Int(1)).0), None);
}

#[test]
fn missing_key_fails_even_for_nil_subpattern() {
    let program = Program::case(true, |b| {
        let nil = b.nil();
        let is_nil = b.p_value(nil);
        let a = b.p_pair("a", is_nil);
        vec![b.p_hash([a])]
    });
    let without = program.hash(&[("b", Value::Int(1))]);
    assert_eq!(clause_taken(&program.run(without).0), None);
    let with_nil = program.hash(&[("a", Value::Nil)]);
    assert_eq!(clause_taken(&program.run(with_nil).0), Some(0));
}

#[test]
fn object_sees_union_of_requested_keys() {
    let program = Program::case(false, |b| {
        let one = b.p_int(1);
        let a = b.p_pair("a", one);
        let first = b.p_hash([a]);
        let bee = b.p_key("b");
        let second = b.p_hash([bee]);
        vec![first, second]
    });
    let point = Value::object(Object {
        class: program.interner.intern("Point"),
        sequence: None,
        entries: Some(program.hash(&[
            ("a", Value::Int(2)),
            ("b", Value::Int(3)),
            ("c", Value::Int(4)),
        ])),
    });
    let (result, interp) = program.run(point);
    assert_eq!(clause_taken(&result), Some(1));
    assert_eq!(local(&interp, &program, "b"), "3");
}

// Other pattern kinds

#[test]
fn alternatives_constants_and_pins() {
    let program = Program::case(true, |b| {
        let one = b.p_int(1);
        let two = b.p_int(2);
        let either = b.p_alt([one, two]);
        let x = b.p_var("x");
        let arr = b.p_array([x]);
        let typed = b.p_const_with("Array", arr);
        let expected = b.lvar("expected");
        let pinned = b.p_pin(expected);
        vec![either, typed, pinned]
    });

    assert_eq!(clause_taken(&program.run(Value::Int(2)).0), Some(0));

    let (result, interp) = program.run(ints(&[9]));
    assert_eq!(clause_taken(&result), Some(1));
    assert_eq!(local(&interp, &program, "x"), "9");

    let mut interp = program.interpreter();
    interp.set_local("expected", Value::str("hi"));
    let result = program.run_in(&mut interp, Value::str("hi"));
    assert_eq!(clause_taken(&result), Some(2));
}

#[test]
fn user_object_sequence_protocol() {
    let program = Program::case(true, |b| {
        let x = b.p_var("x");
        let y = b.p_var("y");
        let arr = b.p_array([x, y]);
        vec![b.p_const_with("Point", arr)]
    });
    let point = |sequence: Option<Value>| {
        Value::object(Object {
            class: program.interner.intern("Point"),
            sequence,
            entries: None,
        })
    };

    let (result, interp) = program.run(point(Some(ints(&[3, 4]))));
    assert_eq!(clause_taken(&result), Some(0));
    assert_eq!(local(&interp, &program, "y"), "4");

    // No `deconstruct`: simply no match.
    let (result, _) = program.run(point(None));
    assert!(result.unwrap().equals(&program.sym("none")));

    // `deconstruct` returning a non-array is a type error.
    let (result, _) = program.run(point(Some(Value::Int(1))));
    assert_eq!(
        result.unwrap_err(),
        EvalError::Raised {
            class: "TypeError".to_string(),
            message: "deconstruct must return Array".to_string(),
        }
    );
}

#[test]
fn user_object_key_value_protocol() {
    let program = Program::case(true, |b| {
        let a = b.p_key("a");
        let hash = b.p_hash([a]);
        vec![b.p_const_with("Point", hash)]
    });
    let point = |entries: Option<Value>| {
        Value::object(Object {
            class: program.interner.intern("Point"),
            sequence: None,
            entries,
        })
    };

    let (result, interp) = program.run(point(Some(program.hash(&[("a", Value::Int(6))]))));
    assert_eq!(clause_taken(&result), Some(0));
    assert_eq!(local(&interp, &program, "a"), "6");

    let (result, _) = program.run(point(None));
    assert!(result.unwrap().equals(&program.sym("none")));

    // `deconstruct_keys` returning a non-hash is a type error.
    let (result, _) = program.run(point(Some(Value::Int(1))));
    assert_eq!(
        result.unwrap_err(),
        EvalError::Raised {
            class: "TypeError".to_string(),
            message: "deconstruct_keys must return Hash".to_string(),
        }
    );
}

// Statements

#[test]
fn nested_statement_deconstructs_its_own_matchee() {
    let program = Program::build(|b| {
        let y = b.p_var("y");
        let inner_pattern = b.p_array([y]);
        let inner_body = b.lvar("y");
        let inner_clause = b.in_clause(inner_pattern, inner_body);
        let inner_matchee = b.lvar("x");
        let inner = b.case_match(inner_matchee, [inner_clause]);

        let x = b.p_var("x");
        let outer_pattern = b.p_array([x]);
        let outer_clause = b.in_clause(outer_pattern, inner);
        let matchee = b.lvar("v");
        b.case_match(matchee, [outer_clause])
    });
    let (result, interp) = program.run(Value::array(vec![ints(&[5])]));
    assert!(matches!(result, Ok(Value::Int(5))));
    assert_eq!(interp.call_count("deconstruct"), 2);
}

#[test]
fn one_line_forms() {
    let predicate = Program::build(|b| {
        let any = b.p_var("_");
        let pair = b.p_array([any, any]);
        let matchee = b.lvar("v");
        b.match_predicate(matchee, pair)
    });
    assert!(matches!(predicate.run(ints(&[1, 2])).0, Ok(Value::Bool(true))));
    assert!(matches!(predicate.run(ints(&[1])).0, Ok(Value::Bool(false))));

    let assertion = Program::build(|b| {
        let a = b.p_key("a");
        let pattern = b.p_hash([a]);
        let matchee = b.lvar("v");
        b.match_assert(matchee, pattern)
    });
    let (result, interp) = assertion.run(assertion.hash(&[("a", Value::Int(4))]));
    assert!(matches!(result, Ok(Value::Nil)));
    assert_eq!(local(&interp, &assertion, "a"), "4");

    let (result, _) = assertion.run(Value::Int(4));
    assert_eq!(
        result.unwrap_err().raised_class(),
        Some("NoMatchingPatternError")
    );
}
