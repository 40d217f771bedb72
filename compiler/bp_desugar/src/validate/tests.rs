use super::*;
use bp_ir::{AstBuilder, StringInterner};

#[test]
fn plain_tree_is_valid() {
    let interner = StringInterner::new();
    let mut arena = ExprArena::new();
    let mut b = AstBuilder::new(&mut arena, &interner);
    let one = b.int(1);
    let two = b.int(2);
    let root = b.send(one, "==", [two]);
    assert_eq!(validate_output(&arena, root), Ok(()));
}

#[test]
fn sugar_is_rejected() {
    let interner = StringInterner::new();
    let mut arena = ExprArena::new();
    let mut b = AstBuilder::new(&mut arena, &interner);
    let value = b.int(1);
    let pattern = b.p_var("x");
    let sugar = b.match_predicate(value, pattern);
    let root = b.begin([sugar]);
    assert!(matches!(
        validate_output(&arena, root),
        Err(DesugarError::InvalidOutput { .. })
    ));
}

#[test]
fn dangling_handle_is_rejected() {
    let arena = ExprArena::new();
    assert!(validate_output(&arena, ExprId::new(3)).is_err());
}
