use super::*;
use pretty_assertions::assert_eq;

#[test]
fn builder_collects_labels_and_notes() {
    let diag = Diagnostic::error(ErrorCode::E3001)
        .with_message("`else` must be the last clause")
        .with_label(Span::new(10, 14), "this `else`")
        .with_secondary_label(Span::new(20, 30), "is followed by this clause")
        .with_note("move the `else` clause to the end");

    assert!(diag.is_error());
    assert_eq!(diag.primary_span(), Some(Span::new(10, 14)));
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.notes, vec!["move the `else` clause to the end".to_string()]);
}

#[test]
fn display_includes_code_and_labels() {
    let diag = Diagnostic::error(ErrorCode::E3002)
        .with_message("rest target must be a variable")
        .with_label(Span::new(3, 5), "here");

    assert_eq!(
        diag.to_string(),
        "error[E3002]: rest target must be a variable\n  --> 3..5: here"
    );
}

#[test]
fn warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::E3003);
    assert!(!diag.is_error());
    assert_eq!(diag.primary_span(), None);
}
