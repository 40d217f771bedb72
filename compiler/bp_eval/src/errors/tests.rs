#![allow(clippy::unwrap_used)]

use super::*;

fn raised(class: &str) -> EvalError {
    EvalError::Raised {
        class: class.to_string(),
        message: "[1]".to_string(),
    }
}

#[test]
fn generated_raises_map_to_runtime_codes() {
    assert_eq!(
        raised("NoMatchingPatternError").error_code(),
        Some(ErrorCode::E6001)
    );
    assert_eq!(raised("TypeError").error_code(), Some(ErrorCode::E6002));
    assert_eq!(raised("ArgumentError").error_code(), None);
    assert_eq!(EvalError::ErrorNode.error_code(), None);
}

#[test]
fn diagnostic_carries_class_and_message() {
    let diag = raised("NoMatchingPatternError").to_diagnostic().unwrap();
    assert_eq!(diag.code, ErrorCode::E6001);
    assert_eq!(diag.message, "NoMatchingPatternError: [1]");
}
