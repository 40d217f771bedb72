//! Evaluation errors.
//!
//! `Raised` is the only error a well-formed rewritten program produces; the
//! rest signal an input the interpreter cannot run.

use bp_diagnostic::{Diagnostic, ErrorCode};

/// Result of evaluating an expression.
pub type EvalResult = Result<crate::Value, EvalError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// A `Raise` node executed.
    #[error("{class}: {message}")]
    Raised { class: String, message: String },

    #[error("uninitialized constant {0}")]
    UndefinedConstant(String),

    #[error("undefined method `{method}' for {receiver}")]
    NoSuchMethod { method: String, receiver: String },

    #[error("wrong argument for `{method}': {detail}")]
    WrongArgument { method: String, detail: String },

    /// A sugar node reached evaluation; the tree was not rewritten.
    #[error("unlowered {0} reached evaluation")]
    Unlowered(&'static str),

    #[error("error node reached evaluation")]
    ErrorNode,

    #[error("expression handle {0} does not resolve")]
    InvalidHandle(u32),
}

impl EvalError {
    /// Class name of a raised error, `None` for interpreter failures.
    pub fn raised_class(&self) -> Option<&str> {
        match self {
            EvalError::Raised { class, .. } => Some(class),
            _ => None,
        }
    }

    /// E6xxx code of an error raised by generated code.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self.raised_class()? {
            "NoMatchingPatternError" => Some(ErrorCode::E6001),
            "TypeError" => Some(ErrorCode::E6002),
            _ => None,
        }
    }

    /// Diagnostic for an error raised by generated code.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        let code = self.error_code()?;
        Some(Diagnostic::error(code).with_message(self.to_string()))
    }
}

pub(crate) fn no_such_method(method: &str, receiver: &str) -> EvalError {
    EvalError::NoSuchMethod {
        method: method.to_string(),
        receiver: receiver.to_string(),
    }
}

pub(crate) fn wrong_argument(method: &str, detail: impl Into<String>) -> EvalError {
    EvalError::WrongArgument {
        method: method.to_string(),
        detail: detail.into(),
    }
}

#[cfg(test)]
mod tests;
