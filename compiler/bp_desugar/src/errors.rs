//! Structural (rewrite-time) errors.
//!
//! These abort the current statement and never reach the generated program.
//! Run-time failures (no matching pattern, wrong deconstruction shape) are
//! not errors here: they are `Raise` nodes in the output tree, built by
//! `lower::raise`.

use bp_diagnostic::{Diagnostic, ErrorCode};
use bp_ir::Span;

/// A structural error in the input tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DesugarError {
    /// An `else` clause is followed by another clause.
    #[error("`else` must be the last clause of a case statement")]
    DefaultNotLast {
        /// The misplaced `else`.
        span: Span,
        /// The first clause after it.
        next: Span,
    },

    /// A rest marker's target is neither absent nor a variable.
    #[error("rest pattern must bind a plain variable, found {found}")]
    InvalidRestTarget { span: Span, found: &'static str },

    /// A pattern kind appears where the grammar does not allow it.
    #[error("{found} is not allowed in {context}")]
    MisplacedPattern {
        span: Span,
        found: &'static str,
        context: &'static str,
    },

    /// A handle in the input tree does not resolve.
    #[error("{what} handle {index} does not resolve in the input arena")]
    InvalidHandle { what: &'static str, index: u32 },

    /// A sugar node or dangling handle survived into the output tree.
    #[error("output tree is not fully lowered: {reason}")]
    InvalidOutput { span: Span, reason: String },
}

impl DesugarError {
    /// The diagnostic code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DesugarError::DefaultNotLast { .. } => ErrorCode::E3001,
            DesugarError::InvalidRestTarget { .. } => ErrorCode::E3002,
            DesugarError::MisplacedPattern { .. } => ErrorCode::E3003,
            DesugarError::InvalidHandle { .. } | DesugarError::InvalidOutput { .. } => {
                ErrorCode::E9001
            }
        }
    }

    /// Primary location of the error.
    pub fn span(&self) -> Span {
        match self {
            DesugarError::DefaultNotLast { span, .. }
            | DesugarError::InvalidRestTarget { span, .. }
            | DesugarError::MisplacedPattern { span, .. }
            | DesugarError::InvalidOutput { span, .. } => *span,
            DesugarError::InvalidHandle { .. } => Span::DUMMY,
        }
    }

    /// Convert into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_label(self.span(), self.label());
        match self {
            DesugarError::DefaultNotLast { next, .. } => diag
                .with_secondary_label(*next, "this clause follows the `else`")
                .with_note("move the `else` clause to the end of the case statement"),
            DesugarError::InvalidRestTarget { .. } => {
                diag.with_note("write `*name` / `**name` to capture, or a bare `*` / `**`")
            }
            DesugarError::MisplacedPattern { .. } => diag,
            DesugarError::InvalidHandle { .. } | DesugarError::InvalidOutput { .. } => {
                diag.with_note("this is a bug in the producer of the syntax tree")
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DesugarError::DefaultNotLast { .. } => "`else` clause is not last",
            DesugarError::InvalidRestTarget { .. } => "invalid rest target",
            DesugarError::MisplacedPattern { .. } => "pattern not allowed here",
            DesugarError::InvalidHandle { .. } => "dangling handle",
            DesugarError::InvalidOutput { .. } => "left unlowered",
        }
    }
}
