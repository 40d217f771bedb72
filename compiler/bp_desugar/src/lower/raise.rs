//! Generated run-time error nodes.
//!
//! Neither raise runs at rewrite time; both are plain `Raise` nodes that
//! only fire if the rewritten program reaches them.

use bp_ir::{ExprId, ExprKind, Name, Span};

use super::Desugarer;

/// Message of the shape-check failure after `deconstruct`.
pub(crate) const DECONSTRUCT_MESSAGE: &str = "deconstruct must return Array";

/// Message of the shape-check failure after `deconstruct_keys`.
pub(crate) const DECONSTRUCT_KEYS_MESSAGE: &str = "deconstruct_keys must return Hash";

impl Desugarer<'_> {
    /// `raise NoMatchingPatternError, matchee.inspect`
    pub(crate) fn raise_no_match(&mut self, matchee: Name, span: Span) -> ExprId {
        let receiver = self.lvar(matchee, span);
        let inspect = self.names.inspect;
        let message = self.send(receiver, inspect, &[], span);
        self.push(
            ExprKind::Raise {
                class: self.names.no_matching_pattern,
                message,
            },
            span,
        )
    }

    /// `raise TypeError, message`
    pub(crate) fn raise_type_error(&mut self, message: &str, span: Span) -> ExprId {
        let message = self.str(message, span);
        self.push(
            ExprKind::Raise {
                class: self.names.type_error,
                message,
            },
            span,
        )
    }
}
