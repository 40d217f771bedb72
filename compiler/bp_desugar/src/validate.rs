//! Output tree validation.
//!
//! A lowered tree must contain only output-grammar nodes, and every handle
//! reachable from the root must resolve in the output arena.

use bp_ir::{ExprArena, ExprId, ExprKind, Span};

use crate::DesugarError;

/// Check that the tree rooted at `root` is fully lowered.
pub fn validate_output(arena: &ExprArena, root: ExprId) -> Result<(), DesugarError> {
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let Some(expr) = arena.try_get_expr(id) else {
            return Err(DesugarError::InvalidOutput {
                span: Span::DUMMY,
                reason: format!("expression handle {} does not resolve", id.raw()),
            });
        };
        if expr.kind.is_sugar() {
            return Err(DesugarError::InvalidOutput {
                span: expr.span,
                reason: format!("sugar node {id:?} survived lowering"),
            });
        }
        match expr.kind {
            ExprKind::Array(range)
            | ExprKind::Hash(range)
            | ExprKind::Begin(range)
            | ExprKind::Send { args: range, .. }
                if !arena.expr_list_in_bounds(range) =>
            {
                return Err(DesugarError::InvalidOutput {
                    span: expr.span,
                    reason: format!("expression list of {id:?} does not resolve"),
                });
            }
            _ => {}
        }
        stack.extend(arena.children(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
