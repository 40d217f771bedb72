//! Input tree → output tree lowering.
//!
//! Copies every node of the source arena into a fresh output arena and
//! rewrites the three sugar forms on the way:
//! - `CaseMatch` → bound matchee + nested `If` chain (see `clauses`)
//! - `MatchPredicate` → bound matchee + pattern truth
//! - `MatchAssert` → bound matchee + pattern truth or no-match raise
//!
//! Pattern truths are built by the dispatcher (`dispatch`), which hands
//! sequence and key-value patterns to `array` and `hash`.

mod array;
mod clauses;
mod dispatch;
mod hash;
mod raise;

use bp_ir::{ExprArena, ExprId, ExprKind, ExprRange, Name, Span, StringInterner};
use bp_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

use crate::feature::Collaborators;
use crate::{DesugarError, DesugarOptions};

/// Method and constant names used by generated code.
pub(crate) struct Vocabulary {
    pub(crate) case_eq: Name,
    pub(crate) eq: Name,
    pub(crate) ge: Name,
    pub(crate) index: Name,
    pub(crate) length: Name,
    pub(crate) respond_to: Name,
    pub(crate) deconstruct: Name,
    pub(crate) deconstruct_keys: Name,
    pub(crate) has_key: Name,
    pub(crate) delete: Name,
    pub(crate) dup: Name,
    pub(crate) is_empty: Name,
    pub(crate) inspect: Name,
    pub(crate) array_class: Name,
    pub(crate) hash_class: Name,
    pub(crate) type_error: Name,
    pub(crate) no_matching_pattern: Name,
}

impl Vocabulary {
    fn new(interner: &StringInterner) -> Self {
        Vocabulary {
            case_eq: interner.intern("==="),
            eq: interner.intern("=="),
            ge: interner.intern(">="),
            index: interner.intern("[]"),
            length: interner.intern("length"),
            respond_to: interner.intern("respond_to?"),
            deconstruct: interner.intern("deconstruct"),
            deconstruct_keys: interner.intern("deconstruct_keys"),
            has_key: interner.intern("key?"),
            delete: interner.intern("delete"),
            dup: interner.intern("dup"),
            is_empty: interner.intern("empty?"),
            inspect: interner.intern("inspect"),
            array_class: interner.intern("Array"),
            hash_class: interner.intern("Hash"),
            type_error: interner.intern("TypeError"),
            no_matching_pattern: interner.intern("NoMatchingPatternError"),
        }
    }
}

/// State for one lowering run.
///
/// Owns the output arena. Per-statement state lives in a
/// [`MatchContext`](crate::context::MatchContext) created by each statement
/// builder and threaded explicitly through the pattern builders.
pub(crate) struct Desugarer<'a> {
    /// Source arena (read-only).
    pub(crate) src: &'a ExprArena,
    pub(crate) interner: &'a StringInterner,
    pub(crate) options: &'a DesugarOptions,
    pub(crate) collaborators: &'a mut dyn Collaborators,
    /// Output arena (being built).
    pub(crate) arena: ExprArena,
    pub(crate) names: Vocabulary,
    /// Number of statements rewritten so far; also the next ordinal.
    pub(crate) statements: u32,
}

impl<'a> Desugarer<'a> {
    pub(crate) fn new(
        src: &'a ExprArena,
        interner: &'a StringInterner,
        options: &'a DesugarOptions,
        collaborators: &'a mut dyn Collaborators,
    ) -> Self {
        // Every rewritten statement grows by roughly a factor of four.
        let estimated = src.expr_count() * 4;
        Desugarer {
            src,
            interner,
            options,
            collaborators,
            arena: ExprArena::with_capacity(estimated),
            names: Vocabulary::new(interner),
            statements: 0,
        }
    }

    /// Lower one source expression, returning its output handle.
    pub(crate) fn lower_expr(&mut self, id: ExprId) -> Result<ExprId, DesugarError> {
        ensure_sufficient_stack(|| self.lower_expr_inner(id))
    }

    fn lower_expr_inner(&mut self, id: ExprId) -> Result<ExprId, DesugarError> {
        let Some(&expr) = self.src.try_get_expr(id) else {
            return Err(DesugarError::InvalidHandle {
                what: "expression",
                index: id.raw(),
            });
        };
        let span = expr.span;
        let kind = match expr.kind {
            kind @ (ExprKind::Nil
            | ExprKind::True
            | ExprKind::False
            | ExprKind::Int(_)
            | ExprKind::Str(_)
            | ExprKind::Sym(_)
            | ExprKind::Lvar(_)
            | ExprKind::Const(_)
            | ExprKind::Error) => kind,
            ExprKind::Array(range) => ExprKind::Array(self.lower_list(range)?),
            ExprKind::Hash(range) => ExprKind::Hash(self.lower_list(range)?),
            ExprKind::Pair { key, value } => ExprKind::Pair {
                key: self.lower_expr(key)?,
                value: self.lower_expr(value)?,
            },
            ExprKind::Range {
                start,
                end,
                exclusive,
            } => ExprKind::Range {
                start: self.lower_optional(start)?,
                end: self.lower_optional(end)?,
                exclusive,
            },
            ExprKind::Assign { name, value } => ExprKind::Assign {
                name,
                value: self.lower_expr(value)?,
            },
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => ExprKind::If {
                cond: self.lower_expr(cond)?,
                then_branch: self.lower_optional(then_branch)?,
                else_branch: self.lower_optional(else_branch)?,
            },
            ExprKind::And(left, right) => {
                ExprKind::And(self.lower_expr(left)?, self.lower_expr(right)?)
            }
            ExprKind::Or(left, right) => {
                ExprKind::Or(self.lower_expr(left)?, self.lower_expr(right)?)
            }
            ExprKind::Not(operand) => ExprKind::Not(self.lower_expr(operand)?),
            ExprKind::Send {
                receiver,
                method,
                args,
            } => ExprKind::Send {
                receiver: self.lower_optional(receiver)?,
                method,
                args: self.lower_list(args)?,
            },
            ExprKind::Begin(range) => ExprKind::Begin(self.lower_list(range)?),
            ExprKind::Raise { class, message } => ExprKind::Raise {
                class,
                message: self.lower_optional(message)?,
            },

            // Sugar: each builder returns a finished output node.
            ExprKind::CaseMatch { matchee, clauses } => {
                return self.lower_case(matchee, clauses, span);
            }
            ExprKind::MatchPredicate { value, pattern } => {
                return self.lower_match_predicate(value, pattern, span);
            }
            ExprKind::MatchAssert { value, pattern } => {
                return self.lower_match_assert(value, pattern, span);
            }
        };
        Ok(self.push(kind, span))
    }

    /// Lower an optional child (keeps the `ExprId::INVALID` sentinel).
    pub(crate) fn lower_optional(&mut self, id: ExprId) -> Result<ExprId, DesugarError> {
        if id.is_valid() {
            self.lower_expr(id)
        } else {
            Ok(ExprId::INVALID)
        }
    }

    /// Lower every element of a source list into a new output list.
    ///
    /// Elements are lowered first, then allocated together: lowering a
    /// child may itself allocate lists, and output ranges must stay
    /// contiguous.
    fn lower_list(&mut self, range: ExprRange) -> Result<ExprRange, DesugarError> {
        if !self.src.expr_list_in_bounds(range) {
            return Err(DesugarError::InvalidHandle {
                what: "expression list",
                index: range.start,
            });
        }
        let src = self.src;
        let mut lowered: SmallVec<[ExprId; 8]> = SmallVec::with_capacity(range.len());
        for &child in src.get_expr_list(range) {
            lowered.push(self.lower_expr(child)?);
        }
        Ok(self.arena.alloc_expr_list(lowered))
    }

    // Emission helpers

    pub(crate) fn push(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.push(kind, span)
    }

    pub(crate) fn lvar(&mut self, name: Name, span: Span) -> ExprId {
        self.push(ExprKind::Lvar(name), span)
    }

    pub(crate) fn constant(&mut self, name: Name, span: Span) -> ExprId {
        self.push(ExprKind::Const(name), span)
    }

    pub(crate) fn sym(&mut self, name: Name, span: Span) -> ExprId {
        self.push(ExprKind::Sym(name), span)
    }

    pub(crate) fn int(&mut self, value: i64, span: Span) -> ExprId {
        self.push(ExprKind::Int(value), span)
    }

    pub(crate) fn str(&mut self, text: &str, span: Span) -> ExprId {
        let name = self.interner.intern(text);
        self.push(ExprKind::Str(name), span)
    }

    pub(crate) fn bool(&mut self, value: bool, span: Span) -> ExprId {
        self.push(if value { ExprKind::True } else { ExprKind::False }, span)
    }

    pub(crate) fn nil(&mut self, span: Span) -> ExprId {
        self.push(ExprKind::Nil, span)
    }

    pub(crate) fn send(
        &mut self,
        receiver: ExprId,
        method: Name,
        args: &[ExprId],
        span: Span,
    ) -> ExprId {
        let args = self.arena.alloc_expr_list(args.iter().copied());
        self.push(
            ExprKind::Send {
                receiver,
                method,
                args,
            },
            span,
        )
    }

    /// `pattern === value`
    pub(crate) fn case_eq(&mut self, pattern: ExprId, value: ExprId, span: Span) -> ExprId {
        let method = self.names.case_eq;
        self.send(pattern, method, &[value], span)
    }

    pub(crate) fn assign(&mut self, name: Name, value: ExprId, span: Span) -> ExprId {
        self.push(ExprKind::Assign { name, value }, span)
    }

    pub(crate) fn begin(&mut self, exprs: &[ExprId], span: Span) -> ExprId {
        let range = self.arena.alloc_expr_list(exprs.iter().copied());
        self.push(ExprKind::Begin(range), span)
    }

    /// `(name = value; true)`: an always-true binding step.
    pub(crate) fn bind(&mut self, name: Name, value: ExprId, span: Span) -> ExprId {
        let assign = self.assign(name, value, span);
        let truth = self.bool(true, span);
        self.begin(&[assign, truth], span)
    }

    pub(crate) fn and(&mut self, left: ExprId, right: ExprId, span: Span) -> ExprId {
        self.push(ExprKind::And(left, right), span)
    }

    pub(crate) fn or(&mut self, left: ExprId, right: ExprId, span: Span) -> ExprId {
        self.push(ExprKind::Or(left, right), span)
    }

    pub(crate) fn not(&mut self, operand: ExprId, span: Span) -> ExprId {
        self.push(ExprKind::Not(operand), span)
    }

    pub(crate) fn if_(
        &mut self,
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
        span: Span,
    ) -> ExprId {
        self.push(
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            },
            span,
        )
    }

    /// Left-to-right `And` fold; `true` when `terms` is empty.
    pub(crate) fn and_all(&mut self, terms: &[ExprId], span: Span) -> ExprId {
        let Some((&first, rest)) = terms.split_first() else {
            return self.bool(true, span);
        };
        rest.iter().fold(first, |acc, &term| self.and(acc, term, span))
    }

    /// Left-to-right `Or` fold; `false` when `terms` is empty.
    pub(crate) fn or_all(&mut self, terms: &[ExprId], span: Span) -> ExprId {
        let Some((&first, rest)) = terms.split_first() else {
            return self.bool(false, span);
        };
        rest.iter().fold(first, |acc, &term| self.or(acc, term, span))
    }
}
