//! Clause chain builder and the one-line match forms.
//!
//! ```text
//! case v
//! in p1 if g1 then b1
//! in p2 then b2
//! else b3
//! end
//!
//! → (m = v; arr = nil; hash = nil;
//!    if p1 && g1 then b1 elsif p2 then b2 else b3 end)
//! ```
//!
//! Conditions are built first-clause-first so the deconstruction memo is
//! set by the earliest clause that needs it; the `If` chain is then folded
//! from the right.

use bp_ir::{CaseClause, ClauseRange, ExprId, Guard, GuardKind, InClause, PatternId, Span};
use smallvec::SmallVec;
use tracing::debug;

use super::dispatch::Subject;
use super::Desugarer;
use crate::context::{Deconstructed, KeyRequest, MatchContext};
use crate::feature::Feature;
use crate::DesugarError;

/// One lowered `in` clause.
struct Arm {
    cond: ExprId,
    body: ExprId,
    span: Span,
}

impl Desugarer<'_> {
    /// Rewrite `case matchee; in ...; end`.
    pub(crate) fn lower_case(
        &mut self,
        matchee: ExprId,
        clauses: ClauseRange,
        span: Span,
    ) -> Result<ExprId, DesugarError> {
        let clauses = self.clauses(clauses)?;
        check_default_last(&clauses)?;

        // The matchee may contain statements of its own; they finish before
        // this statement's context exists.
        let value = self.lower_expr(matchee)?;
        let mut ctx = self.begin_statement(span);
        let root = ctx.root();

        let mut keys = KeyRequest::empty();
        for clause in &clauses {
            if let CaseClause::In(clause) = clause {
                self.root_key_request(clause.pattern, &mut keys)?;
            }
        }
        ctx.set_root_keys(keys);

        let mut arms: SmallVec<[Arm; 4]> = SmallVec::new();
        let mut default = None;
        for &clause in &clauses {
            match clause {
                CaseClause::In(InClause {
                    pattern,
                    guard,
                    body,
                    span: clause_span,
                }) => {
                    let truth = self.lower_pattern(&mut ctx, pattern, Subject::Scope(root))?;
                    let cond = self.compose_guard(truth, guard, clause_span)?;
                    let body = self.lower_optional(body)?;
                    arms.push(Arm {
                        cond,
                        body,
                        span: clause_span,
                    });
                }
                CaseClause::Else { body, .. } => default = Some(self.lower_optional(body)?),
            }
        }

        let has_default = default.is_some();
        let fallback = match default {
            Some(body) => body,
            None => self.raise_no_match(ctx.scope(root).matchee, span),
        };
        let chain = arms.iter().rev().fold(fallback, |else_branch, arm| {
            self.if_(arm.cond, arm.body, else_branch, arm.span)
        });

        debug!(
            statement = ctx.statement(),
            clauses = arms.len(),
            has_default,
            "rewrote case statement"
        );
        Ok(self.finish_statement(&ctx, value, chain))
    }

    /// Rewrite `value in pattern` to the pattern's truth as a boolean.
    pub(crate) fn lower_match_predicate(
        &mut self,
        value: ExprId,
        pattern: PatternId,
        span: Span,
    ) -> Result<ExprId, DesugarError> {
        let value = self.lower_expr(value)?;
        let mut ctx = self.begin_statement(span);
        let truth = self.lower_single_pattern(&mut ctx, pattern)?;
        let yes = self.bool(true, span);
        let no = self.bool(false, span);
        let result = self.if_(truth, yes, no, span);
        debug!(statement = ctx.statement(), "rewrote match predicate");
        Ok(self.finish_statement(&ctx, value, result))
    }

    /// Rewrite `value => pattern`: `nil` on a match, a no-match raise
    /// otherwise.
    pub(crate) fn lower_match_assert(
        &mut self,
        value: ExprId,
        pattern: PatternId,
        span: Span,
    ) -> Result<ExprId, DesugarError> {
        let value = self.lower_expr(value)?;
        let mut ctx = self.begin_statement(span);
        let truth = self.lower_single_pattern(&mut ctx, pattern)?;
        let matched = self.nil(span);
        let raise = self.raise_no_match(ctx.scope(ctx.root()).matchee, span);
        let result = self.if_(truth, matched, raise, span);
        debug!(statement = ctx.statement(), "rewrote match assertion");
        Ok(self.finish_statement(&ctx, value, result))
    }

    fn lower_single_pattern(
        &mut self,
        ctx: &mut MatchContext,
        pattern: PatternId,
    ) -> Result<ExprId, DesugarError> {
        let mut keys = KeyRequest::empty();
        self.root_key_request(pattern, &mut keys)?;
        ctx.set_root_keys(keys);
        let root = ctx.root();
        self.lower_pattern(ctx, pattern, Subject::Scope(root))
    }

    /// `truth && guard`, or `!(truth && guard)` for `unless`.
    fn compose_guard(
        &mut self,
        truth: ExprId,
        guard: Option<Guard>,
        span: Span,
    ) -> Result<ExprId, DesugarError> {
        let Some(Guard { kind, cond }) = guard else {
            return Ok(truth);
        };
        let cond = self.lower_expr(cond)?;
        let both = self.and(truth, cond, span);
        Ok(match kind {
            GuardKind::If => both,
            GuardKind::Unless => self.not(both, span),
        })
    }

    /// Allocate the next statement ordinal and a fresh context for it.
    fn begin_statement(&mut self, span: Span) -> MatchContext {
        let ordinal = self.statements;
        self.statements += 1;
        MatchContext::new(self.interner, &self.options.var_prefix, ordinal, span)
    }

    /// `(m = value; <cache resets>; body)`, then notify collaborators.
    ///
    /// Caches read through the memo are reset first, so a statement run
    /// repeatedly never sees a previous run's deconstruction.
    fn finish_statement(&mut self, ctx: &MatchContext, value: ExprId, body: ExprId) -> ExprId {
        let span = ctx.span();
        let root = ctx.scope(ctx.root()).clone();
        let mut exprs: SmallVec<[ExprId; 4]> = SmallVec::new();
        exprs.push(self.assign(root.matchee, value, span));
        if ctx.root_uses(Deconstructed::ARRAY) {
            let nil = self.nil(span);
            exprs.push(self.assign(root.arr, nil, span));
        }
        if ctx.root_uses(Deconstructed::HASH) {
            let nil = self.nil(span);
            exprs.push(self.assign(root.hash, nil, span));
        }
        exprs.push(body);
        let statement = self.begin(&exprs, span);

        self.collaborators.statement_rewritten(Feature::PatternMatching, span);
        self.collaborators.runtime_support_required(Feature::PatternMatching);
        statement
    }

    fn clauses(&self, range: ClauseRange) -> Result<Vec<CaseClause>, DesugarError> {
        if self.src.clauses_in_bounds(range) {
            Ok(self.src.get_clauses(range).to_vec())
        } else {
            Err(DesugarError::InvalidHandle {
                what: "clause list",
                index: range.start,
            })
        }
    }
}

/// An `else` clause must be the last one.
fn check_default_last(clauses: &[CaseClause]) -> Result<(), DesugarError> {
    for pair in clauses.windows(2) {
        if let CaseClause::Else { span, .. } = pair[0] {
            return Err(DesugarError::DefaultNotLast {
                span,
                next: pair[1].span(),
            });
        }
    }
    Ok(())
}
