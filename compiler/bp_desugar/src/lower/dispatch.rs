//! Pattern dispatcher.
//!
//! Maps each [`MatchPattern`] kind to the rule that builds its truth
//! expression. The match below is the kind → handler table; it is
//! exhaustive, so a new pattern kind cannot be silently ignored.

use bp_ir::{ExprId, MatchPattern, Pattern, PatternId, PatternRange, Span};

use super::Desugarer;
use crate::context::{MatchContext, ScopeId};
use crate::DesugarError;

/// What a pattern is matched against.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Subject {
    /// A bound matchee; read it through its synthetic variable.
    Scope(ScopeId),
    /// An output expression computing the value. Evaluated at most once.
    Value(ExprId),
}

impl Desugarer<'_> {
    /// Build the truth expression of `pattern` against `subject`.
    pub(crate) fn lower_pattern(
        &mut self,
        ctx: &mut MatchContext,
        pattern: PatternId,
        subject: Subject,
    ) -> Result<ExprId, DesugarError> {
        bp_stack::ensure_sufficient_stack(|| self.lower_pattern_inner(ctx, pattern, subject))
    }

    fn lower_pattern_inner(
        &mut self,
        ctx: &mut MatchContext,
        pattern: PatternId,
        subject: Subject,
    ) -> Result<ExprId, DesugarError> {
        let Pattern { kind, span } = self.pattern(pattern)?;
        match kind {
            MatchPattern::Value(value) | MatchPattern::Pin(value) => {
                let test = self.lower_expr(value)?;
                let subject = self.subject_expr(ctx, subject, span);
                Ok(self.case_eq(test, subject, span))
            }
            MatchPattern::Var(name) => {
                let subject = self.subject_expr(ctx, subject, span);
                Ok(self.bind(name, subject, span))
            }
            MatchPattern::Alt(alternatives) => {
                let (setup, scope) = self.bind_scope(ctx, subject, span);
                let truth = self.lower_alternatives(ctx, alternatives, scope, span)?;
                Ok(self.with_setup(setup, truth, span))
            }
            MatchPattern::ConstWith { constant, pattern } => {
                let (setup, scope) = self.bind_scope(ctx, subject, span);
                let constant = self.lower_expr(constant)?;
                let matchee = self.lvar(ctx.scope(scope).matchee, span);
                let test = self.case_eq(constant, matchee, span);
                // Only reached when the constant test passes.
                ctx.enter_conditional();
                let inner = self.lower_pattern(ctx, pattern, Subject::Scope(scope));
                ctx.leave_conditional();
                let truth = self.and(test, inner?, span);
                Ok(self.with_setup(setup, truth, span))
            }
            MatchPattern::Array(elements) => {
                let (setup, scope) = self.bind_scope(ctx, subject, span);
                let truth = self.lower_array_pattern(ctx, elements, scope, span)?;
                Ok(self.with_setup(setup, truth, span))
            }
            MatchPattern::Hash(entries) => {
                let (setup, scope) = self.bind_scope(ctx, subject, span);
                let truth = self.lower_hash_pattern(ctx, entries, scope, span)?;
                Ok(self.with_setup(setup, truth, span))
            }
            MatchPattern::Rest(_)
            | MatchPattern::Pair { .. }
            | MatchPattern::Key(_)
            | MatchPattern::NilRest => Err(DesugarError::MisplacedPattern {
                span,
                found: kind.describe(),
                context: "this position",
            }),
        }
    }

    /// `alt1 | alt2 | ...` against a bound scope.
    ///
    /// Only the first alternative is guaranteed to run.
    fn lower_alternatives(
        &mut self,
        ctx: &mut MatchContext,
        alternatives: PatternRange,
        scope: ScopeId,
        span: Span,
    ) -> Result<ExprId, DesugarError> {
        let alternatives = self.pattern_list(alternatives)?;
        let mut truths = Vec::with_capacity(alternatives.len());
        for (i, &alternative) in alternatives.iter().enumerate() {
            if i > 0 {
                ctx.enter_conditional();
            }
            let truth = self.lower_pattern(ctx, alternative, Subject::Scope(scope));
            if i > 0 {
                ctx.leave_conditional();
            }
            truths.push(truth?);
        }
        Ok(self.or_all(&truths, span))
    }

    /// An expression reading the subject's value.
    pub(crate) fn subject_expr(
        &mut self,
        ctx: &MatchContext,
        subject: Subject,
        span: Span,
    ) -> ExprId {
        match subject {
            Subject::Scope(scope) => self.lvar(ctx.scope(scope).matchee, span),
            Subject::Value(value) => value,
        }
    }

    /// Make sure the subject lives in a scope, binding a computed value to
    /// a fresh one. Returns the binding step, if one was needed.
    fn bind_scope(
        &mut self,
        ctx: &mut MatchContext,
        subject: Subject,
        span: Span,
    ) -> (Option<ExprId>, ScopeId) {
        match subject {
            Subject::Scope(scope) => (None, scope),
            Subject::Value(value) => {
                let scope = ctx.nested_scope(self.interner);
                let binding = self.bind(ctx.scope(scope).matchee, value, span);
                (Some(binding), scope)
            }
        }
    }

    fn with_setup(&mut self, setup: Option<ExprId>, truth: ExprId, span: Span) -> ExprId {
        match setup {
            Some(setup) => self.and(setup, truth, span),
            None => truth,
        }
    }

    // Source access

    pub(crate) fn pattern(&self, id: PatternId) -> Result<Pattern, DesugarError> {
        self.src
            .try_get_pattern(id)
            .copied()
            .ok_or(DesugarError::InvalidHandle {
                what: "pattern",
                index: id.raw(),
            })
    }

    pub(crate) fn pattern_list(&self, range: PatternRange) -> Result<Vec<PatternId>, DesugarError> {
        if self.src.pattern_list_in_bounds(range) {
            Ok(self.src.get_pattern_list(range).to_vec())
        } else {
            Err(DesugarError::InvalidHandle {
                what: "pattern list",
                index: range.start,
            })
        }
    }
}
