//! Array pattern builder.
//!
//! ```text
//! [p0, p1, *rest, s0, s1]
//!   → deconstruct-step
//!     && arr.length >= 4
//!     && p0 === arr[0] && p1 === arr[1]
//!     && (rest = arr[2..-3]; true)
//!     && s0 === arr[-2] && s1 === arr[-1]
//! ```
//!
//! Suffix elements are addressed from the end, so the same truth works for
//! any sequence length the length check admits.

use bp_ir::{ExprId, ExprKind, MatchPattern, PatternId, PatternRange, Span};
use smallvec::SmallVec;
use tracing::trace;

use super::dispatch::Subject;
use super::raise::DECONSTRUCT_MESSAGE;
use super::Desugarer;
use crate::context::{Deconstructed, MatchContext, ScopeId};
use crate::DesugarError;

impl Desugarer<'_> {
    pub(crate) fn lower_array_pattern(
        &mut self,
        ctx: &mut MatchContext,
        elements: PatternRange,
        scope: ScopeId,
        span: Span,
    ) -> Result<ExprId, DesugarError> {
        let elements = self.pattern_list(elements)?;
        let mut rest_at = None;
        for (i, &element) in elements.iter().enumerate() {
            let pattern = self.pattern(element)?;
            match pattern.kind {
                MatchPattern::Rest(_) if rest_at.is_none() => rest_at = Some(i),
                MatchPattern::Pair { .. } | MatchPattern::Key(_) | MatchPattern::NilRest => {
                    return Err(DesugarError::MisplacedPattern {
                        span: pattern.span,
                        found: pattern.kind.describe(),
                        context: "an array pattern",
                    });
                }
                _ => {}
            }
        }

        let mut terms: SmallVec<[ExprId; 8]> = SmallVec::new();
        terms.push(self.deconstruct_array(ctx, scope, span));

        let fixed = elements.len() - usize::from(rest_at.is_some());
        terms.push(self.length_check(ctx, scope, fixed, rest_at.is_some(), span));

        let Some(rest_at) = rest_at else {
            for (i, &element) in elements.iter().enumerate() {
                terms.push(self.lower_element(ctx, element, scope, signed(i), span)?);
            }
            return Ok(self.and_all(&terms, span));
        };

        for (i, &element) in elements[..rest_at].iter().enumerate() {
            terms.push(self.lower_element(ctx, element, scope, signed(i), span)?);
        }

        let suffix = &elements[rest_at + 1..];
        let rest = self.lower_array_rest(ctx, elements[rest_at], scope, rest_at, suffix.len(), span);
        if let Some(binding) = rest? {
            terms.push(binding);
        }

        for (k, &element) in suffix.iter().enumerate() {
            let index = -signed(suffix.len() - k);
            terms.push(self.lower_element(ctx, element, scope, index, span)?);
        }

        Ok(self.and_all(&terms, span))
    }

    /// Truth of one element pattern against `arr[index]`.
    fn lower_element(
        &mut self,
        ctx: &mut MatchContext,
        element: PatternId,
        scope: ScopeId,
        index: i64,
        span: Span,
    ) -> Result<ExprId, DesugarError> {
        let value = self.array_index(ctx, scope, index, span);
        self.lower_pattern(ctx, element, Subject::Value(value))
    }

    /// Binding for the rest marker, `None` for a bare `*`.
    ///
    /// The slice runs from the first unconsumed position to just before the
    /// suffix: `arr[start..-(suffix_len + 1)]`.
    fn lower_array_rest(
        &mut self,
        ctx: &MatchContext,
        rest: PatternId,
        scope: ScopeId,
        start: usize,
        suffix_len: usize,
        span: Span,
    ) -> Result<Option<ExprId>, DesugarError> {
        let rest = self.pattern(rest)?;
        let MatchPattern::Rest(target) = rest.kind else {
            return Ok(None);
        };
        if !target.is_valid() {
            return Ok(None);
        }
        let target = self.pattern(target)?;
        let MatchPattern::Var(name) = target.kind else {
            return Err(DesugarError::InvalidRestTarget {
                span: target.span,
                found: target.kind.describe(),
            });
        };

        let from = self.int(signed(start), span);
        let to = self.int(-signed(suffix_len + 1), span);
        let range = self.push(
            ExprKind::Range {
                start: from,
                end: to,
                exclusive: false,
            },
            span,
        );
        let arr = self.lvar(ctx.scope(scope).arr, span);
        let index = self.names.index;
        let slice = self.send(arr, index, &[range], span);
        Ok(Some(self.bind(name, slice, span)))
    }

    /// `arr.length == n`, or `arr.length >= n` when a rest marker is present.
    fn length_check(
        &mut self,
        ctx: &MatchContext,
        scope: ScopeId,
        fixed: usize,
        has_rest: bool,
        span: Span,
    ) -> ExprId {
        let arr = self.lvar(ctx.scope(scope).arr, span);
        let length = self.names.length;
        let len = self.send(arr, length, &[], span);
        let expected = self.int(signed(fixed), span);
        let op = if has_rest { self.names.ge } else { self.names.eq };
        self.send(len, op, &[expected], span)
    }

    fn array_index(
        &mut self,
        ctx: &MatchContext,
        scope: ScopeId,
        index: i64,
        span: Span,
    ) -> ExprId {
        let arr = self.lvar(ctx.scope(scope).arr, span);
        let index_expr = self.int(index, span);
        let method = self.names.index;
        self.send(arr, method, &[index_expr], span)
    }

    /// Compute and cache the sequence form of a scope's matchee.
    ///
    /// ```text
    /// m.respond_to?(:deconstruct)
    ///   && (arr = m.deconstruct; Array === arr || raise TypeError, "...")
    /// ```
    ///
    /// Once the root scope's step is known to have run, later patterns only
    /// re-check `Array === arr`, which is false if the protocol was missing.
    pub(crate) fn deconstruct_array(
        &mut self,
        ctx: &mut MatchContext,
        scope: ScopeId,
        span: Span,
    ) -> ExprId {
        let names = ctx.scope(scope).clone();
        let class = self.constant(self.names.array_class, span);
        let cached = self.lvar(names.arr, span);
        let shape = self.case_eq(class, cached, span);

        if ctx.is_deconstructed(scope, Deconstructed::ARRAY) {
            trace!(statement = ctx.statement(), "sequence form already cached");
            return shape;
        }
        trace!(statement = ctx.statement(), "emitting sequence deconstruction");
        ctx.record_deconstruction(scope, Deconstructed::ARRAY);

        let matchee = self.lvar(names.matchee, span);
        let protocol = self.sym(self.names.deconstruct, span);
        let respond_to = self.names.respond_to;
        let responds = self.send(matchee, respond_to, &[protocol], span);

        let matchee = self.lvar(names.matchee, span);
        let deconstruct = self.names.deconstruct;
        let call = self.send(matchee, deconstruct, &[], span);
        let store = self.assign(names.arr, call, span);
        let error = self.raise_type_error(DECONSTRUCT_MESSAGE, span);
        let checked = self.or(shape, error, span);
        let step = self.begin(&[store, checked], span);
        self.and(responds, step, span)
    }
}

#[expect(
    clippy::cast_possible_wrap,
    reason = "pattern element counts are bounded by the u32 arena index space"
)]
fn signed(n: usize) -> i64 {
    n as i64
}
