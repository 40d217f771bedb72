//! Hash pattern builder.
//!
//! ```text
//! {a: 1, b:, **rest}
//!   → deconstruct-keys-step
//!     && (dup = hash.dup; true)
//!     && (dup.key?(:a) && 1 === dup.delete(:a))
//!     && (dup.key?(:b) && (b = dup.delete(:b); true))
//!     && (rest = dup; true)
//! ```
//!
//! Key lookup removes the key, so every pattern occurrence works on its own
//! copy (`dup`) of the cached key-value form (`hash`), which is never
//! mutated. A rest marker sees exactly the keys no entry consumed.

use bp_ir::{ExprId, ExprKind, MatchPattern, Name, PatternId, PatternRange, Span};
use smallvec::SmallVec;
use tracing::trace;

use super::dispatch::Subject;
use super::raise::DECONSTRUCT_KEYS_MESSAGE;
use super::Desugarer;
use crate::context::{Deconstructed, KeyRequest, MatchContext, ScopeId};
use crate::DesugarError;

impl Desugarer<'_> {
    pub(crate) fn lower_hash_pattern(
        &mut self,
        ctx: &mut MatchContext,
        entries: PatternRange,
        scope: ScopeId,
        span: Span,
    ) -> Result<ExprId, DesugarError> {
        let entries = self.pattern_list(entries)?;
        // `{}` degenerates to a shape check on the matchee.
        if entries.is_empty() {
            let class = self.constant(self.names.hash_class, span);
            let matchee = self.lvar(ctx.scope(scope).matchee, span);
            return Ok(self.case_eq(class, matchee, span));
        }

        let own = self.key_request(&entries)?;
        let request = ctx.key_request(scope, own);
        let mut terms: SmallVec<[ExprId; 8]> = SmallVec::new();
        terms.push(self.deconstruct_hash(ctx, scope, &request, span));
        terms.push(self.copy_hash(ctx, scope, span));

        let mut rest = None;
        for &entry in &entries {
            let pattern = self.pattern(entry)?;
            match pattern.kind {
                MatchPattern::Pair { key, pattern } => {
                    let present = self.has_key(ctx, scope, key, span);
                    let value = self.delete_key(ctx, scope, key, span);
                    let truth = self.lower_pattern(ctx, pattern, Subject::Value(value))?;
                    terms.push(self.and(present, truth, span));
                }
                MatchPattern::Key(key) => {
                    let present = self.has_key(ctx, scope, key, span);
                    let value = self.delete_key(ctx, scope, key, span);
                    let binding = self.bind(key, value, span);
                    terms.push(self.and(present, binding, span));
                }
                // Rest runs last so it sees only unconsumed keys.
                MatchPattern::Rest(_) | MatchPattern::NilRest => rest = Some(entry),
                _ => {
                    return Err(DesugarError::MisplacedPattern {
                        span: pattern.span,
                        found: pattern.kind.describe(),
                        context: "a hash pattern",
                    });
                }
            }
        }

        if let Some(rest) = rest {
            if let Some(truth) = self.lower_hash_rest(ctx, rest, scope, span)? {
                terms.push(truth);
            }
        }

        Ok(self.and_all(&terms, span))
    }

    /// `**name` binds the working copy, `**` is a no-op, `**nil` requires it
    /// to be empty.
    fn lower_hash_rest(
        &mut self,
        ctx: &MatchContext,
        rest: PatternId,
        scope: ScopeId,
        span: Span,
    ) -> Result<Option<ExprId>, DesugarError> {
        let dup = ctx.scope(scope).hash_dup;
        match self.pattern(rest)?.kind {
            MatchPattern::NilRest => {
                let receiver = self.lvar(dup, span);
                let is_empty = self.names.is_empty;
                Ok(Some(self.send(receiver, is_empty, &[], span)))
            }
            MatchPattern::Rest(target) if !target.is_valid() => Ok(None),
            MatchPattern::Rest(target) => {
                let target = self.pattern(target)?;
                let MatchPattern::Var(name) = target.kind else {
                    return Err(DesugarError::InvalidRestTarget {
                        span: target.span,
                        found: target.kind.describe(),
                    });
                };
                let remaining = self.lvar(dup, span);
                Ok(Some(self.bind(name, remaining, span)))
            }
            _ => Ok(None),
        }
    }

    /// Keys one hash pattern needs: every named key, or all keys when a
    /// rest marker has to see the remainder.
    fn key_request(&self, entries: &[PatternId]) -> Result<KeyRequest, DesugarError> {
        let mut keys: SmallVec<[Name; 4]> = SmallVec::new();
        for &entry in entries {
            match self.pattern(entry)?.kind {
                MatchPattern::Pair { key, .. } | MatchPattern::Key(key) => {
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
                MatchPattern::Rest(_) | MatchPattern::NilRest => return Ok(KeyRequest::All),
                _ => {}
            }
        }
        Ok(KeyRequest::Keys(keys))
    }

    /// Union of the key requests of every hash pattern applied directly to
    /// the statement matchee by `pattern` (through alternatives and
    /// constant-with-subpattern).
    pub(crate) fn root_key_request(
        &self,
        pattern: PatternId,
        request: &mut KeyRequest,
    ) -> Result<(), DesugarError> {
        match self.pattern(pattern)?.kind {
            MatchPattern::Hash(entries) => {
                let entries = self.pattern_list(entries)?;
                if !entries.is_empty() {
                    request.merge(&self.key_request(&entries)?);
                }
            }
            MatchPattern::Alt(alternatives) => {
                for alternative in self.pattern_list(alternatives)? {
                    self.root_key_request(alternative, request)?;
                }
            }
            MatchPattern::ConstWith { pattern, .. } => self.root_key_request(pattern, request)?,
            _ => {}
        }
        Ok(())
    }

    /// Compute and cache the key-value form of a scope's matchee.
    ///
    /// ```text
    /// m.respond_to?(:deconstruct_keys)
    ///   && (hash = m.deconstruct_keys([:a, :b]); Hash === hash || raise TypeError, "...")
    /// ```
    pub(crate) fn deconstruct_hash(
        &mut self,
        ctx: &mut MatchContext,
        scope: ScopeId,
        request: &KeyRequest,
        span: Span,
    ) -> ExprId {
        let names = ctx.scope(scope).clone();
        let class = self.constant(self.names.hash_class, span);
        let cached = self.lvar(names.hash, span);
        let shape = self.case_eq(class, cached, span);

        if ctx.is_deconstructed(scope, Deconstructed::HASH) {
            trace!(statement = ctx.statement(), "key-value form already cached");
            return shape;
        }
        trace!(
            statement = ctx.statement(),
            all_keys = matches!(request, KeyRequest::All),
            "emitting key-value deconstruction"
        );
        ctx.record_deconstruction(scope, Deconstructed::HASH);

        let matchee = self.lvar(names.matchee, span);
        let protocol = self.sym(self.names.deconstruct_keys, span);
        let respond_to = self.names.respond_to;
        let responds = self.send(matchee, respond_to, &[protocol], span);

        let keys = match request {
            KeyRequest::All => self.nil(span),
            KeyRequest::Keys(keys) => {
                let syms: SmallVec<[ExprId; 4]> =
                    keys.iter().map(|&key| self.sym(key, span)).collect();
                let list = self.arena.alloc_expr_list(syms);
                self.push(ExprKind::Array(list), span)
            }
        };
        let matchee = self.lvar(names.matchee, span);
        let deconstruct_keys = self.names.deconstruct_keys;
        let call = self.send(matchee, deconstruct_keys, &[keys], span);
        let store = self.assign(names.hash, call, span);
        let error = self.raise_type_error(DECONSTRUCT_KEYS_MESSAGE, span);
        let checked = self.or(shape, error, span);
        let step = self.begin(&[store, checked], span);
        self.and(responds, step, span)
    }

    /// `(dup = hash.dup; true)`, emitted for every pattern occurrence.
    fn copy_hash(&mut self, ctx: &MatchContext, scope: ScopeId, span: Span) -> ExprId {
        let names = ctx.scope(scope);
        let (hash, hash_dup) = (names.hash, names.hash_dup);
        let source = self.lvar(hash, span);
        let dup = self.names.dup;
        let copy = self.send(source, dup, &[], span);
        self.bind(hash_dup, copy, span)
    }

    fn has_key(
        &mut self,
        ctx: &MatchContext,
        scope: ScopeId,
        key: Name,
        span: Span,
    ) -> ExprId {
        let receiver = self.lvar(ctx.scope(scope).hash_dup, span);
        let key = self.sym(key, span);
        let has_key = self.names.has_key;
        self.send(receiver, has_key, &[key], span)
    }

    fn delete_key(
        &mut self,
        ctx: &MatchContext,
        scope: ScopeId,
        key: Name,
        span: Span,
    ) -> ExprId {
        let receiver = self.lvar(ctx.scope(scope).hash_dup, span);
        let key = self.sym(key, span);
        let delete = self.names.delete;
        self.send(receiver, delete, &[key], span)
    }
}
