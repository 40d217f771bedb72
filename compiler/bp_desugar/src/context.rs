//! Per-statement transformation context.
//!
//! A [`MatchContext`] is created for every case statement (and every
//! one-line match) and dropped once that statement's output is built.
//! Nested statements get their own context, so their memo flags can never
//! suppress or reuse the enclosing statement's deconstruction.
//!
//! Within a statement, each matchee that composite patterns inspect has a
//! [`MatchScope`]: the statement matchee is scope 0 and is the only scope
//! whose deconstruction is memoized across clauses. Sub-values (array
//! elements, removed hash values) get a fresh scope per occurrence.

use bitflags::bitflags;
use bp_ir::{Name, Span, StringInterner};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

bitflags! {
    /// Which deconstructed forms of a matchee are already cached.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub(crate) struct Deconstructed: u8 {
        /// Sequence form (`deconstruct`).
        const ARRAY = 1 << 0;
        /// Key-value form (`deconstruct_keys`).
        const HASH = 1 << 1;
    }
}

/// Keys requested from `deconstruct_keys`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum KeyRequest {
    /// Unscoped request (`deconstruct_keys(nil)`).
    All,
    /// Only these keys, in first-seen order.
    Keys(SmallVec<[Name; 4]>),
}

impl KeyRequest {
    pub(crate) fn empty() -> Self {
        KeyRequest::Keys(SmallVec::new())
    }

    /// Widen this request to also cover `other`.
    pub(crate) fn merge(&mut self, other: &KeyRequest) {
        match (&mut *self, other) {
            (KeyRequest::All, _) => {}
            (_, KeyRequest::All) => *self = KeyRequest::All,
            (KeyRequest::Keys(mine), KeyRequest::Keys(theirs)) => {
                let seen: FxHashSet<Name> = mine.iter().copied().collect();
                mine.extend(theirs.iter().copied().filter(|key| !seen.contains(key)));
            }
        }
    }
}

/// Index of a scope within its context.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ScopeId(usize);

/// Synthetic variables and cache state for one matchee.
#[derive(Clone, Debug)]
pub(crate) struct MatchScope {
    /// Holds the matchee value.
    pub matchee: Name,
    /// Cached sequence form.
    pub arr: Name,
    /// Cached key-value form (never mutated).
    pub hash: Name,
    /// Per-pattern working copy of `hash`; keys are removed from it.
    pub hash_dup: Name,
    deconstructed: Deconstructed,
    /// Every deconstruction that was emitted, memoized or not.
    emitted: Deconstructed,
}

impl MatchScope {
    fn new(interner: &StringInterner, base: &str) -> Self {
        MatchScope {
            matchee: interner.intern(base),
            arr: interner.intern(&format!("{base}_arr")),
            hash: interner.intern(&format!("{base}_hash")),
            hash_dup: interner.intern(&format!("{base}_hash_dup")),
            deconstructed: Deconstructed::empty(),
            emitted: Deconstructed::empty(),
        }
    }
}

/// Transformation state for one statement.
pub(crate) struct MatchContext {
    /// Ordinal of the statement within the rewriting run.
    statement: u32,
    /// Span of the statement, used for synthetic nodes.
    span: Span,
    /// Base name of the statement's synthetic variables (`__m3`).
    base: String,
    scopes: Vec<MatchScope>,
    /// Keys requested when deconstructing the statement matchee.
    root_keys: KeyRequest,
    /// Nesting depth of positions that may be skipped at run time.
    conditional_depth: u32,
}

impl MatchContext {
    pub(crate) fn new(
        interner: &StringInterner,
        prefix: &str,
        statement: u32,
        span: Span,
    ) -> Self {
        let base = format!("{prefix}m{statement}");
        let root = MatchScope::new(interner, &base);
        MatchContext {
            statement,
            span,
            base,
            scopes: vec![root],
            root_keys: KeyRequest::empty(),
            conditional_depth: 0,
        }
    }

    pub(crate) fn statement(&self) -> u32 {
        self.statement
    }

    pub(crate) fn span(&self) -> Span {
        self.span
    }

    /// The statement matchee's scope.
    pub(crate) fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub(crate) fn scope(&self, id: ScopeId) -> &MatchScope {
        &self.scopes[id.0]
    }

    /// Allocate a scope for a sub-value (`__m3_1`, `__m3_2`, ...).
    pub(crate) fn nested_scope(&mut self, interner: &StringInterner) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        let base = format!("{}_{}", self.base, self.scopes.len());
        self.scopes.push(MatchScope::new(interner, &base));
        id
    }

    pub(crate) fn set_root_keys(&mut self, keys: KeyRequest) {
        self.root_keys = keys;
    }

    /// Keys to request for `scope`: the statement-wide union for the root,
    /// `own` otherwise.
    pub(crate) fn key_request(&self, scope: ScopeId, own: KeyRequest) -> KeyRequest {
        if scope == self.root() {
            let mut keys = self.root_keys.clone();
            keys.merge(&own);
            keys
        } else {
            own
        }
    }

    // Memoization

    /// Whether `form` of `scope` is already cached by an earlier step that
    /// is guaranteed to have run.
    pub(crate) fn is_deconstructed(&self, scope: ScopeId, form: Deconstructed) -> bool {
        self.scopes[scope.0].deconstructed.contains(form)
    }

    /// Record that a deconstruction step for `form` was emitted.
    ///
    /// Only the root scope memoizes, and only when the step sits in a
    /// position that runs whenever later clauses run.
    pub(crate) fn record_deconstruction(&mut self, scope: ScopeId, form: Deconstructed) {
        let memoize = scope == self.root() && self.conditional_depth == 0;
        let entry = &mut self.scopes[scope.0];
        entry.emitted.insert(form);
        if memoize {
            entry.deconstructed.insert(form);
        }
    }

    /// Whether any step for `form` of the root matchee was emitted.
    pub(crate) fn root_uses(&self, form: Deconstructed) -> bool {
        self.scopes[0].emitted.contains(form)
    }

    /// Enter a position that may be skipped at run time.
    pub(crate) fn enter_conditional(&mut self) {
        self.conditional_depth += 1;
    }

    pub(crate) fn leave_conditional(&mut self) {
        debug_assert!(self.conditional_depth > 0);
        self.conditional_depth = self.conditional_depth.saturating_sub(1);
    }
}
