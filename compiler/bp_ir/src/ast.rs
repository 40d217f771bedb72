//! Node kinds for the input and output grammar.
//!
//! A single [`ExprKind`] enum covers both sides of the rewrite. The sugar
//! variants (`CaseMatch`, `MatchPredicate`, `MatchAssert`) only appear in
//! input trees; everything else is shared. Patterns form their own closed
//! enum, [`MatchPattern`], stored in a separate arena table.

use crate::{ClauseRange, ExprId, ExprRange, Name, PatternId, PatternRange, Span};

/// Expression node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Expression kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExprKind {
    // Atoms
    Nil,
    True,
    False,
    Int(i64),
    Str(Name),
    Sym(Name),
    /// Local variable read. Reading a never-assigned local yields `nil`.
    Lvar(Name),
    /// Constant reference, e.g. `Array`, `Point`.
    Const(Name),
    /// Array literal.
    Array(ExprRange),
    /// Hash literal; every element is a `Pair`.
    Hash(ExprRange),
    /// `key => value` inside a hash literal.
    Pair { key: ExprId, value: ExprId },
    /// `start..end` / `start...end`. Either bound may be `INVALID` (open).
    Range {
        start: ExprId,
        end: ExprId,
        exclusive: bool,
    },

    // Output grammar
    /// Local assignment; evaluates to the assigned value.
    Assign { name: Name, value: ExprId },
    /// Conditional. `else_branch` may be `INVALID` (evaluates to `nil`).
    If {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    And(ExprId, ExprId),
    Or(ExprId, ExprId),
    Not(ExprId),
    /// Method or operator invocation. `receiver` is `INVALID` for a
    /// receiverless call.
    Send {
        receiver: ExprId,
        method: Name,
        args: ExprRange,
    },
    /// Sequencing; evaluates to the last expression (`nil` when empty).
    Begin(ExprRange),
    /// Raise an exception of the named class with a message expression.
    Raise { class: Name, message: ExprId },

    // Input grammar (sugar)
    /// `case matchee; in ...; else ...; end`
    CaseMatch {
        matchee: ExprId,
        clauses: ClauseRange,
    },
    /// One-line `value in pattern`; evaluates to a boolean.
    MatchPredicate { value: ExprId, pattern: PatternId },
    /// One-line `value => pattern`; raises when the pattern fails.
    MatchAssert { value: ExprId, pattern: PatternId },

    /// Placeholder produced by error recovery upstream.
    Error,
}

impl ExprKind {
    /// Check whether this node belongs to the input-only grammar.
    pub const fn is_sugar(&self) -> bool {
        matches!(
            self,
            ExprKind::CaseMatch { .. }
                | ExprKind::MatchPredicate { .. }
                | ExprKind::MatchAssert { .. }
        )
    }
}

/// One element of a case statement's clause list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaseClause {
    /// `in pattern [if|unless guard] then body`
    In(InClause),
    /// Trailing `else body`. `INVALID` body means an empty `else`.
    Else { body: ExprId, span: Span },
}

impl CaseClause {
    pub const fn span(&self) -> Span {
        match self {
            CaseClause::In(clause) => clause.span,
            CaseClause::Else { span, .. } => *span,
        }
    }
}

/// An `in` clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InClause {
    pub pattern: PatternId,
    pub guard: Option<Guard>,
    /// `INVALID` means an empty body (evaluates to `nil`).
    pub body: ExprId,
    pub span: Span,
}

/// Guard polarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GuardKind {
    /// `if cond`
    If,
    /// `unless cond`
    Unless,
}

/// Clause guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Guard {
    pub kind: GuardKind,
    pub cond: ExprId,
}

/// Pattern node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pattern {
    pub kind: MatchPattern,
    pub span: Span,
}

/// Pattern kinds.
///
/// `Pair`, `Key` and `NilRest` are only meaningful as direct children of
/// `Hash`; `Rest` only as a direct child of `Array` or `Hash`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchPattern {
    /// Literal, expression, range or qualified constant: `1`, `"a"`, `1..5`, `Foo::Bar`.
    Value(ExprId),
    /// Bound variable: `x`.
    Var(Name),
    /// Pinned variable or expression: `^x`, `^(a + 1)`.
    Pin(ExprId),
    /// Alternation: `a | b | c`.
    Alt(PatternRange),
    /// Array pattern: `[a, *rest, b]`.
    Array(PatternRange),
    /// Hash pattern: `{a:, b: Integer, **rest}`.
    Hash(PatternRange),
    /// Constant with sub-pattern: `Point(x, y)`, `Point[x:, y:]`.
    ConstWith { constant: ExprId, pattern: PatternId },
    /// Rest marker: `*name` / `*` in arrays, `**name` / `**` in hashes.
    /// The target, when present, should be a `Var`.
    Rest(PatternId),
    /// `key: subpattern`
    Pair { key: Name, pattern: PatternId },
    /// `key:` shorthand, binding the value to a local of the same name.
    Key(Name),
    /// `**nil`: no keys beyond the named ones.
    NilRest,
}

impl MatchPattern {
    /// Short human-readable kind, used in diagnostics.
    pub const fn describe(&self) -> &'static str {
        match self {
            MatchPattern::Value(_) => "value pattern",
            MatchPattern::Var(_) => "variable pattern",
            MatchPattern::Pin(_) => "pinned pattern",
            MatchPattern::Alt(_) => "alternative pattern",
            MatchPattern::Array(_) => "array pattern",
            MatchPattern::Hash(_) => "hash pattern",
            MatchPattern::ConstWith { .. } => "constant pattern",
            MatchPattern::Rest(_) => "rest pattern",
            MatchPattern::Pair { .. } => "key-value pattern",
            MatchPattern::Key(_) => "key pattern",
            MatchPattern::NilRest => "`**nil` pattern",
        }
    }
}
