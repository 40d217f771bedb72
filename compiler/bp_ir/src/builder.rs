//! Convenience construction of syntax trees.
//!
//! Hosts that parse source text (and tests) build input trees through
//! [`AstBuilder`] instead of assembling arena records by hand. Every node
//! gets the builder's current span; use [`AstBuilder::at`] to change it.

use crate::ast::{CaseClause, ExprKind, Guard, GuardKind, InClause, MatchPattern, Pattern};
use crate::{ExprArena, ExprId, PatternId, Span, StringInterner};

/// Builder over an arena and interner.
pub struct AstBuilder<'a> {
    pub arena: &'a mut ExprArena,
    pub interner: &'a StringInterner,
    span: Span,
}

impl<'a> AstBuilder<'a> {
    pub fn new(arena: &'a mut ExprArena, interner: &'a StringInterner) -> Self {
        AstBuilder {
            arena,
            interner,
            span: Span::DUMMY,
        }
    }

    /// Set the span attached to subsequently built nodes.
    pub fn at(&mut self, span: Span) -> &mut Self {
        self.span = span;
        self
    }

    fn expr(&mut self, kind: ExprKind) -> ExprId {
        self.arena.push(kind, self.span)
    }

    fn pattern(&mut self, kind: MatchPattern) -> PatternId {
        self.arena.alloc_pattern(Pattern {
            kind,
            span: self.span,
        })
    }

    // Expressions

    pub fn nil(&mut self) -> ExprId {
        self.expr(ExprKind::Nil)
    }

    pub fn bool(&mut self, value: bool) -> ExprId {
        self.expr(if value { ExprKind::True } else { ExprKind::False })
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.expr(ExprKind::Int(value))
    }

    pub fn str(&mut self, value: &str) -> ExprId {
        let name = self.interner.intern(value);
        self.expr(ExprKind::Str(name))
    }

    pub fn sym(&mut self, value: &str) -> ExprId {
        let name = self.interner.intern(value);
        self.expr(ExprKind::Sym(name))
    }

    pub fn lvar(&mut self, name: &str) -> ExprId {
        let name = self.interner.intern(name);
        self.expr(ExprKind::Lvar(name))
    }

    pub fn constant(&mut self, name: &str) -> ExprId {
        let name = self.interner.intern(name);
        self.expr(ExprKind::Const(name))
    }

    pub fn assign(&mut self, name: &str, value: ExprId) -> ExprId {
        let name = self.interner.intern(name);
        self.expr(ExprKind::Assign { name, value })
    }

    pub fn array(&mut self, elements: impl IntoIterator<Item = ExprId>) -> ExprId {
        let range = self.arena.alloc_expr_list(elements);
        self.expr(ExprKind::Array(range))
    }

    /// Hash literal with symbol keys.
    pub fn hash<'k>(&mut self, entries: impl IntoIterator<Item = (&'k str, ExprId)>) -> ExprId {
        let pairs: Vec<ExprId> = entries
            .into_iter()
            .map(|(key, value)| {
                let key = self.sym(key);
                self.expr(ExprKind::Pair { key, value })
            })
            .collect();
        let range = self.arena.alloc_expr_list(pairs);
        self.expr(ExprKind::Hash(range))
    }

    pub fn range(&mut self, start: ExprId, end: ExprId, exclusive: bool) -> ExprId {
        self.expr(ExprKind::Range {
            start,
            end,
            exclusive,
        })
    }

    pub fn send(
        &mut self,
        receiver: ExprId,
        method: &str,
        args: impl IntoIterator<Item = ExprId>,
    ) -> ExprId {
        let method = self.interner.intern(method);
        let args = self.arena.alloc_expr_list(args);
        self.expr(ExprKind::Send {
            receiver,
            method,
            args,
        })
    }

    pub fn begin(&mut self, exprs: impl IntoIterator<Item = ExprId>) -> ExprId {
        let range = self.arena.alloc_expr_list(exprs);
        self.expr(ExprKind::Begin(range))
    }

    // Statements

    pub fn case_match(
        &mut self,
        matchee: ExprId,
        clauses: impl IntoIterator<Item = CaseClause>,
    ) -> ExprId {
        let clauses = self.arena.alloc_clauses(clauses);
        self.expr(ExprKind::CaseMatch { matchee, clauses })
    }

    pub fn match_predicate(&mut self, value: ExprId, pattern: PatternId) -> ExprId {
        self.expr(ExprKind::MatchPredicate { value, pattern })
    }

    pub fn match_assert(&mut self, value: ExprId, pattern: PatternId) -> ExprId {
        self.expr(ExprKind::MatchAssert { value, pattern })
    }

    pub fn in_clause(&self, pattern: PatternId, body: ExprId) -> CaseClause {
        CaseClause::In(InClause {
            pattern,
            guard: None,
            body,
            span: self.span,
        })
    }

    pub fn guarded_clause(
        &self,
        pattern: PatternId,
        kind: GuardKind,
        cond: ExprId,
        body: ExprId,
    ) -> CaseClause {
        CaseClause::In(InClause {
            pattern,
            guard: Some(Guard { kind, cond }),
            body,
            span: self.span,
        })
    }

    pub fn else_clause(&self, body: ExprId) -> CaseClause {
        CaseClause::Else {
            body,
            span: self.span,
        }
    }

    // Patterns

    pub fn p_value(&mut self, value: ExprId) -> PatternId {
        self.pattern(MatchPattern::Value(value))
    }

    pub fn p_int(&mut self, value: i64) -> PatternId {
        let value = self.int(value);
        self.p_value(value)
    }

    pub fn p_const(&mut self, name: &str) -> PatternId {
        let value = self.constant(name);
        self.p_value(value)
    }

    pub fn p_var(&mut self, name: &str) -> PatternId {
        let name = self.interner.intern(name);
        self.pattern(MatchPattern::Var(name))
    }

    pub fn p_pin(&mut self, value: ExprId) -> PatternId {
        self.pattern(MatchPattern::Pin(value))
    }

    pub fn p_alt(&mut self, alternatives: impl IntoIterator<Item = PatternId>) -> PatternId {
        let range = self.arena.alloc_pattern_list(alternatives);
        self.pattern(MatchPattern::Alt(range))
    }

    pub fn p_array(&mut self, elements: impl IntoIterator<Item = PatternId>) -> PatternId {
        let range = self.arena.alloc_pattern_list(elements);
        self.pattern(MatchPattern::Array(range))
    }

    pub fn p_hash(&mut self, entries: impl IntoIterator<Item = PatternId>) -> PatternId {
        let range = self.arena.alloc_pattern_list(entries);
        self.pattern(MatchPattern::Hash(range))
    }

    pub fn p_const_with(&mut self, constant: &str, pattern: PatternId) -> PatternId {
        let constant = self.constant(constant);
        self.pattern(MatchPattern::ConstWith { constant, pattern })
    }

    /// `*name` / `**name`, or a bare `*` / `**` when `name` is `None`.
    pub fn p_rest(&mut self, name: Option<&str>) -> PatternId {
        let target = match name {
            Some(name) => self.p_var(name),
            None => PatternId::INVALID,
        };
        self.pattern(MatchPattern::Rest(target))
    }

    /// Rest marker with an arbitrary target pattern.
    pub fn p_rest_of(&mut self, target: PatternId) -> PatternId {
        self.pattern(MatchPattern::Rest(target))
    }

    pub fn p_pair(&mut self, key: &str, pattern: PatternId) -> PatternId {
        let key = self.interner.intern(key);
        self.pattern(MatchPattern::Pair { key, pattern })
    }

    pub fn p_key(&mut self, key: &str) -> PatternId {
        let key = self.interner.intern(key);
        self.pattern(MatchPattern::Key(key))
    }

    pub fn p_nil_rest(&mut self) -> PatternId {
        self.pattern(MatchPattern::NilRest)
    }
}
