//! Arena storage for syntax trees.
//!
//! - Contiguous storage for all expressions and patterns
//! - Child references use `ExprId` / `PatternId` indices
//! - Lists use `(start, len)` ranges into flattened side tables
//!
//! The rewriter reads one arena and writes a fresh one, so input and output
//! trees never share storage.

use smallvec::SmallVec;

use crate::ast::{CaseClause, Expr, ExprKind, Pattern};
use crate::{ClauseRange, ExprId, ExprRange, PatternId, PatternRange, Span};

/// Contiguous storage for one syntax tree (or a forest of them).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExprArena {
    /// All expressions (indexed by `ExprId`).
    exprs: Vec<Expr>,
    /// Flattened expression lists (call args, array elements, sequences).
    expr_lists: Vec<ExprId>,
    /// All patterns (indexed by `PatternId`).
    patterns: Vec<Pattern>,
    /// Flattened pattern lists (array/hash/alternative children).
    pattern_lists: Vec<PatternId>,
    /// Case statement clauses.
    clauses: Vec<CaseClause>,
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "arena tables are bounded well below u32::MAX entries"
)]
#[inline]
fn index_u32(len: usize) -> u32 {
    len as u32
}

impl ExprArena {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with capacity for roughly `exprs` expressions.
    pub fn with_capacity(exprs: usize) -> Self {
        ExprArena {
            exprs: Vec::with_capacity(exprs),
            expr_lists: Vec::with_capacity(exprs / 2),
            patterns: Vec::new(),
            pattern_lists: Vec::new(),
            clauses: Vec::new(),
        }
    }

    // Expressions

    /// Allocate expression, return ID.
    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(index_u32(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    /// Allocate an expression from its parts.
    #[inline]
    pub fn push(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.alloc_expr(Expr::new(kind, span))
    }

    /// Get expression by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Get expression by ID, or `None` when the handle does not resolve.
    #[inline]
    pub fn try_get_expr(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id.index())
    }

    /// Get the kind of an expression.
    #[inline]
    #[track_caller]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.exprs[id.index()].kind
    }

    /// Get the span of an expression.
    #[inline]
    #[track_caller]
    pub fn span(&self, id: ExprId) -> Span {
        self.exprs[id.index()].span
    }

    /// Number of expressions.
    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    // Expression lists

    /// Allocate expression list, return range.
    pub fn alloc_expr_list(&mut self, exprs: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = index_u32(self.expr_lists.len());
        self.expr_lists.extend(exprs);
        let len = index_u32(self.expr_lists.len()) - start;
        ExprRange::new(start, len)
    }

    /// Get expression list by range.
    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.as_range()]
    }

    /// Check that a range lies within the expression-list table.
    #[inline]
    pub fn expr_list_in_bounds(&self, range: ExprRange) -> bool {
        range.as_range().end <= self.expr_lists.len()
    }

    // Patterns

    /// Allocate pattern, return ID.
    #[inline]
    pub fn alloc_pattern(&mut self, pattern: Pattern) -> PatternId {
        let id = PatternId::new(index_u32(self.patterns.len()));
        self.patterns.push(pattern);
        id
    }

    /// Get pattern by ID.
    #[inline]
    #[track_caller]
    pub fn get_pattern(&self, id: PatternId) -> &Pattern {
        &self.patterns[id.index()]
    }

    /// Get pattern by ID, or `None` when the handle does not resolve.
    #[inline]
    pub fn try_get_pattern(&self, id: PatternId) -> Option<&Pattern> {
        self.patterns.get(id.index())
    }

    /// Allocate pattern list, return range.
    pub fn alloc_pattern_list(
        &mut self,
        patterns: impl IntoIterator<Item = PatternId>,
    ) -> PatternRange {
        let start = index_u32(self.pattern_lists.len());
        self.pattern_lists.extend(patterns);
        let len = index_u32(self.pattern_lists.len()) - start;
        PatternRange::new(start, len)
    }

    /// Get pattern list by range.
    #[inline]
    pub fn get_pattern_list(&self, range: PatternRange) -> &[PatternId] {
        &self.pattern_lists[range.as_range()]
    }

    /// Whether `range` lies inside the pattern-list table.
    #[inline]
    pub fn pattern_list_in_bounds(&self, range: PatternRange) -> bool {
        range.as_range().end <= self.pattern_lists.len()
    }

    // Clauses

    /// Allocate the clause list of one case statement.
    pub fn alloc_clauses(&mut self, clauses: impl IntoIterator<Item = CaseClause>) -> ClauseRange {
        let start = index_u32(self.clauses.len());
        self.clauses.extend(clauses);
        let len = index_u32(self.clauses.len()) - start;
        ClauseRange::new(start, len)
    }

    /// Get clauses by range.
    #[inline]
    pub fn get_clauses(&self, range: ClauseRange) -> &[CaseClause] {
        &self.clauses[range.as_range()]
    }

    /// Whether `range` lies inside the clause table.
    #[inline]
    pub fn clauses_in_bounds(&self, range: ClauseRange) -> bool {
        range.as_range().end <= self.clauses.len()
    }

    // Traversal

    /// Direct expression children of a node, in evaluation order.
    ///
    /// Pattern and clause children are not included; sugar nodes report
    /// only their expression operands.
    pub fn children(&self, id: ExprId) -> SmallVec<[ExprId; 4]> {
        let mut out = SmallVec::new();
        let mut push = |child: ExprId| {
            if child.is_valid() {
                out.push(child);
            }
        };
        match *self.kind(id) {
            ExprKind::Nil
            | ExprKind::True
            | ExprKind::False
            | ExprKind::Int(_)
            | ExprKind::Str(_)
            | ExprKind::Sym(_)
            | ExprKind::Lvar(_)
            | ExprKind::Const(_)
            | ExprKind::Error => {}
            ExprKind::Array(range) | ExprKind::Hash(range) | ExprKind::Begin(range) => {
                for &child in self.get_expr_list(range) {
                    push(child);
                }
            }
            ExprKind::Pair { key, value } => {
                push(key);
                push(value);
            }
            ExprKind::Range { start, end, .. } => {
                push(start);
                push(end);
            }
            ExprKind::Assign { value, .. } => push(value),
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                push(cond);
                push(then_branch);
                push(else_branch);
            }
            ExprKind::And(left, right) | ExprKind::Or(left, right) => {
                push(left);
                push(right);
            }
            ExprKind::Not(operand) => push(operand),
            ExprKind::Send { receiver, args, .. } => {
                push(receiver);
                for &arg in self.get_expr_list(args) {
                    push(arg);
                }
            }
            ExprKind::Raise { message, .. } => push(message),
            ExprKind::CaseMatch { matchee, .. } => push(matchee),
            ExprKind::MatchPredicate { value, .. } | ExprKind::MatchAssert { value, .. } => {
                push(value);
            }
        }
        out
    }

    /// Visit every expression reachable from `root` (pre-order).
    ///
    /// Only follows expression children; see [`ExprArena::children`].
    pub fn walk(&self, root: ExprId, mut visit: impl FnMut(ExprId, &Expr)) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(expr) = self.try_get_expr(id) else {
                continue;
            };
            visit(id, expr);
            let children = self.children(id);
            stack.extend(children.into_iter().rev());
        }
    }
}
