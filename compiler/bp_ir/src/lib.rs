//! Syntax node model for the Backport rewriter.
//!
//! One arena-backed tree type serves both sides of the rewrite:
//!
//! ```text
//! input tree (case/in sugar) ──► bp_desugar ──► output tree (if/and/or/send/raise)
//! ```
//!
//! - [`ExprArena`]: flat storage for expressions, patterns and clauses
//! - [`ExprKind`] / [`MatchPattern`]: closed node enums
//! - [`StringInterner`] / [`Name`]: interned identifiers, symbols and strings
//! - [`AstBuilder`]: construction helpers for hosts and tests

mod arena;
pub mod ast;
mod builder;
mod ids;
mod interner;
mod name;
mod span;

pub use arena::ExprArena;
pub use ast::{
    CaseClause, Expr, ExprKind, Guard, GuardKind, InClause, MatchPattern, Pattern,
};
pub use builder::AstBuilder;
pub use ids::{ClauseRange, ExprId, ExprRange, PatternId, PatternRange};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::Span;
