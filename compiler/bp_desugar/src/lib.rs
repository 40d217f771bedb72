//! Structural pattern matching rewriter.
//!
//! Rewrites `case/in` statements (and the one-line `expr in pattern` /
//! `expr => pattern` forms) into plain conditionals, boolean connectives
//! and method calls, so the program runs on targets without native pattern
//! matching.
//!
//! # Pipeline Position
//!
//! ```text
//! Parse → **Desugar** → Emit source / bp_eval
//! ```
//!
//! # What Happens During Rewriting
//!
//! 1. **Clause chain** (`lower::clauses`): the matchee is bound once and the
//!    clauses become a right-folded `If` chain ending in the `else` body or
//!    a `NoMatchingPatternError` raise.
//! 2. **Dispatch** (`lower::dispatch`): each pattern kind maps to one
//!    truth-expression rule.
//! 3. **Sequence / key-value patterns** (`lower::array`, `lower::hash`):
//!    deconstruction steps, memoized per statement through a
//!    [`MatchContext`](context::MatchContext).
//!
//! Structural errors abort the run with a [`DesugarError`]; run-time
//! failures are `Raise` nodes in the output.

mod context;
mod errors;
mod feature;
mod lower;
mod options;
mod validate;

use std::sync::Once;

use bp_ir::{ExprArena, ExprId, StringInterner};

pub use errors::DesugarError;
pub use feature::{Collaborators, Feature, NoopCollaborators, Version};
pub use options::{DesugarOptions, VAR_PREFIX_ENV};
pub use validate::validate_output;

/// Output of one rewriting run.
#[derive(Clone, Debug)]
pub struct DesugarResult {
    /// The output tree. Shares no storage with the input arena.
    pub arena: ExprArena,
    /// Root of the rewritten tree (`ExprId::INVALID` for an empty input).
    pub root: ExprId,
    /// Number of statements rewritten, nested ones included.
    pub statements: u32,
}

/// Rewrite every pattern matching statement in the tree rooted at `root`.
///
/// All other nodes are copied unchanged into the output arena. The first
/// structural error aborts the run.
pub fn desugar(
    src: &ExprArena,
    root: ExprId,
    interner: &StringInterner,
    options: &DesugarOptions,
    collaborators: &mut dyn Collaborators,
) -> Result<DesugarResult, DesugarError> {
    if !root.is_valid() {
        return Ok(DesugarResult {
            arena: ExprArena::new(),
            root: ExprId::INVALID,
            statements: 0,
        });
    }

    let mut lowerer = lower::Desugarer::new(src, interner, options, collaborators);
    let out_root = lowerer.lower_expr(root)?;
    let statements = lowerer.statements;
    let arena = lowerer.arena;

    if options.validate {
        validate_output(&arena, out_root)?;
    }

    Ok(DesugarResult {
        arena,
        root: out_root,
        statements,
    })
}

/// [`desugar`] with default options and no collaborators.
pub fn desugar_default(
    src: &ExprArena,
    root: ExprId,
    interner: &StringInterner,
) -> Result<DesugarResult, DesugarError> {
    desugar(
        src,
        root,
        interner,
        &DesugarOptions::default(),
        &mut NoopCollaborators,
    )
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=bp_desugar=debug` or
/// `RUST_LOG=bp_desugar=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
