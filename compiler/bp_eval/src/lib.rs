//! Reference interpreter for rewritten trees.
//!
//! Runs the output grammar of `bp_desugar` (assignments, conditionals,
//! boolean connectives, method calls, raises) against a small Ruby-like
//! value model. It also provides the runtime compatibility support the
//! rewritten program needs: the deconstruction protocol on arrays, hashes
//! and user objects, and the `NoMatchingPatternError` / `TypeError` classes.

mod errors;
mod interpreter;
mod methods;
mod value;

pub use errors::{EvalError, EvalResult};
pub use interpreter::Interpreter;
pub use value::{lookup, HashEntries, Object, Value};
