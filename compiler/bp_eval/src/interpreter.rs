//! Tree-walking interpreter for the output grammar.

use bp_ir::{ExprArena, ExprId, ExprKind, ExprRange, Name, StringInterner};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::{no_such_method, wrong_argument};
use crate::{EvalError, EvalResult, Value};

/// Classes every program can name.
///
/// `NoMatchingPatternError` is part of the compatibility shim the rewritten
/// program depends on.
const BUILTIN_CLASSES: &[&str] = &[
    "Object",
    "NilClass",
    "TrueClass",
    "FalseClass",
    "Integer",
    "String",
    "Symbol",
    "Array",
    "Hash",
    "Range",
    "TypeError",
    "NoMatchingPatternError",
];

/// Interpreter over one arena.
///
/// Local variables live in a single flat scope; reading an unassigned
/// variable yields `nil`.
pub struct Interpreter<'a> {
    pub(crate) arena: &'a ExprArena,
    pub(crate) interner: &'a StringInterner,
    locals: FxHashMap<Name, Value>,
    classes: FxHashSet<Name>,
    /// Number of calls per method name.
    calls: FxHashMap<Name, usize>,
}

impl<'a> Interpreter<'a> {
    pub fn new(arena: &'a ExprArena, interner: &'a StringInterner) -> Self {
        let classes = BUILTIN_CLASSES
            .iter()
            .map(|class| interner.intern(class))
            .collect();
        Interpreter {
            arena,
            interner,
            locals: FxHashMap::default(),
            classes,
            calls: FxHashMap::default(),
        }
    }

    /// Make `name` resolvable as a constant.
    pub fn define_class(&mut self, name: &str) {
        self.classes.insert(self.interner.intern(name));
    }

    pub fn set_local(&mut self, name: &str, value: Value) {
        self.locals.insert(self.interner.intern(name), value);
    }

    /// Value of a local, `None` if it was never assigned.
    pub fn local(&self, name: &str) -> Option<&Value> {
        self.locals.get(&self.interner.intern(name))
    }

    /// How many times `method` was called so far.
    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .get(&self.interner.intern(method))
            .copied()
            .unwrap_or(0)
    }

    /// Evaluate an expression.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn eval(&mut self, id: ExprId) -> EvalResult {
        bp_stack::ensure_sufficient_stack(|| self.eval_inner(id))
    }

    fn eval_inner(&mut self, id: ExprId) -> EvalResult {
        let arena = self.arena;
        let Some(&expr) = arena.try_get_expr(id) else {
            return Err(EvalError::InvalidHandle(id.raw()));
        };
        match expr.kind {
            ExprKind::Nil => Ok(Value::Nil),
            ExprKind::True => Ok(Value::Bool(true)),
            ExprKind::False => Ok(Value::Bool(false)),
            ExprKind::Int(value) => Ok(Value::Int(value)),
            ExprKind::Str(text) => Ok(Value::str(self.interner.lookup(text))),
            ExprKind::Sym(name) => Ok(Value::Sym(name)),
            ExprKind::Lvar(name) => Ok(self.locals.get(&name).cloned().unwrap_or(Value::Nil)),
            ExprKind::Const(name) => {
                if self.classes.contains(&name) {
                    Ok(Value::Class(name))
                } else {
                    Err(EvalError::UndefinedConstant(
                        self.interner.lookup(name).to_string(),
                    ))
                }
            }
            ExprKind::Array(range) => Ok(Value::array(self.eval_list(range)?)),
            ExprKind::Hash(range) => {
                let mut entries = Vec::with_capacity(range.len());
                for &pair in arena.get_expr_list(range) {
                    match *arena.kind(pair) {
                        ExprKind::Pair { key, value } => {
                            let key = self.eval(key)?;
                            let value = self.eval(value)?;
                            entries.push((key, value));
                        }
                        _ => return Err(no_such_method("to_hash", "hash literal element")),
                    }
                }
                Ok(Value::hash(entries))
            }
            ExprKind::Pair { .. } => Err(no_such_method("eval", "bare pair")),
            ExprKind::Range {
                start,
                end,
                exclusive,
            } => Ok(Value::Range {
                start: self.eval_bound(start)?,
                end: self.eval_bound(end)?,
                exclusive,
            }),
            ExprKind::Assign { name, value } => {
                let value = self.eval(value)?;
                self.locals.insert(name, value.clone());
                Ok(value)
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let branch = if self.eval(cond)?.is_truthy() {
                    then_branch
                } else {
                    else_branch
                };
                self.eval_optional(branch)
            }
            ExprKind::And(left, right) => {
                let left = self.eval(left)?;
                if left.is_truthy() {
                    self.eval(right)
                } else {
                    Ok(left)
                }
            }
            ExprKind::Or(left, right) => {
                let left = self.eval(left)?;
                if left.is_truthy() {
                    Ok(left)
                } else {
                    self.eval(right)
                }
            }
            ExprKind::Not(operand) => Ok(Value::Bool(!self.eval(operand)?.is_truthy())),
            ExprKind::Send {
                receiver,
                method,
                args,
            } => {
                if !receiver.is_valid() {
                    return Err(no_such_method(self.interner.lookup(method), "main"));
                }
                let receiver = self.eval(receiver)?;
                let args = self.eval_list(args)?;
                *self.calls.entry(method).or_insert(0) += 1;
                self.call_method(&receiver, method, &args)
            }
            ExprKind::Begin(range) => {
                let mut last = Value::Nil;
                for &expr in arena.get_expr_list(range) {
                    last = self.eval(expr)?;
                }
                Ok(last)
            }
            ExprKind::Raise { class, message } => {
                let message = match self.eval_optional(message)? {
                    Value::Str(text) => text.to_string(),
                    Value::Nil => String::new(),
                    other => other.inspect(self.interner),
                };
                Err(EvalError::Raised {
                    class: self.interner.lookup(class).to_string(),
                    message,
                })
            }
            ExprKind::CaseMatch { .. } => Err(EvalError::Unlowered("case statement")),
            ExprKind::MatchPredicate { .. } => Err(EvalError::Unlowered("match predicate")),
            ExprKind::MatchAssert { .. } => Err(EvalError::Unlowered("match assertion")),
            ExprKind::Error => Err(EvalError::ErrorNode),
        }
    }

    fn eval_optional(&mut self, id: ExprId) -> EvalResult {
        if id.is_valid() {
            self.eval(id)
        } else {
            Ok(Value::Nil)
        }
    }

    fn eval_list(&mut self, range: ExprRange) -> Result<Vec<Value>, EvalError> {
        let arena = self.arena;
        arena
            .get_expr_list(range)
            .iter()
            .map(|&id| self.eval(id))
            .collect()
    }

    fn eval_bound(&mut self, id: ExprId) -> Result<Option<i64>, EvalError> {
        match self.eval_optional(id)? {
            Value::Nil => Ok(None),
            Value::Int(value) => Ok(Some(value)),
            other => Err(wrong_argument(
                "..",
                format!(
                    "range bound must be an Integer, got {}",
                    other.inspect(self.interner)
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests;
