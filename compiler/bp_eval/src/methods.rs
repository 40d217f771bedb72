//! Built-in method dispatch.
//!
//! Covers exactly the calls rewritten programs make: case equality,
//! comparison, indexing, and the deconstruction protocol with its hash
//! helpers. The receiver set is closed, so dispatch is a plain match.

use std::rc::Rc;

use bp_ir::Name;

use crate::errors::{no_such_method, wrong_argument};
use crate::interpreter::Interpreter;
use crate::value::{lookup, HashEntries, Object};
use crate::{EvalError, EvalResult, Value};

impl Interpreter<'_> {
    pub(crate) fn call_method(
        &self,
        receiver: &Value,
        method: Name,
        args: &[Value],
    ) -> EvalResult {
        let name = self.interner.lookup(method);
        match name {
            "==" => Ok(Value::Bool(receiver.equals(arg(name, args, 0)?))),
            "===" => Ok(Value::Bool(self.case_eq(receiver, arg(name, args, 0)?))),
            "!" => Ok(Value::Bool(!receiver.is_truthy())),
            ">=" => match (receiver, arg(name, args, 0)?) {
                (Value::Int(left), Value::Int(right)) => Ok(Value::Bool(left >= right)),
                _ => Err(wrong_argument(name, "operands must be Integers")),
            },
            "inspect" => Ok(Value::str(&receiver.inspect(self.interner))),
            "respond_to?" => match arg(name, args, 0)? {
                Value::Sym(queried) => {
                    let queried = self.interner.lookup(*queried);
                    Ok(Value::Bool(responds_to(receiver, queried)))
                }
                _ => Err(wrong_argument(name, "expected a Symbol")),
            },
            "length" | "size" => match receiver {
                Value::Array(elements) => Ok(int(elements.borrow().len())),
                Value::Hash(entries) => Ok(int(entries.borrow().len())),
                Value::Str(text) => Ok(int(text.chars().count())),
                _ => Err(self.no_method(name, receiver)),
            },
            "empty?" => match receiver {
                Value::Array(elements) => Ok(Value::Bool(elements.borrow().is_empty())),
                Value::Hash(entries) => Ok(Value::Bool(entries.borrow().is_empty())),
                Value::Str(text) => Ok(Value::Bool(text.is_empty())),
                _ => Err(self.no_method(name, receiver)),
            },
            "[]" => match receiver {
                Value::Array(elements) => index_array(&elements.borrow(), arg(name, args, 0)?),
                Value::Hash(entries) => Ok(lookup(&entries.borrow(), arg(name, args, 0)?)
                    .cloned()
                    .unwrap_or(Value::Nil)),
                _ => Err(self.no_method(name, receiver)),
            },
            "deconstruct" => match receiver {
                Value::Array(_) => Ok(receiver.clone()),
                Value::Object(object) => match &object.sequence {
                    Some(sequence) => Ok(sequence.clone()),
                    None => Err(self.no_method(name, receiver)),
                },
                _ => Err(self.no_method(name, receiver)),
            },
            "deconstruct_keys" => {
                let keys = arg(name, args, 0)?;
                match receiver {
                    Value::Hash(_) => Ok(receiver.clone()),
                    Value::Object(object) => match &object.entries {
                        Some(entries) => Ok(filter_keys(entries, keys)),
                        None => Err(self.no_method(name, receiver)),
                    },
                    _ => Err(self.no_method(name, receiver)),
                }
            }
            "key?" => match receiver {
                Value::Hash(entries) => Ok(Value::Bool(
                    lookup(&entries.borrow(), arg(name, args, 0)?).is_some(),
                )),
                _ => Err(self.no_method(name, receiver)),
            },
            "delete" => match receiver {
                Value::Hash(entries) => {
                    let key = arg(name, args, 0)?;
                    let mut entries = entries.borrow_mut();
                    let removed = entries
                        .iter()
                        .position(|(candidate, _)| candidate.equals(key))
                        .map(|at| entries.remove(at).1);
                    Ok(removed.unwrap_or(Value::Nil))
                }
                _ => Err(self.no_method(name, receiver)),
            },
            "dup" => Ok(match receiver {
                Value::Array(elements) => Value::array(elements.borrow().clone()),
                Value::Hash(entries) => Value::hash(entries.borrow().clone()),
                Value::Object(object) => Value::Object(Rc::new(Object::clone(object))),
                other => other.clone(),
            }),
            _ => Err(self.no_method(name, receiver)),
        }
    }

    /// `receiver === value`: class membership, range inclusion, or `==`.
    fn case_eq(&self, receiver: &Value, value: &Value) -> bool {
        match receiver {
            Value::Class(class) => {
                let class = self.interner.lookup(*class);
                class == "Object" || class == value.class_name(self.interner)
            }
            Value::Range {
                start,
                end,
                exclusive,
            } => {
                let Value::Int(n) = *value else {
                    return false;
                };
                let above = start.map_or(true, |start| n >= start);
                let below = end.map_or(true, |end| if *exclusive { n < end } else { n <= end });
                above && below
            }
            _ => receiver.equals(value),
        }
    }

    fn no_method(&self, method: &str, receiver: &Value) -> EvalError {
        no_such_method(method, &receiver.inspect(self.interner))
    }
}

/// Whether `receiver` implements `method`.
fn responds_to(receiver: &Value, method: &str) -> bool {
    match method {
        "==" | "===" | "!" | "inspect" | "respond_to?" | "dup" => true,
        "deconstruct" => match receiver {
            Value::Array(_) => true,
            Value::Object(object) => object.sequence.is_some(),
            _ => false,
        },
        "deconstruct_keys" | "key?" | "delete" => match receiver {
            Value::Hash(_) => true,
            Value::Object(object) => method == "deconstruct_keys" && object.entries.is_some(),
            _ => false,
        },
        "length" | "size" | "empty?" => {
            matches!(receiver, Value::Array(_) | Value::Hash(_) | Value::Str(_))
        }
        "[]" => matches!(receiver, Value::Array(_) | Value::Hash(_)),
        ">=" => matches!(receiver, Value::Int(_)),
        _ => false,
    }
}

/// `arr[i]` or `arr[range]`.
fn index_array(elements: &[Value], index: &Value) -> EvalResult {
    let len = signed(elements.len());
    match *index {
        Value::Int(i) => {
            let i = if i < 0 { i + len } else { i };
            Ok(usize::try_from(i)
                .ok()
                .and_then(|i| elements.get(i))
                .cloned()
                .unwrap_or(Value::Nil))
        }
        Value::Range {
            start,
            end,
            exclusive,
        } => {
            let start = start.unwrap_or(0);
            let start = if start < 0 { start + len } else { start };
            if start < 0 || start > len {
                return Ok(Value::Nil);
            }
            let end = match end {
                None => len,
                Some(end) => {
                    let end = if end < 0 { end + len } else { end };
                    if exclusive {
                        end
                    } else {
                        end + 1
                    }
                }
            };
            let end = end.clamp(start, len);
            let (Ok(start), Ok(end)) = (usize::try_from(start), usize::try_from(end)) else {
                return Ok(Value::Nil);
            };
            Ok(Value::array(elements[start..end].to_vec()))
        }
        _ => Err(wrong_argument("[]", "index must be an Integer or Range")),
    }
}

/// Entries of an object's `deconstruct_keys`, limited to `keys` when it is
/// an array. Non-hash sources are returned unchanged.
fn filter_keys(source: &Value, keys: &Value) -> Value {
    let (Value::Hash(entries), Value::Array(keys)) = (source, keys) else {
        return source.clone();
    };
    let keys = keys.borrow();
    let filtered: HashEntries = entries
        .borrow()
        .iter()
        .filter(|(key, _)| keys.iter().any(|wanted| wanted.equals(key)))
        .cloned()
        .collect();
    Value::hash(filtered)
}

fn arg<'v>(method: &str, args: &'v [Value], at: usize) -> Result<&'v Value, EvalError> {
    args.get(at)
        .ok_or_else(|| wrong_argument(method, format!("expected at least {} argument(s)", at + 1)))
}

fn int(n: usize) -> Value {
    Value::Int(signed(n))
}

#[expect(
    clippy::cast_possible_wrap,
    reason = "container lengths stay far below i64::MAX"
)]
fn signed(n: usize) -> i64 {
    n as i64
}
