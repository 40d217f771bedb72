//! Run-time values.
//!
//! Arrays and hashes are shared, mutable containers (`Rc<RefCell<..>>`):
//! `delete` on a hash is visible through every reference to it, which is
//! exactly what the rewriter's working copies must guard against.

use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;

use bp_ir::{Name, StringInterner};

/// Insertion-ordered hash storage.
pub type HashEntries = Vec<(Value, Value)>;

#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Str(Rc<str>),
    Sym(Name),
    Array(Rc<RefCell<Vec<Value>>>),
    Hash(Rc<RefCell<HashEntries>>),
    Range {
        start: Option<i64>,
        end: Option<i64>,
        exclusive: bool,
    },
    /// A class object, named by its constant.
    Class(Name),
    Object(Rc<Object>),
}

/// A user object implementing the deconstruction protocol.
#[derive(Clone, Debug)]
pub struct Object {
    pub class: Name,
    /// Returned by `deconstruct`; the object has no such method when `None`.
    pub sequence: Option<Value>,
    /// Source of `deconstruct_keys`; the object has no such method when
    /// `None`. Hash entries are filtered down to the requested keys.
    pub entries: Option<Value>,
}

impl Value {
    pub fn str(text: &str) -> Value {
        Value::Str(Rc::from(text))
    }

    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn hash(entries: HashEntries) -> Value {
        Value::Hash(Rc::new(RefCell::new(entries)))
    }

    pub fn object(object: Object) -> Value {
        Value::Object(Rc::new(object))
    }

    /// Everything except `nil` and `false` is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Name of the value's class.
    pub fn class_name(&self, interner: &StringInterner) -> &'static str {
        match self {
            Value::Nil => "NilClass",
            Value::Bool(true) => "TrueClass",
            Value::Bool(false) => "FalseClass",
            Value::Int(_) => "Integer",
            Value::Str(_) => "String",
            Value::Sym(_) => "Symbol",
            Value::Array(_) => "Array",
            Value::Hash(_) => "Hash",
            Value::Range { .. } => "Range",
            Value::Class(_) => "Class",
            Value::Object(object) => interner.lookup(object.class),
        }
    }

    /// Structural equality (`==`). Objects compare by identity.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Sym(a), Value::Sym(b)) | (Value::Class(a), Value::Class(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            }
            (Value::Hash(a), Value::Hash(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.iter().all(|(key, value)| {
                        lookup(&b, key).is_some_and(|other| value.equals(other))
                    })
            }
            (
                Value::Range {
                    start: s1,
                    end: e1,
                    exclusive: x1,
                },
                Value::Range {
                    start: s2,
                    end: e2,
                    exclusive: x2,
                },
            ) => s1 == s2 && e1 == e2 && x1 == x2,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Human-readable representation (`inspect`).
    pub fn inspect(&self, interner: &StringInterner) -> String {
        let mut out = String::new();
        self.write_inspect(&mut out, interner);
        out
    }

    fn write_inspect(&self, out: &mut String, interner: &StringInterner) {
        match self {
            Value::Nil => out.push_str("nil"),
            Value::Bool(value) => {
                let _ = write!(out, "{value}");
            }
            Value::Int(value) => {
                let _ = write!(out, "{value}");
            }
            Value::Str(text) => {
                let _ = write!(out, "{text:?}");
            }
            Value::Sym(name) => {
                let _ = write!(out, ":{}", interner.lookup(*name));
            }
            Value::Array(elements) => {
                out.push('[');
                for (i, element) in elements.borrow().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    element.write_inspect(out, interner);
                }
                out.push(']');
            }
            Value::Hash(entries) => {
                out.push('{');
                for (i, (key, value)) in entries.borrow().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    if let Value::Sym(name) = key {
                        let _ = write!(out, "{}: ", interner.lookup(*name));
                    } else {
                        key.write_inspect(out, interner);
                        out.push_str(" => ");
                    }
                    value.write_inspect(out, interner);
                }
                out.push('}');
            }
            Value::Range {
                start,
                end,
                exclusive,
            } => {
                if let Some(start) = start {
                    let _ = write!(out, "{start}");
                }
                out.push_str(if *exclusive { "..." } else { ".." });
                if let Some(end) = end {
                    let _ = write!(out, "{end}");
                }
            }
            Value::Class(name) => out.push_str(interner.lookup(*name)),
            Value::Object(object) => {
                let _ = write!(out, "#<{}>", interner.lookup(object.class));
            }
        }
    }
}

/// Find `key` in hash entries.
pub fn lookup<'e>(entries: &'e [(Value, Value)], key: &Value) -> Option<&'e Value> {
    entries
        .iter()
        .find(|(candidate, _)| candidate.equals(key))
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests;
