//! This module declares the scratch Value tree built while parsing.
//!
//! The tree is never handed to callers. It exists so that consecutive
//! `key: value` lines inside one sequence entry can be folded into a single
//! mapping, and so the shape of what was parsed can be logged.

use std::collections::BTreeMap;
use std::fmt;

use float_ord::FloatOrd;

/// `Value` represents everything a block can hold.
#[derive(Clone, PartialEq)]
pub(crate) enum Value {
    /// A key with an empty block, or a `-` with nothing after it.
    Null,
    Text(String),
    Number(FloatOrd<f64>),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

// FloatOrd doesn't implement Debug, so we have to do all the work by hand.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Text(x) => x.fmt(f),
            Value::Number(x) => x.0.fmt(f),
            Value::Array(x) => x.fmt(f),
            Value::Map(x) => x.fmt(f),
        }
    }
}

impl Value {
    pub(crate) fn from_float<F: Into<f64>>(f: F) -> Value {
        Value::Number(FloatOrd(f.into()))
    }

    pub(crate) fn empty_map() -> Value {
        Value::Map(BTreeMap::new())
    }

    /// Append a sequence entry.
    pub(crate) fn push(&mut self, entry: Value) {
        if let Value::Array(entries) = self {
            entries.push(entry);
        }
    }

    /// Set a key in a mapping.
    ///
    /// On a sequence, the key goes into the last entry, which must be a map
    /// opened by a `- key: value` line.
    pub(crate) fn insert(&mut self, key: &str, value: Value) {
        let map = match self {
            Value::Map(map) => map,
            Value::Array(entries) => match entries.last_mut() {
                Some(Value::Map(map)) => map,
                _ => return,
            },
            _ => return,
        };
        map.insert(key.to_string(), value);
    }
}
