//! This module defines the schema a document is validated against.
//!
//! A [`Schema`] is a tree of [`Block`]s. Each block names the keys it
//! permits; each key is a [`Property`] whose [`Node`] says what kind of
//! value the key may hold. A key holding a nested block carries another
//! [`Block`], and so on.
//!
//! Schemas are immutable during validation. Anything a validation run needs
//! to remember (like which keys have already been seen) is kept by the run
//! itself, so one schema can be shared by any number of concurrent runs.
//!
//! # Examples
//!
//! ```
//! use ymlcheck::schema::*;
//!
//! let schema = Schema::new(
//!     Block::new()
//!         .with("name", Property::new(string()).required())
//!         .with("mode", Property::new(string_one_of(&["fast", "slow"])))
//!         .with(
//!             "limits",
//!             Property::new(block(Block::new().with("max", Property::new(number())))),
//!         ),
//! );
//! assert!(schema.root.children.contains_key("limits"));
//! ```

use float_ord::FloatOrd;
use std::collections::BTreeMap;
use std::fmt;
use strum_macros::IntoStaticStr;

/// Child properties of a block, by key name.
pub type Children = BTreeMap<String, Property>;

/// The validation rule for a single key's value.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum Node {
    /// A string literal, restricted to a set of values.
    #[strum(serialize = "string-one-of")]
    StringOneOf(Vec<String>),
    /// A nested block (mapping or sequence).
    #[strum(serialize = "nested-block")]
    Block(Block),
    /// Any string literal.
    #[strum(serialize = "string")]
    String,
    /// Any number literal.
    #[strum(serialize = "number")]
    Number,
    /// A number literal, restricted to a set of values.
    #[strum(serialize = "number-one-of")]
    NumberOneOf(Vec<f64>),
}

impl Node {
    /// The schema name of this node's kind, e.g. `string-one-of`.
    pub fn kind_name(&self) -> &'static str {
        self.into()
    }

    /// If this node is a nested block, return it.
    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::StringOneOf(values) => write!(f, "string-one-of {:?}", values),
            Node::NumberOneOf(values) => write!(f, "number-one-of {:?}", values),
            _ => write!(f, "{}", self.kind_name()),
        }
    }
}

/// Returns true if `value` is one of `allowed`.
///
/// Comparison is exact; FloatOrd makes it total so even a NaN in the schema
/// behaves predictably.
pub(crate) fn number_allowed(allowed: &[f64], value: f64) -> bool {
    allowed.iter().any(|a| FloatOrd(*a) == FloatOrd(value))
}

/// Returns true if `value` is one of `allowed`.
pub(crate) fn string_allowed(allowed: &[String], value: &str) -> bool {
    allowed.iter().any(|a| a == value)
}

/// One permitted key inside a block.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// What the key's value must look like.
    pub node: Node,
    /// If true, the key must appear in every block governed by the parent.
    pub required: bool,
}

impl Property {
    /// Create an optional property.
    pub fn new(node: Node) -> Property {
        Property {
            node,
            required: false,
        }
    }

    /// Mark this property as required.
    pub fn required(mut self) -> Property {
        self.required = true;
        self
    }
}

/// The rules for one indentation-delimited block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    /// Keys allowed when the block is a mapping.
    pub children: Children,
    /// Whether the block may be a sequence (`- entry` lines).
    pub allow_list_values: bool,
}

impl Block {
    /// Create an empty block that permits no keys and no list entries.
    pub fn new() -> Block {
        Block::default()
    }

    /// Add a permitted key.
    pub fn with<S: Into<String>>(mut self, name: S, property: Property) -> Block {
        self.children.insert(name.into(), property);
        self
    }

    /// Set whether `- entry` lines are permitted in this block.
    pub fn allow_list_values(mut self, allow: bool) -> Block {
        self.allow_list_values = allow;
        self
    }

    /// Look up a permitted key.
    pub fn child(&self, name: &str) -> Option<&Property> {
        self.children.get(name)
    }

    /// Iterate over the names of required keys, in sorted order.
    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.children
            .iter()
            .filter(|(_, prop)| prop.required)
            .map(|(name, _)| name.as_str())
    }
}

/// A complete document schema.
///
/// The root block describes the top level of the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    /// The top-level block.
    pub root: Block,
}

impl Schema {
    /// Create a schema from its root block.
    pub fn new(root: Block) -> Schema {
        Schema { root }
    }
}

/// A shortcut for `Node::String`
pub fn string() -> Node {
    Node::String
}

/// A shortcut for `Node::Number`
pub fn number() -> Node {
    Node::Number
}

/// A shortcut for `Node::StringOneOf(...)`
pub fn string_one_of<S: AsRef<str>>(values: &[S]) -> Node {
    Node::StringOneOf(values.iter().map(|s| s.as_ref().to_string()).collect())
}

/// A shortcut for `Node::NumberOneOf(...)`
pub fn number_one_of<T: Into<f64> + Copy>(values: &[T]) -> Node {
    Node::NumberOneOf(values.iter().map(|&n| n.into()).collect())
}

/// A shortcut for `Node::Block(b)`
pub fn block(b: Block) -> Node {
    Node::Block(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names() {
        assert_eq!(string().kind_name(), "string");
        assert_eq!(number().kind_name(), "number");
        assert_eq!(string_one_of(&["a"]).kind_name(), "string-one-of");
        assert_eq!(number_one_of(&[1]).kind_name(), "number-one-of");
        assert_eq!(block(Block::new()).kind_name(), "nested-block");
        assert_eq!(format!("{}", string_one_of(&["a", "b"])), r#"string-one-of ["a", "b"]"#);
    }

    #[test]
    fn one_of_membership() {
        assert!(number_allowed(&[1.0, 2.5], 2.5));
        assert!(!number_allowed(&[1.0, 2.5], 2.0));
        assert!(number_allowed(&[f64::NAN], f64::NAN));
        assert!(string_allowed(&["var".to_string()], "var"));
        assert!(!string_allowed(&["var".to_string()], "Var"));
    }

    #[test]
    fn required_names_sorted() {
        let b = Block::new()
            .with("zeta", Property::new(string()).required())
            .with("alpha", Property::new(number()).required())
            .with("mid", Property::new(number()));
        let names: Vec<&str> = b.required_names().collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn clone_is_deep() {
        let original = Schema::new(
            Block::new().with("inner", Property::new(block(Block::new().with("x", Property::new(string()))))),
        );
        let mut copy = original.clone();
        if let Some(Node::Block(inner)) = copy.root.children.get_mut("inner").map(|p| &mut p.node) {
            inner.children.clear();
        }
        assert_ne!(original, copy);
        let inner = original.root.child("inner").and_then(|p| p.node.as_block()).unwrap();
        assert!(inner.child("x").is_some());
    }
}
