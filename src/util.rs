//! This module defines error and result types.
//!
//! Problems in a document are never errors: they are reported as
//! [`Diagnostic`](crate::Diagnostic)s. The errors here describe schemas that
//! can't be used at all.

use thiserror::Error;

/// An error found while building a schema from external input.
#[rustversion::attr(since(1.40), non_exhaustive)]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// The schema text isn't valid JSON, or has the wrong shape.
    #[error("Json({0})")]
    Json(String),
    /// A node has no `kind`.
    #[error("MissingKind({0})")]
    MissingKind(String),
    /// A node's `kind` isn't one of the five known kinds.
    #[error("UnknownKind({path}: {kind})")]
    UnknownKind {
        /// Where the node is in the schema.
        path: String,
        /// The unrecognized kind.
        kind: String,
    },
    /// A "-one-of" node without a list of values.
    #[error("MissingValues({0})")]
    MissingValues(String),
    /// A "-one-of" value of the wrong type.
    #[error("BadValue({path}: expected {expected})")]
    BadValue {
        /// Where the node is in the schema.
        path: String,
        /// The type the values should have.
        expected: &'static str,
    },
}

/// A result from loading a schema.
pub type SchemaResult<T> = Result<T, SchemaError>;
