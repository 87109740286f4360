//! `ymlcheck` validates configuration files written in a small,
//! indentation-based subset of YAML against a schema, and reports problems
//! as a list of diagnostics with line and column positions.
//!
//! It is meant for editor integrations and CI linters: it never builds a
//! document tree for the caller, and it never stops with an error because
//! the document is bad. A malformed document is simply a list of
//! [`Diagnostic`]s.
//!
//! # Implementation Details
//!
//! - The [`lexer`] turns text into [`token::Token`]s. Lexing errors are fatal:
//!   only the lexing diagnostic is reported.
//!
//! - The block parser walks the tokens once, recursing into each nested
//!   block and checking every key against the [`schema::Block`] in scope.
//!
//! - The [`schema::Schema`] is never modified. Per-run state (such as which
//!   keys have been seen) belongs to the run, so a schema can be
//!   shared freely between threads.
//!
//! # Examples
//!
//! ```
//! use ymlcheck::schema::*;
//! use ymlcheck::{validate, Severity};
//!
//! let schema = Schema::new(
//!     Block::new()
//!         .with("mode", Property::new(string_one_of(&["fast", "slow"])))
//!         .with(
//!             "server",
//!             Property::new(block(
//!                 Block::new()
//!                     .with("host", Property::new(string()))
//!                     .with("port", Property::new(number())),
//!             )),
//!         ),
//! );
//!
//! let text = "mode: fast\nserver:\n  host: example\n  port: 8080\n";
//! assert!(validate(&schema, text).is_empty());
//!
//! let text = "mode: medium\nserver:\n  host: example\n  port: 8080\n";
//! let diagnostics = validate(&schema, text);
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].severity, Severity::Error);
//! assert_eq!(
//!     diagnostics[0].message,
//!     "Format Error: Only following values are allowed: fast, slow"
//! );
//! assert_eq!((diagnostics[0].row, diagnostics[0].column), (0, 1));
//! ```
//!
//! Supported syntax:
//! - `key: value` lines, where a value is a number, a bare word
//!   (`[A-Za-z0-9_]`), or a double-quoted string
//! - `key:` followed by a more deeply indented block
//! - sequences of `- value` or `- key: value` entries; further `key: value`
//!   lines at the same indentation join the current entry
//! - `#` comments
//!
//! Unsupported syntax:
//! - Flow collections (`[a, b]`, `{a: b}`)
//! - Anchors, aliases, and tags
//! - Multi-document streams
//! - Block scalars (`|`, `>`)
//! - Tabs for indentation

#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![warn(clippy::cast_possible_truncation)]

pub mod diagnostic;
pub mod lexer;
pub mod schema;
pub mod token;
pub mod util;
#[doc(inline)]
pub use util::{SchemaError, SchemaResult};
pub(crate) mod validate;
pub(crate) mod value;

#[doc(inline)]
pub use diagnostic::{Diagnostic, Severity};
#[doc(inline)]
pub use validate::{make_validator, validate};

#[cfg(feature = "serde_json")]
pub mod json;
#[cfg(feature = "serde_json")]
#[doc(inline)]
pub use json::{schema_from_json_str, validate_json_schema_str};
