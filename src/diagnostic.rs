//! This module defines the diagnostics reported by validation.
//!

use crate::token::Position;
use serde::Serialize;
use std::fmt;
use strum_macros::{Display, IntoStaticStr};

/// How serious a [`Diagnostic`] is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A syntax or schema violation.
    Error,
    /// Something suspicious that is still well-formed (e.g. an empty block).
    Warning,
}

/// A single problem found in a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Line, starting from 0.
    pub row: usize,
    /// Character column, starting from 1.
    pub column: usize,
}

impl Diagnostic {
    /// Create an error diagnostic with a message used as-is.
    pub fn error<M: Into<String>>(pos: Position, message: M) -> Diagnostic {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            row: pos.row,
            column: pos.column,
        }
    }

    /// Create a warning diagnostic.
    pub fn warning<M: Into<String>>(pos: Position, message: M) -> Diagnostic {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            row: pos.row,
            column: pos.column,
        }
    }

    /// Create a schema mismatch error (`Format Error: ...`).
    pub fn format_error<M: fmt::Display>(pos: Position, message: M) -> Diagnostic {
        Diagnostic::error(pos, format!("Format Error: {}", message))
    }

    /// Create a malformed input error (`Syntax Error: ...`).
    pub fn syntax_error<M: fmt::Display>(pos: Position, message: M) -> Diagnostic {
        Diagnostic::error(pos, format!("Syntax Error: {}", message))
    }

    /// The position this diagnostic points at.
    pub fn pos(&self) -> Position {
        Position::new(self.row, self.column)
    }

    /// Returns true if this is an error rather than a warning.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.row, self.column, self.severity, self.message
        )
    }
}

/// Join a list of names for use in a message.
///
/// An empty list is rendered as `none`.
pub(crate) fn join_or_none<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    let list: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
    if list.is_empty() {
        "none".into()
    } else {
        list.join(", ")
    }
}
