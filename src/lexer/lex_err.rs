//! Lexer error types and related utilities
//!

use crate::diagnostic::Diagnostic;
use crate::token::Position;
use thiserror::Error;

/// The "kind" of error generated during lexing.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A run of digits and dots that isn't a number.
    MalformedNumber,
    /// A quoted string with no closing quote on the same line.
    UnterminatedString,
    /// A backslash at the very end of the input.
    TruncatedEscape,
    /// A character that can't start any token.
    UnexpectedChar,
}

/// A fatal error that stopped lexing.
#[derive(Debug, Clone, PartialEq, Error)]
// thiserror will generate a Display implementation.
#[error("{kind:?}({ctx})")]
pub struct LexError {
    /// The "kind" of error generated during lexing.
    pub kind: ErrorKind,
    /// A snippet of text from the input that caused the error.
    pub ctx: String,
    /// Where the offending token starts.
    pub pos: Position,
}

pub(crate) fn lex_error<S: Into<String>>(kind: ErrorKind, ctx: S, pos: Position) -> LexError {
    LexError {
        kind,
        ctx: ctx.into(),
        pos,
    }
}

impl LexError {
    /// The user-facing message for this error.
    pub fn message(&self) -> String {
        match self.kind {
            ErrorKind::MalformedNumber => format!("Invalid number literal \"{}\"", self.ctx),
            ErrorKind::UnterminatedString => "No matching quote found".into(),
            ErrorKind::TruncatedEscape => "Unexpected end of file (EOF)".into(),
            ErrorKind::UnexpectedChar => {
                format!("Syntax Error: Unexpected character \"{}\"", self.ctx)
            }
        }
    }
}

impl From<LexError> for Diagnostic {
    fn from(err: LexError) -> Diagnostic {
        Diagnostic::error(err.pos, err.message())
    }
}
