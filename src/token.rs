//! This module defines the tokens produced by the [`lexer`](crate::lexer).
//!

use std::fmt;

/// A location in the source text.
///
/// `row` counts lines starting from 0; `column` counts characters within
/// the line starting from 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    /// The position of the first character of a document.
    pub const START: Position = Position { row: 0, column: 1 };

    /// Create a new `Position`.
    pub fn new(row: usize, column: usize) -> Position {
        Position { row, column }
    }
}

/// The lexical category of a token, along with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `:`
    Colon,
    /// `-`
    Dash,
    /// A line break.
    Newline,
    /// A run of spaces, carrying its length.
    ///
    /// Whether this is indentation or an inline separator is decided by the
    /// parser, not the lexer.
    Spaces(usize),
    /// A quoted or unquoted string literal.
    ///
    /// Escape sequences inside quoted strings are kept verbatim.
    Text(String),
    /// A number literal.
    Number(f64),
}

// This is the form used inside diagnostic messages.
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Dash => write!(f, "-"),
            TokenKind::Newline => write!(f, "<newline>"),
            TokenKind::Spaces(_) => write!(f, "<space>"),
            TokenKind::Text(s) => write!(f, "{}", s),
            TokenKind::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A lexical unit with its source position.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
}

impl Token {
    /// Create a new `Token`.
    pub fn new(kind: TokenKind, pos: Position) -> Token {
        Token { kind, pos }
    }
}
