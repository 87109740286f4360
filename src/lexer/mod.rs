//! This module converts document text into a list of [`Token`]s.
//!
//! The lexer is deliberately context-free: a run of spaces is always a
//! [`TokenKind::Spaces`] token, and the parser decides later whether it is
//! indentation or a separator between a key and its value.
//!
//! Lexing stops at the first error; there is no recovery.

use crate::token::{Position, Token, TokenKind};
use log::warn;
use nom::bytes::complete::{take_while, take_while1};
use nom::character::complete::char;
use nom::combinator::recognize;
use nom::sequence::preceded;
use nom::IResult;

mod lex_err;
pub use lex_err::{ErrorKind, LexError};
use lex_err::lex_error;

// Each recognizer matches one run of characters that cannot contain a
// line break, so advancing the column by the run length is always correct.

fn spaces(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c == ' ')(input)
}

fn number_run(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_digit() || c == '.')(input)
}

fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize(preceded(char('#'), take_while(|c: char| c != '\n')))(input)
}

struct Lexer<'a> {
    rest: &'a str,
    // The position of the first character of `rest`.
    pos: Position,
    // Set once the current line has produced something other than spaces.
    line_has_content: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Lexer<'a> {
        Lexer {
            rest: text,
            pos: Position::START,
            line_has_content: false,
            tokens: Vec::new(),
        }
    }

    fn push(&mut self, kind: TokenKind, pos: Position) {
        match kind {
            TokenKind::Spaces(_) | TokenKind::Newline => {}
            _ => self.line_has_content = true,
        }
        self.tokens.push(Token::new(kind, pos));
    }

    fn next_line(&mut self) {
        self.pos.row += 1;
        self.pos.column = 1;
        self.line_has_content = false;
    }

    // Skip a single character that occupies one column.
    fn bump(&mut self, c: char) {
        self.rest = &self.rest[c.len_utf8()..];
        self.pos.column += 1;
    }

    // Run a recognizer at the current position, consuming what it matched.
    fn take<F>(&mut self, recognizer: F) -> Option<&'a str>
    where
        F: Fn(&'a str) -> IResult<&'a str, &'a str>,
    {
        let (rest, run) = recognizer(self.rest).ok()?;
        self.rest = rest;
        self.pos.column += run.chars().count();
        Some(run)
    }

    fn unexpected(&self, c: char, pos: Position) -> LexError {
        warn!("unknown character {:?} at {}:{}", c, pos.row, pos.column);
        lex_error(ErrorKind::UnexpectedChar, c.to_string(), pos)
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(c) = self.rest.chars().next() {
            let start = self.pos;
            match c {
                ':' => {
                    self.bump(c);
                    self.push(TokenKind::Colon, start);
                }
                '-' => {
                    self.bump(c);
                    self.push(TokenKind::Dash, start);
                }
                '\r' => {
                    // Carriage returns are invisible; they don't take a column.
                    self.rest = &self.rest[1..];
                }
                '\n' => {
                    self.rest = &self.rest[1..];
                    self.push(TokenKind::Newline, start);
                    self.next_line();
                }
                '#' => self.comment(),
                ' ' => {
                    let run = self
                        .take(spaces)
                        .ok_or_else(|| self.unexpected(c, start))?;
                    self.push(TokenKind::Spaces(run.len()), start);
                }
                '"' => self.quoted()?,
                c if c.is_ascii_digit() => self.number()?,
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let run = self.take(word).ok_or_else(|| self.unexpected(c, start))?;
                    self.push(TokenKind::Text(run.to_string()), start);
                }
                other => return Err(self.unexpected(other, start)),
            }
        }
        Ok(self.tokens)
    }

    fn comment(&mut self) {
        let _ = self.take(comment);
        // Trailing spaces before a comment are never significant.
        if let Some(Token {
            kind: TokenKind::Spaces(_),
            pos,
        }) = self.tokens.last()
        {
            if pos.row == self.pos.row {
                self.tokens.pop();
            }
        }
        // A comment-only line disappears entirely, newline included.
        // After content, the newline is left for the main loop.
        if !self.line_has_content && self.rest.starts_with('\n') {
            self.rest = &self.rest[1..];
            self.next_line();
        }
    }

    fn number(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let run = match self.take(number_run) {
            Some(run) => run,
            None => return Err(lex_error(ErrorKind::MalformedNumber, "", start)),
        };
        match run.parse::<f64>() {
            Ok(n) => {
                self.push(TokenKind::Number(n), start);
                Ok(())
            }
            Err(_) => Err(lex_error(ErrorKind::MalformedNumber, run, start)),
        }
    }

    // A double-quoted string. A backslash escapes the next character, and
    // both are kept as-is in the token value.
    fn quoted(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let mut pos = start;
        let mut value = String::new();
        // Skip the opening quote.
        let mut chars = self.rest.char_indices().skip(1);
        pos.column += 1;
        let end = loop {
            match chars.next() {
                None | Some((_, '\n')) => {
                    return Err(lex_error(ErrorKind::UnterminatedString, value, start));
                }
                Some((i, '"')) => {
                    pos.column += 1;
                    break i + 1;
                }
                Some((_, '\\')) => {
                    value.push('\\');
                    pos.column += 1;
                    match chars.next() {
                        None => return Err(lex_error(ErrorKind::TruncatedEscape, value, start)),
                        Some((_, '\n')) => {
                            value.push('\n');
                            pos.row += 1;
                            pos.column = 1;
                        }
                        Some((_, escaped)) => {
                            value.push(escaped);
                            pos.column += 1;
                        }
                    }
                }
                Some((_, c)) => {
                    value.push(c);
                    pos.column += 1;
                }
            }
        };
        self.rest = &self.rest[end..];
        self.pos = pos;
        self.push(TokenKind::Text(value), start);
        Ok(())
    }
}

/// Split document text into tokens.
///
/// Returns the first fatal lexical error if the text can't be tokenized.
///
/// ```
/// use ymlcheck::lexer::tokenize;
/// use ymlcheck::token::TokenKind;
///
/// let tokens = tokenize("port: 8080\n").unwrap();
/// let kinds: Vec<TokenKind> = tokens.into_iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Text("port".into()),
///         TokenKind::Colon,
///         TokenKind::Spaces(1),
///         TokenKind::Number(8080.0),
///         TokenKind::Newline,
///     ]
/// );
/// ```
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(text).run()
}
