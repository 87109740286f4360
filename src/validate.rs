//! This module contains the block parser and validator.
//!
//! Parsing and validation happen in a single recursive-descent pass over
//! the token list. Each indentation-delimited block is handled by one call
//! to [`Parser::parse_block`], which validates every key it finds against
//! the schema [`Block`] governing it, and recurses for nested blocks.
//!
//! A fatal diagnostic stops the whole run; nothing after it is examined.

use crate::diagnostic::{join_or_none, Diagnostic};
use crate::lexer::tokenize;
use crate::schema::{number_allowed, string_allowed, Block, Node, Property, Schema};
use crate::token::{Position, Token, TokenKind};
use crate::value::Value;
use log::{debug, trace};
use std::collections::BTreeSet;

const ARRAY_ONLY: &str = "Can only have array values inside of an array";

/// Returned when a fatal diagnostic has been recorded and parsing must stop.
#[derive(Debug)]
pub(crate) struct Halt;

type ParseResult<T> = Result<T, Halt>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum BlockKind {
    Unknown,
    Sequence,
    Mapping,
}

// What followed a key's colon.
#[derive(Debug)]
enum Shape<'t> {
    Text(&'t str),
    Number(f64),
    Block,
    Empty,
}

// Everything one block needs to remember while its lines are parsed.
// This lives exactly as long as the parse_block call that owns it.
struct BlockState<'s> {
    scope: Option<&'s Block>,
    // Indentation of every line in this block.
    width: usize,
    top_level: bool,
    // Where "missing required key" errors point: the key that opened
    // this block, or the start of the document.
    anchor: Position,
    kind: BlockKind,
    value: Value,
    // A `- key: value` entry that further key lines fold into.
    open_entry: bool,
}

impl<'s> BlockState<'s> {
    fn new(scope: Option<&'s Block>, width: usize, top_level: bool, anchor: Position) -> Self {
        BlockState {
            scope,
            width,
            top_level,
            anchor,
            kind: BlockKind::Unknown,
            value: Value::Null,
            open_entry: false,
        }
    }

    fn start_mapping(&mut self) {
        self.kind = BlockKind::Mapping;
        self.value = Value::empty_map();
    }

    fn start_sequence(&mut self) {
        self.kind = BlockKind::Sequence;
        self.value = Value::Array(Vec::new());
    }
}

/// The parser state for a single validation run.
pub(crate) struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    // Schema properties matched by a key so far in this run, by address.
    // Two blocks governed by the same schema node share these.
    seen: BTreeSet<*const Property>,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(tokens: &'t [Token]) -> Parser<'t> {
        Parser {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            seen: BTreeSet::new(),
        }
    }

    /// Parse and validate the whole document against the schema root.
    ///
    /// Returns the scratch value tree, or `None` if parsing stopped early.
    pub(crate) fn parse_document(&mut self, root: &Block) -> Option<Value> {
        self.parse_block(Some(root), 0, true, Position::START).ok()
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind_at(&self, offset: usize) -> Option<&'t TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn fatal(&mut self, diagnostic: Diagnostic) -> Halt {
        self.emit(diagnostic);
        Halt
    }

    fn eat_spaces(&mut self) {
        if let Some(TokenKind::Spaces(_)) = self.peek_kind_at(0) {
            self.pos += 1;
        }
    }

    fn unexpected(&mut self, expected: &TokenKind, found: &Token) -> Halt {
        let msg = format!("Expected \"{}\" but found \"{}\"", expected, found.kind);
        self.fatal(Diagnostic::syntax_error(found.pos, msg))
    }

    // Skip blank lines, stopping at the start of the next line with content.
    // Returns that line's indentation and position, or None at the end of
    // input. The indentation token itself is not consumed.
    fn next_line_indent(&mut self) -> Option<(usize, Position)> {
        loop {
            let tok = self.peek()?;
            match &tok.kind {
                TokenKind::Newline => self.pos += 1,
                TokenKind::Spaces(n) => match self.peek_kind_at(1) {
                    None => {
                        self.pos += 1;
                        return None;
                    }
                    Some(TokenKind::Newline) => self.pos += 2,
                    Some(_) => return Some((*n, tok.pos)),
                },
                _ => return Some((0, tok.pos)),
            }
        }
    }

    // A value must be the last thing on its line.
    fn expect_line_end(&mut self) -> ParseResult<()> {
        self.eat_spaces();
        match self.peek() {
            None => Ok(()),
            Some(Token {
                kind: TokenKind::Newline,
                ..
            }) => {
                self.pos += 1;
                Ok(())
            }
            Some(tok) => Err(self.unexpected(&TokenKind::Newline, tok)),
        }
    }

    fn expect_colon(&mut self, key_pos: Position) -> ParseResult<()> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Colon,
                ..
            }) => {
                self.pos += 1;
                Ok(())
            }
            Some(tok) => Err(self.unexpected(&TokenKind::Colon, tok)),
            None => Err(self.fatal(Diagnostic::error(key_pos, "Unexpected end of file (EOF)"))),
        }
    }

    /// Parse one block, whose lines are all indented by `width` spaces.
    ///
    /// The block ends at the first line indented less than `width` (that
    /// line is left for the caller) or at the end of input.
    fn parse_block<'s>(
        &mut self,
        scope: Option<&'s Block>,
        width: usize,
        top_level: bool,
        anchor: Position,
    ) -> ParseResult<Value> {
        let mut state = BlockState::new(scope, width, top_level, anchor);

        while let Some((indent, at)) = self.next_line_indent() {
            if indent < state.width {
                break;
            }
            if indent > state.width {
                // Deeper blocks can only be opened by a key.
                let diagnostic = if state.top_level {
                    Diagnostic::error(at, "No indentation allowed outside of blocks")
                } else {
                    let msg = format!(
                        "Invalid indentation: Expected {} spaces, found {}",
                        state.width, indent
                    );
                    Diagnostic::error(at, msg)
                };
                return Err(self.fatal(diagnostic));
            }
            if indent > 0 {
                self.pos += 1;
            }
            self.parse_line(&mut state)?;
        }

        self.check_required(&state);
        Ok(state.value)
    }

    fn parse_line<'s>(&mut self, state: &mut BlockState<'s>) -> ParseResult<()> {
        let tok = match self.peek() {
            Some(tok) => tok,
            None => return Ok(()),
        };
        match &tok.kind {
            TokenKind::Dash => self.parse_entry(state, tok.pos),
            TokenKind::Text(key) => {
                match state.kind {
                    BlockKind::Unknown => state.start_mapping(),
                    BlockKind::Mapping => {}
                    BlockKind::Sequence => {
                        if !state.open_entry {
                            return Err(self.fatal(Diagnostic::error(tok.pos, ARRAY_ONLY)));
                        }
                    }
                }
                self.pos += 1;
                self.parse_pair(state, key, tok.pos)
            }
            TokenKind::Number(_) => Err(self.fatal(Diagnostic::syntax_error(
                tok.pos,
                "Number literals cannot start attribute names",
            ))),
            other => {
                let msg = format!("Did not expect to find \"{}\" here", other);
                Err(self.fatal(Diagnostic::syntax_error(tok.pos, msg)))
            }
        }
    }

    // One `- ...` line in a sequence.
    fn parse_entry<'s>(&mut self, state: &mut BlockState<'s>, dash_pos: Position) -> ParseResult<()> {
        match state.kind {
            BlockKind::Unknown => state.start_sequence(),
            BlockKind::Sequence => {}
            BlockKind::Mapping => {
                return Err(self.fatal(Diagnostic::error(dash_pos, ARRAY_ONLY)));
            }
        }
        self.pos += 1;
        state.open_entry = false;
        self.check_entry(state, dash_pos);
        self.eat_spaces();

        let tok = match self.peek() {
            Some(tok) => tok,
            None => {
                state.value.push(Value::Null);
                return Ok(());
            }
        };
        let key_follows = self.peek_kind_at(1) == Some(&TokenKind::Colon);
        match &tok.kind {
            TokenKind::Text(key) if key_follows => {
                state.value.push(Value::empty_map());
                state.open_entry = true;
                self.pos += 1;
                self.parse_pair(state, key, tok.pos)
            }
            TokenKind::Number(_) if key_follows => Err(self.fatal(Diagnostic::syntax_error(
                tok.pos,
                "Number literals cannot start attribute names",
            ))),
            TokenKind::Text(s) => {
                state.value.push(Value::Text(s.clone()));
                self.pos += 1;
                self.expect_line_end()
            }
            TokenKind::Number(n) => {
                state.value.push(Value::from_float(*n));
                self.pos += 1;
                self.expect_line_end()
            }
            TokenKind::Newline => {
                state.value.push(Value::Null);
                self.pos += 1;
                Ok(())
            }
            other => {
                let msg = format!("Did not expect to find \"{}\" here", other);
                Err(self.fatal(Diagnostic::syntax_error(tok.pos, msg)))
            }
        }
    }

    // `key: value`, `key:` followed by a nested block, or `key:` alone.
    // The key token has already been consumed.
    fn parse_pair<'s>(
        &mut self,
        state: &mut BlockState<'s>,
        key: &'t str,
        key_pos: Position,
    ) -> ParseResult<()> {
        self.expect_colon(key_pos)?;
        self.eat_spaces();

        match self.peek() {
            Some(Token {
                kind: TokenKind::Text(s),
                ..
            }) => {
                self.pos += 1;
                self.validate_pair(state, key, key_pos, Shape::Text(s));
                state.value.insert(key, Value::Text(s.clone()));
                self.expect_line_end()
            }
            Some(Token {
                kind: TokenKind::Number(n),
                ..
            }) => {
                self.pos += 1;
                self.validate_pair(state, key, key_pos, Shape::Number(*n));
                state.value.insert(key, Value::from_float(*n));
                self.expect_line_end()
            }
            Some(Token {
                kind: TokenKind::Newline,
                ..
            })
            | None => {
                if self.pos < self.tokens.len() {
                    self.pos += 1;
                }
                match self.next_line_indent() {
                    Some((indent, _)) if indent > state.width => {
                        let child = self.validate_pair(state, key, key_pos, Shape::Block);
                        let value = self.parse_block(child, indent, false, key_pos)?;
                        state.value.insert(key, value);
                    }
                    _ => {
                        self.validate_pair(state, key, key_pos, Shape::Empty);
                        self.emit(Diagnostic::warning(key_pos, "Empty block"));
                        state.value.insert(key, Value::Null);
                    }
                }
                Ok(())
            }
            Some(tok) => Err(self.unexpected(&TokenKind::Newline, tok)),
        }
    }

    // Check a key and its value against the block's schema.
    //
    // Returns the schema for the key's nested block, if it has one.
    fn validate_pair<'s>(
        &mut self,
        state: &BlockState<'s>,
        key: &str,
        key_pos: Position,
        shape: Shape<'_>,
    ) -> Option<&'s Block> {
        // Keys inside sequence entries aren't checked individually.
        if state.kind == BlockKind::Sequence {
            return None;
        }
        let scope = state.scope?;
        let prop = match scope.child(key) {
            Some(prop) => prop,
            None => {
                let msg = format!(
                    "Property \"{}\" not allowed here. Allowed options: \"{}\"",
                    key,
                    join_or_none(scope.children.keys())
                );
                self.emit(Diagnostic::format_error(key_pos, msg));
                return None;
            }
        };
        if !self.seen.insert(prop as *const Property) {
            let msg = format!("Duplicate property {}", key);
            self.emit(Diagnostic::format_error(key_pos, msg));
        } else if let Some(msg) = value_mismatch(key, &prop.node, &shape) {
            self.emit(Diagnostic::format_error(key_pos, msg));
        }
        prop.node.as_block()
    }

    fn check_entry(&mut self, state: &BlockState<'_>, pos: Position) {
        if let Some(scope) = state.scope {
            if !scope.allow_list_values {
                self.emit(Diagnostic::format_error(pos, "Array values are not allowed here"));
            }
        }
    }

    // Report required keys of a mapping block that the run never matched.
    fn check_required(&mut self, state: &BlockState<'_>) {
        if state.kind == BlockKind::Sequence {
            return;
        }
        let scope = match state.scope {
            Some(scope) => scope,
            None => return,
        };
        let required = scope.children.iter().filter(|(_, prop)| prop.required);
        for (name, prop) in required {
            if !self.seen.contains(&(prop as *const Property)) {
                let msg = format!("Option \"{}\" is required", name);
                self.emit(Diagnostic::format_error(state.anchor, msg));
            }
        }
    }
}

// Returns a message if the value doesn't fit the schema node.
fn value_mismatch(key: &str, node: &Node, shape: &Shape<'_>) -> Option<String> {
    match (node, shape) {
        // An empty block has its own warning.
        (_, Shape::Empty) => None,
        (Node::StringOneOf(allowed), Shape::Text(s)) => {
            if string_allowed(allowed, s) {
                None
            } else {
                Some(format!(
                    "Only following values are allowed: {}",
                    join_or_none(allowed)
                ))
            }
        }
        (Node::StringOneOf(_), _) => Some("Only string literals allowed".into()),
        (Node::String, Shape::Text(_)) => None,
        (Node::String, _) => Some(format!("{} should be a string literal", key)),
        (Node::NumberOneOf(allowed), Shape::Number(n)) => {
            if number_allowed(allowed, *n) {
                None
            } else {
                Some(format!(
                    "Only following values are allowed: {}",
                    join_or_none(allowed)
                ))
            }
        }
        (Node::Number, Shape::Number(_)) => None,
        (Node::Number, _) | (Node::NumberOneOf(_), _) => {
            Some(format!("{} should be a number literal", key))
        }
        (Node::Block(_), Shape::Block) => None,
        (Node::Block(_), _) => Some(format!("{} should be a block", key)),
    }
}

/// Validate document text against a schema.
///
/// Returns every diagnostic found, in the order they were discovered. An
/// empty list means the document is valid. Empty or whitespace-only text
/// is always valid.
///
/// ```
/// use ymlcheck::schema::*;
/// use ymlcheck::validate;
///
/// let schema = Schema::new(Block::new().with("port", Property::new(number())));
///
/// assert!(validate(&schema, "port: 8080\n").is_empty());
///
/// let diagnostics = validate(&schema, "port: http\n");
/// assert_eq!(diagnostics[0].message, "Format Error: port should be a number literal");
/// ```
pub fn validate(schema: &Schema, text: &str) -> Vec<Diagnostic> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let tokens = match tokenize(text) {
        Ok(tokens) => tokens,
        Err(err) => {
            debug!("lexing stopped: {}", err);
            return vec![err.into()];
        }
    };

    let mut parser = Parser::new(&tokens);
    let value = parser.parse_document(&schema.root);
    trace!("document value: {:?}", value);

    let diagnostics = parser.into_diagnostics();
    debug!(
        "validated {} tokens, {} diagnostics",
        tokens.len(),
        diagnostics.len()
    );
    diagnostics
}

/// Create a validation function bound to a schema.
///
/// The returned function keeps its own copy of the schema, so it can be
/// called any number of times, from any thread.
///
/// ```
/// use ymlcheck::schema::*;
/// use ymlcheck::make_validator;
///
/// let schema = Schema::new(Block::new().with("name", Property::new(string())));
/// let check = make_validator(&schema);
/// drop(schema);
///
/// assert!(check("name: x\n").is_empty());
/// assert_eq!(check("other: x\n").len(), 1);
/// ```
pub fn make_validator(schema: &Schema) -> impl Fn(&str) -> Vec<Diagnostic> {
    let schema = schema.clone();
    move |text| validate(&schema, text)
}
