//! Parser for the redwire DSL.
//!
//! A program is line oriented: the first line declares input ports, every
//! middle line binds a name to a circuit call, and the last line names the
//! output port.

mod expression;
mod lowering;

use redwire_ir::{AnnotatedCircuit, DebugCircuit};

use crate::ast::{Port, Program};
use crate::error::{HdlError, HdlResult};
use crate::lexer::{SpannedToken, Token, line_of, tokenize};
use crate::options::HdlOptions;
use crate::registry::Registry;

/// Parse DSL source into a [`Program`].
pub fn parse(source: &str) -> HdlResult<Program> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()
}

/// Compile DSL source into a flat circuit, resolving calls in `registry`.
///
/// A [`HdlError::MissingDependency`] leaves nothing behind: register the
/// named circuit and call again.
pub fn compile(
    source: &str,
    registry: &Registry,
    options: &HdlOptions,
) -> HdlResult<AnnotatedCircuit> {
    let program = parse(source)?;
    let builder = lowering::lower(&program, registry, options)?;
    Ok(builder.to_circuit()?)
}

/// Like [`compile`], but keeps every binding addressable as a probe point.
pub fn compile_debug(
    source: &str,
    registry: &Registry,
    options: &HdlOptions,
) -> HdlResult<DebugCircuit> {
    let program = parse(source)?;
    let builder = lowering::lower(&program, registry, options)?;
    Ok(builder.to_debug_circuit()?)
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
    pub(super) line: usize,
}

impl Parser {
    /// Create a new parser from source.
    fn new(source: &str) -> HdlResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, message)) => {
                    return Err(HdlError::Lexer {
                        line: line_of(source, span.start),
                        message,
                    });
                }
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            line: 1,
        })
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.peek_nth(0)
    }

    /// Peek `n` tokens ahead.
    pub(super) fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|t| &t.token)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        if token == Token::Newline {
            self.line += 1;
        }
        Some(token)
    }

    /// Expect a specific token.
    pub(super) fn expect(&mut self, expected: &Token) -> HdlResult<()> {
        match self.peek() {
            Some(found) if std::mem::discriminant(found) == std::mem::discriminant(expected) => {
                self.advance();
                Ok(())
            }
            found => Err(self.unexpected(&expected.to_string(), found.cloned())),
        }
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Whether the current line is finished.
    pub(super) fn at_line_end(&self) -> bool {
        self.is_eof() || self.check(&Token::Newline)
    }

    pub(super) fn syntax(&self, message: impl Into<String>) -> HdlError {
        HdlError::Syntax {
            line: self.line,
            message: message.into(),
        }
    }

    pub(super) fn unexpected(&self, expected: &str, found: Option<Token>) -> HdlError {
        match found {
            Some(token) => self.syntax(format!("expected {expected}, found {token}")),
            None => self.syntax(format!("expected {expected}, found end of input")),
        }
    }

    fn skip_blank_lines(&mut self) {
        while self.consume(&Token::Newline) {}
    }

    /// Whether the current line has the shape `name = ...`.
    fn at_binding(&self) -> bool {
        matches!(self.peek(), Some(Token::Identifier(_)))
            && matches!(self.peek_nth(1), Some(Token::Eq))
    }

    /// Parse the entire program.
    fn parse_program(&mut self) -> HdlResult<Program> {
        self.skip_blank_lines();
        if self.is_eof() {
            return Err(self.syntax("empty program"));
        }
        if self.at_binding() {
            return Err(self.syntax("first line must declare the input ports"));
        }
        let inputs = self.parse_port_line()?;

        let mut bindings = Vec::new();
        loop {
            self.skip_blank_lines();
            if self.is_eof() {
                return Err(self.syntax("missing output line"));
            }
            if !self.at_binding() {
                break;
            }
            bindings.push(self.parse_binding()?);
        }

        let output_line = self.line;
        let outputs = self.parse_port_line()?;
        self.skip_blank_lines();
        if !self.is_eof() {
            return Err(self.syntax("unexpected content after the output line"));
        }

        Ok(Program {
            inputs,
            bindings,
            outputs,
            output_line,
        })
    }

    /// Parse a whitespace-separated list of ports up to the end of line.
    fn parse_port_line(&mut self) -> HdlResult<Vec<Port>> {
        let mut ports = Vec::new();
        while !self.at_line_end() {
            ports.push(self.parse_port()?);
        }
        Ok(ports)
    }

    /// Parse `[<width>:]<name>`.
    fn parse_port(&mut self) -> HdlResult<Port> {
        let width = match self.peek() {
            Some(Token::IntLiteral(width)) => {
                let width = *width;
                self.advance();
                self.expect(&Token::Colon)?;
                if width == 0 {
                    return Err(self.syntax("port width must be positive"));
                }
                Some(width)
            }
            _ => None,
        };
        let name = self.parse_identifier()?;
        Ok(Port { name, width })
    }

    /// Parse an identifier.
    pub(super) fn parse_identifier(&mut self) -> HdlResult<String> {
        match self.peek().cloned() {
            Some(Token::Identifier(s)) => {
                self.advance();
                Ok(s)
            }
            found => Err(self.unexpected("identifier", found)),
        }
    }
}
