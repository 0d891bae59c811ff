//! Recursive-descent parser for Kite.
//!
//! The parser holds exactly one token of lookahead. Each production
//! consumes the tokens it recognizes and leaves the lookahead at the
//! first unconsumed token, so the top-level compile loop can resume
//! after an error by skipping a single token.
//!
//! Grammar:
//!
//!   primary     := NUMBER | STRING | call_or_var | '(' primary ')' | extern_decl
//!   call_or_var := IDENT [ '(' (primary (',' primary)*)? ')' ]
//!   extern_decl := 'extern' IDENT

use crate::ast::Node;
use crate::error::CompileError;
use crate::lexer::{Lexer, Token, TokenKind};

/// Hard bound on expression nesting, so deeply parenthesized input
/// fails with an error instead of exhausting the stack.
pub const MAX_NESTING: usize = 256;

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
    depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Parser {
            lexer,
            current,
            depth: 0,
        }
    }

    /// Whether the lookahead token is end-of-input.
    pub fn at_eof(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    /// Byte offset of the lookahead token.
    pub fn offset(&self) -> usize {
        self.current.start
    }

    /// Advance past the lookahead token. Used by the compile loop to
    /// resynchronize after a syntax error; a no-op at end of input.
    pub fn bump(&mut self) {
        self.current = self.lexer.next_token();
    }

    /// Parse one primary, leaving the lookahead at the first
    /// unconsumed token.
    pub fn parse_primary(&mut self) -> Result<Node, CompileError> {
        if self.depth >= MAX_NESTING {
            return Err(CompileError::TooDeep(MAX_NESTING));
        }
        self.depth += 1;
        let result = self.parse_primary_inner();
        self.depth -= 1;
        result
    }

    fn parse_primary_inner(&mut self) -> Result<Node, CompileError> {
        let offset = self.current.start;
        match self.current.kind.clone() {
            TokenKind::Number(text) => {
                self.bump();
                Ok(Node::Number(parse_int(&text)?))
            }
            TokenKind::Str(raw) => {
                self.bump();
                Ok(Node::Str(decode_escapes(&raw)))
            }
            TokenKind::Ident(name) => {
                self.bump();
                if self.eat_punct('(') {
                    self.parse_call_args(name)
                } else {
                    Ok(Node::Variable(name))
                }
            }
            TokenKind::Extern => {
                self.bump();
                match self.current.kind.clone() {
                    TokenKind::Ident(name) => {
                        self.bump();
                        Ok(Node::Extern(name))
                    }
                    _ => Err(self.error_here("expected identifier after 'extern'")),
                }
            }
            TokenKind::Punct('(') => {
                self.bump();
                let inner = self.parse_primary()?;
                if self.eat_punct(')') {
                    Ok(inner)
                } else {
                    Err(self.error_here("expected ')'"))
                }
            }
            TokenKind::Eof => Err(CompileError::Parse {
                offset,
                message: "unexpected end of input".to_string(),
            }),
            TokenKind::Punct(ch) => Err(CompileError::Parse {
                offset,
                message: format!("unexpected '{ch}'"),
            }),
        }
    }

    /// Parse the argument list of a call; the callee identifier and
    /// the opening `(` have already been consumed.
    fn parse_call_args(&mut self, callee: String) -> Result<Node, CompileError> {
        let mut args = Vec::new();
        if self.eat_punct(')') {
            return Ok(Node::Call { callee, args });
        }
        loop {
            args.push(self.parse_primary()?);
            if self.eat_punct(',') {
                continue;
            }
            if self.eat_punct(')') {
                break;
            }
            return Err(self.error_here("expected ',' or ')' in argument list"));
        }
        Ok(Node::Call { callee, args })
    }

    fn eat_punct(&mut self, ch: char) -> bool {
        if self.current.kind == TokenKind::Punct(ch) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn error_here(&self, message: &str) -> CompileError {
        CompileError::Parse {
            offset: self.current.start,
            message: message.to_string(),
        }
    }
}

/// Interpret numeric literal text as a signed 32-bit integer.
///
/// Digits after the first `.` are truncated: the language lexes
/// fractional literals but has no decimal type. An empty integer part
/// (a literal like `.`) is zero.
fn parse_int(text: &str) -> Result<i32, CompileError> {
    let integral = text.split('.').next().unwrap_or("");
    if integral.is_empty() {
        return Ok(0);
    }
    integral
        .parse::<i32>()
        .map_err(|_| CompileError::IntOutOfRange(text.to_string()))
}

/// Decode the two-character escapes of a raw string interior.
///
/// Recognized pairs are `\n`, `\t`, `\\`, `\"`, `\r`, `\0`. For any
/// other pair the backslash is dropped and the following character is
/// kept literally. A lone trailing backslash is dropped.
fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
