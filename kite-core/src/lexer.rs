//! Lexer for Kite source text.
//!
//! The lexer is a forward-only scanner over the source bytes that
//! hands out one token per call. It never reports errors: malformed
//! input degenerates to best-effort tokens (an unterminated string,
//! for example, consumes the rest of the input and lexes to `Eof`).

/// Kind of a token, carrying its source text where relevant.
///
/// String interiors are stored verbatim, escapes included; decoding
/// them is the parser's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    /// The `extern` keyword.
    Extern,
    Ident(String),
    /// Numeric literal text: digits and `.` characters, uninterpreted.
    Number(String),
    /// Raw string interior, without the surrounding quotes.
    Str(String),
    /// Any other single character, verbatim.
    Punct(char),
}

/// A token plus the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
}

pub struct Lexer<'src> {
    bytes: &'src [u8],
    index: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            bytes: source.as_bytes(),
            index: 0,
        }
    }

    /// Scan and return the next token, advancing past it.
    pub fn next_token(&mut self) -> Token {
        loop {
            while let Some(ch) = self.peek_char() {
                if is_whitespace(ch) {
                    self.consume_char();
                } else {
                    break;
                }
            }

            let start = self.index;
            let Some(ch) = self.peek_char() else {
                return Token {
                    kind: TokenKind::Eof,
                    start,
                };
            };

            // Line comments are fully transparent to the token stream.
            if ch == b'#' {
                while let Some(ch) = self.peek_char() {
                    self.consume_char();
                    if ch == b'\n' {
                        break;
                    }
                }
                continue;
            }

            let kind = if ch.is_ascii_alphabetic() {
                self.lex_ident_or_keyword()
            } else if ch.is_ascii_digit() || ch == b'.' {
                self.lex_number()
            } else if ch == b'"' {
                self.lex_string()
            } else {
                self.consume_char();
                TokenKind::Punct(ch as char)
            };

            return Token { kind, start };
        }
    }

    fn lex_ident_or_keyword(&mut self) -> TokenKind {
        let start = self.index;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() {
                self.consume_char();
            } else {
                break;
            }
        }
        let text = self.slice(start, self.index);
        if text == "extern" {
            TokenKind::Extern
        } else {
            TokenKind::Ident(text.to_string())
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        let start = self.index;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() || ch == b'.' {
                self.consume_char();
            } else {
                break;
            }
        }
        TokenKind::Number(self.slice(start, self.index).to_string())
    }

    fn lex_string(&mut self) -> TokenKind {
        // Opening quote.
        self.consume_char();
        let content_start = self.index;
        while let Some(ch) = self.peek_char() {
            match ch {
                b'"' => {
                    let raw = self.slice(content_start, self.index).to_string();
                    self.consume_char();
                    return TokenKind::Str(raw);
                }
                b'\\' => {
                    // A backslash always takes the following character
                    // with it, so an escaped quote does not terminate.
                    self.consume_char();
                    if self.peek_char().is_some() {
                        self.consume_char();
                    }
                }
                _ => {
                    self.consume_char();
                }
            }
        }
        // Unterminated: the rest of the input is gone, degrade to Eof.
        TokenKind::Eof
    }

    fn slice(&self, start: usize, end: usize) -> &'src str {
        core::str::from_utf8(&self.bytes[start..end]).expect("token boundaries lie on ASCII bytes")
    }

    fn peek_char(&self) -> Option<u8> {
        self.bytes.get(self.index).copied()
    }

    fn consume_char(&mut self) {
        if self.index < self.bytes.len() {
            self.index += 1;
        }
    }
}

fn is_whitespace(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\n' | b'\r')
}
