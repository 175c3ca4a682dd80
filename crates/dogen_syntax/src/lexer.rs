//! Lexical analyzer for test block bodies.
//!
//! Converts a comment-blanked body slice into a sequence of [`Token`]s.
//! The slice is lexed at a byte offset `base` within the input file so that
//! every span is file-absolute. Errors are reported to the [`DiagnosticSink`]
//! and produce [`TestToken::Error`] tokens.

use crate::token::{lookup_keyword, TestToken, Token};
use dogen_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use dogen_source::Span;

/// Lexes the given body text into a vector of tokens.
///
/// `base` is the byte offset of `source` within the input file. The returned
/// vector always ends with a [`TestToken::Eof`] token. Lexer errors are
/// reported via the diagnostic sink and produce [`TestToken::Error`] tokens.
pub fn lex(source: &str, base: u32, sink: &DiagnosticSink) -> Vec<Token> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
        base,
        sink,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    base: u32,
    sink: &'a DiagnosticSink,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: TestToken::Eof,
                    span: self.span_from(self.pos),
                });
                break;
            }
            tokens.push(self.next_token());
        }
        tokens
    }

    fn peek(&self) -> u8 {
        if self.pos < self.source.len() {
            self.source[self.pos]
        } else {
            0
        }
    }

    fn peek_at(&self, offset: usize) -> u8 {
        let idx = self.pos + offset;
        if idx < self.source.len() {
            self.source[idx]
        } else {
            0
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.base + start as u32, self.base + self.pos as u32)
    }

    fn error(&self, msg: &str, span: Span) {
        self.sink.emit(Diagnostic::error(
            DiagnosticCode::new(Category::Error, 100),
            msg,
            span,
        ));
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let b = self.peek();

        // The 7seg helper is the one identifier that starts with a digit.
        if b == b'7' && self.source[self.pos..].starts_with(b"7seg") && !is_word(self.peek_at(4)) {
            self.pos += 4;
            return Token {
                kind: TestToken::SevenSeg,
                span: self.span_from(start),
            };
        }

        if b.is_ascii_digit() {
            return self.lex_number(start);
        }

        if is_word_start(b) {
            while is_word(self.peek()) {
                self.pos += 1;
            }
            let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or("");
            let kind = lookup_keyword(text).unwrap_or(TestToken::Identifier);
            return Token {
                kind,
                span: self.span_from(start),
            };
        }

        let kind = match b {
            b'{' => TestToken::LBrace,
            b'}' => TestToken::RBrace,
            b'[' => TestToken::LBracket,
            b']' => TestToken::RBracket,
            b'(' => TestToken::LParen,
            b')' => TestToken::RParen,
            b';' => TestToken::Semicolon,
            b':' => TestToken::Colon,
            b',' => TestToken::Comma,
            b'*' => TestToken::Star,
            b'+' => TestToken::Plus,
            b'=' => {
                self.pos += 1;
                let kind = if self.peek() == b'=' {
                    self.pos += 1;
                    TestToken::EqEq
                } else {
                    TestToken::Eq
                };
                return Token {
                    kind,
                    span: self.span_from(start),
                };
            }
            _ => {
                // Advance over the whole character, not one byte, so the
                // next token never starts on a UTF-8 continuation byte.
                let rest = std::str::from_utf8(&self.source[self.pos..]).unwrap_or("");
                let ch = rest.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
                self.pos += ch.len_utf8().max(1);
                let span = self.span_from(start);
                self.error(&format!("unexpected character '{ch}'"), span);
                return Token {
                    kind: TestToken::Error,
                    span,
                };
            }
        };
        self.pos += 1;
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn lex_number(&mut self, start: usize) -> Token {
        // 0x-prefixed hex literal
        if self.peek() == b'0' && self.peek_at(1) == b'x' {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek().is_ascii_hexdigit() {
                self.pos += 1;
            }
            let span = self.span_from(start);
            if self.pos == digits_start {
                self.error("hex literal is missing digits after '0x'", span);
                return Token {
                    kind: TestToken::Error,
                    span,
                };
            }
            return Token {
                kind: TestToken::HexInt,
                span,
            };
        }

        while self.peek().is_ascii_digit() {
            self.pos += 1;
        }
        Token {
            kind: TestToken::Int,
            span: self.span_from(start),
        }
    }
}

fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
