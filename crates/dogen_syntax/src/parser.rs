//! Recursive descent parser for test block bodies.
//!
//! Builds the [`Item`] tree for one test block from the token stream. Unlike
//! the bracket validator, parsing is fail-fast: the first offending statement
//! aborts the whole generation, so every parse method returns `Option` and
//! `None` propagates outward after a diagnostic has been emitted.

use crate::ast::{Assert, Assign, Expr, ForBlock, Index, Item, PermuteBlock, Value, VarRef};
use crate::lexer::lex;
use crate::token::{TestToken, Token};
use dogen_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use dogen_source::Span;

/// Parses one extracted test block body into a list of items.
///
/// `source` is the full comment-blanked file text and `body` the body span
/// produced by the block extractor; token spans stay file-absolute.
pub fn parse_test_body(source: &str, body: Span, sink: &DiagnosticSink) -> Option<Vec<Item>> {
    let text = &source[body.start as usize..body.end as usize];
    let tokens = lex(text, body.start, sink);
    if tokens.iter().any(|t| t.kind == TestToken::Error) {
        return None;
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        source,
        sink,
        in_permute: false,
    };
    let items = parser.parse_items()?;
    if !parser.at_eof() {
        parser.expected("statement");
        return None;
    }
    Some(items)
}

struct Parser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'src str,
    sink: &'src DiagnosticSink,
    in_permute: bool,
}

impl<'src> Parser<'src> {
    // ========================================================================
    // Primitive operations
    // ========================================================================

    fn current(&self) -> TestToken {
        self.tokens[self.pos].kind
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn current_text(&self) -> &'src str {
        let span = self.current_span();
        &self.source[span.start as usize..span.end as usize]
    }

    fn at(&self, kind: TestToken) -> bool {
        self.current() == kind
    }

    fn at_eof(&self) -> bool {
        self.current() == TestToken::Eof
    }

    fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: TestToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TestToken, what: &str) -> Option<()> {
        if self.eat(kind) {
            Some(())
        } else {
            self.expected(what);
            None
        }
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    // ========================================================================
    // Error reporting
    // ========================================================================

    fn error(&self, code: u16, msg: impl Into<String>) -> Diagnostic {
        Diagnostic::error(
            DiagnosticCode::new(Category::Error, code),
            msg,
            self.current_span(),
        )
    }

    fn expected(&self, what: &str) {
        let found = if self.at_eof() {
            "end of block".to_string()
        } else {
            format!("'{}'", self.current_text())
        };
        self.sink
            .emit(self.error(101, format!("expected {what}, found {found}")));
    }

    // ========================================================================
    // Items
    // ========================================================================

    /// Parses items until `}` or end of block.
    fn parse_items(&mut self) -> Option<Vec<Item>> {
        let mut items = Vec::new();
        loop {
            // Stray separators between statements are harmless.
            while self.eat(TestToken::Semicolon) {}
            if self.at_eof() || self.at(TestToken::RBrace) {
                return Some(items);
            }
            items.push(self.parse_item()?);
        }
    }

    fn parse_item(&mut self) -> Option<Item> {
        match self.current() {
            TestToken::For => self.parse_for().map(Item::For),
            TestToken::Permute => self.parse_permute().map(Item::Permute),
            TestToken::Assert => self.parse_assert().map(Item::Assert),
            TestToken::Identifier => self.parse_assign().map(Item::Assign),
            _ => {
                self.expected("statement");
                None
            }
        }
    }

    fn parse_for(&mut self) -> Option<ForBlock> {
        let start = self.current_span();
        self.expect(TestToken::For, "'for'")?;
        let var = self.expect_ident("loop variable")?;
        self.expect(TestToken::In, "'in'")?;
        self.expect(TestToken::LBracket, "'[' starting the loop range")?;
        let lo = self.parse_expr()?;
        self.expect(TestToken::Colon, "':' between the range bounds")?;
        let hi = self.parse_expr()?;
        self.expect(TestToken::RBracket, "']' closing the loop range")?;
        self.expect(TestToken::LBrace, "'{' starting the loop body")?;
        let body = self.parse_items()?;
        self.expect(TestToken::RBrace, "'}' closing the loop body")?;
        Some(ForBlock {
            var,
            lo,
            hi,
            body,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_permute(&mut self) -> Option<PermuteBlock> {
        let start = self.current_span();
        if self.in_permute {
            self.sink
                .emit(self.error(202, "nested permute blocks are not valid"));
            return None;
        }
        self.expect(TestToken::Permute, "'permute'")?;
        self.expect(TestToken::LBrace, "'{' starting the permute body")?;
        self.in_permute = true;
        let body = self.parse_items();
        self.in_permute = false;
        let body = body?;
        self.expect(TestToken::RBrace, "'}' closing the permute body")?;
        Some(PermuteBlock {
            body,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_assert(&mut self) -> Option<Assert> {
        let start = self.current_span();
        self.expect(TestToken::Assert, "'assert'")?;
        let target = self.parse_varref()?;
        if self.at(TestToken::Eq) {
            self.sink.emit(
                self.error(
                    102,
                    "double equals (\"==\") must be used in assert statements",
                )
                .with_help("single equals is reserved for assignment"),
            );
            return None;
        }
        self.expect(TestToken::EqEq, "'=='")?;
        let expected = self.parse_value(false)?;
        self.expect(TestToken::Semicolon, "';'")?;
        Some(Assert {
            target,
            expected,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_assign(&mut self) -> Option<Assign> {
        let start = self.current_span();
        let target = self.parse_varref()?;
        if self.at(TestToken::EqEq) {
            self.sink.emit(
                self.error(101, "'==' is only valid in assert statements")
                    .with_help("use '=' for assignment"),
            );
            return None;
        }
        self.expect(TestToken::Eq, "'='")?;
        let value = self.parse_value(true)?;
        self.expect(TestToken::Semicolon, "';'")?;
        Some(Assign {
            target,
            value,
            span: start.merge(self.prev_span()),
        })
    }

    fn expect_ident(&mut self, what: &str) -> Option<String> {
        if self.at(TestToken::Identifier) {
            let text = self.current_text().to_string();
            self.advance();
            Some(text)
        } else {
            self.expected(what);
            None
        }
    }

    fn parse_varref(&mut self) -> Option<VarRef> {
        let start = self.current_span();
        let base = self.expect_ident("a signal name")?;
        let index = if self.eat(TestToken::LBracket) {
            let first = self.parse_expr()?;
            let index = if self.eat(TestToken::Colon) {
                let second = self.parse_expr()?;
                Index::Range(first, second)
            } else {
                Index::Single(first)
            };
            self.expect(TestToken::RBracket, "']' closing the index")?;
            index
        } else {
            Index::None
        };
        Some(VarRef {
            base,
            index,
            span: start.merge(self.prev_span()),
        })
    }

    // ========================================================================
    // Values and expressions
    // ========================================================================

    /// Parses the right-hand side of an assignment or assertion.
    fn parse_value(&mut self, allow_wildcard: bool) -> Option<Value> {
        match self.current() {
            TestToken::Int => {
                let raw = self.current_text().to_string();
                self.advance();
                Some(Value::Bits(raw))
            }
            TestToken::Star if allow_wildcard => {
                self.advance();
                Some(Value::Wildcard)
            }
            TestToken::SevenSeg => self.parse_seven_seg().map(Value::Call),
            TestToken::Identifier if self.current_text() == "bin" => {
                self.parse_bin().map(Value::Call)
            }
            TestToken::HexInt => {
                self.sink.emit(
                    self.error(101, "hex literals are not valid bit values")
                        .with_help("use bin(0x.., width) to produce a fixed-width pattern"),
                );
                None
            }
            _ => {
                let what = if allow_wildcard {
                    "a bit literal, helper call, or '*'"
                } else {
                    "a bit literal or helper call"
                };
                self.expected(what);
                None
            }
        }
    }

    /// Parses a restricted integer expression: a term or a homogeneous
    /// `+`/`*` chain of terms.
    fn parse_expr(&mut self) -> Option<Expr> {
        let first = self.parse_term()?;
        match self.current() {
            TestToken::Plus => {
                let mut terms = vec![first];
                while self.eat(TestToken::Plus) {
                    terms.push(self.parse_term()?);
                }
                if self.at(TestToken::Star) {
                    self.sink
                        .emit(self.error(101, "mixed '+' and '*' in one expression"));
                    return None;
                }
                Some(Expr::Sum(terms))
            }
            TestToken::Star => {
                let mut terms = vec![first];
                while self.eat(TestToken::Star) {
                    terms.push(self.parse_term()?);
                }
                if self.at(TestToken::Plus) {
                    self.sink
                        .emit(self.error(101, "mixed '+' and '*' in one expression"));
                    return None;
                }
                Some(Expr::Product(terms))
            }
            _ => Some(first),
        }
    }

    fn parse_term(&mut self) -> Option<Expr> {
        match self.current() {
            TestToken::Int => {
                let value = self.parse_int_text(self.current_text(), 10)?;
                self.advance();
                Some(Expr::Int(value))
            }
            TestToken::HexInt => {
                let text = self.current_text();
                let value = self.parse_int_text(&text[2..], 16)?;
                self.advance();
                Some(Expr::Int(value))
            }
            TestToken::SevenSeg => self.parse_seven_seg(),
            TestToken::Identifier => {
                if self.current_text() == "bin" && self.tokens[self.pos + 1].kind == TestToken::LParen
                {
                    self.parse_bin()
                } else {
                    let name = self.current_text().to_string();
                    self.advance();
                    Some(Expr::Var(name))
                }
            }
            _ => {
                self.expected("an integer expression");
                None
            }
        }
    }

    fn parse_int_text(&self, digits: &str, radix: u32) -> Option<i64> {
        match i64::from_str_radix(digits, radix) {
            Ok(v) => Some(v),
            Err(_) => {
                self.sink
                    .emit(self.error(101, format!("integer literal '{digits}' is too large")));
                None
            }
        }
    }

    fn parse_bin(&mut self) -> Option<Expr> {
        self.advance(); // `bin`
        self.expect(TestToken::LParen, "'(' after 'bin'")?;
        let value = self.parse_expr()?;
        if !self.eat(TestToken::Comma) {
            self.sink
                .emit(self.error(101, "the bin() helper takes exactly two arguments"));
            return None;
        }
        let width = self.parse_expr()?;
        if self.at(TestToken::Comma) {
            self.sink
                .emit(self.error(101, "the bin() helper takes exactly two arguments"));
            return None;
        }
        self.expect(TestToken::RParen, "')' closing the bin() call")?;
        Some(Expr::Bin(Box::new(value), Box::new(width)))
    }

    fn parse_seven_seg(&mut self) -> Option<Expr> {
        self.advance(); // `7seg`
        self.expect(TestToken::LParen, "'(' after '7seg'")?;
        let value = self.parse_expr()?;
        self.expect(TestToken::RParen, "')' closing the 7seg() call")?;
        Some(Expr::SevenSeg(Box::new(value)))
    }
}
