//! Token types for the test-description lexer.
//!
//! Defines the [`TestToken`] enum covering the DSL's keywords, punctuation,
//! and literals, plus the [`Token`] struct pairing a token kind with its
//! source [`Span`].

use dogen_source::Span;
use serde::{Deserialize, Serialize};

/// A test-description token kind.
///
/// Literal values are not stored in the token; they are retrieved from the
/// source text using the token's span. `7seg` gets its own kind because it
/// starts with a digit and would otherwise lex as a number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TestToken {
    // === Keywords ===
    /// `assert`
    Assert,
    /// `for`
    For,
    /// `in`
    In,
    /// `permute`
    Permute,
    /// `7seg`
    SevenSeg,

    // === Literals ===
    /// An identifier (signal name, loop variable, or the `bin` helper).
    Identifier,
    /// A run of decimal digits.
    Int,
    /// A `0x`-prefixed hexadecimal literal.
    HexInt,

    // === Punctuation ===
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `*`
    Star,
    /// `+`
    Plus,

    // === Special ===
    /// A token that failed to lex; an error was reported to the sink.
    Error,
    /// End of the lexed region.
    Eof,
}

/// A token kind paired with its source span.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The kind of this token.
    pub kind: TestToken,
    /// The source span this token covers.
    pub span: Span,
}

/// Looks up a keyword token for the given identifier text.
///
/// Returns `None` if the text is a plain identifier. `bin` is deliberately
/// not a keyword — it is an ordinary identifier that the parser recognizes
/// as a helper call when followed by `(`.
pub fn lookup_keyword(text: &str) -> Option<TestToken> {
    match text {
        "assert" => Some(TestToken::Assert),
        "for" => Some(TestToken::For),
        "in" => Some(TestToken::In),
        "permute" => Some(TestToken::Permute),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(lookup_keyword("assert"), Some(TestToken::Assert));
        assert_eq!(lookup_keyword("for"), Some(TestToken::For));
        assert_eq!(lookup_keyword("in"), Some(TestToken::In));
        assert_eq!(lookup_keyword("permute"), Some(TestToken::Permute));
    }

    #[test]
    fn non_keywords() {
        assert_eq!(lookup_keyword("bin"), None);
        assert_eq!(lookup_keyword("forx"), None);
        assert_eq!(lookup_keyword("Assert"), None);
    }
}
