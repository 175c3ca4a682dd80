//! AST node types for parsed test blocks.
//!
//! The block extractor and body parser build one [`Document`] per input file:
//! the raw meta body (parsed later by the meta generator, which has its own
//! key/value grammar) plus a list of [`TestBlock`]s whose bodies are small
//! [`Item`] trees. Expansion stages rewrite these trees by replacing nodes,
//! never by re-scanning text.

use dogen_source::Span;

/// A parsed input file: the meta block body plus all test blocks.
#[derive(Clone, Debug)]
pub struct Document {
    /// The raw text of the (first) meta block body.
    pub meta_body: String,
    /// The span of the meta block body within the input file.
    pub meta_span: Span,
    /// All top-level test blocks, in document order.
    pub tests: Vec<TestBlock>,
}

/// A single `test [name] { ... }` block.
#[derive(Clone, Debug)]
pub struct TestBlock {
    /// The optional identifier following the `test` keyword.
    pub name: Option<String>,
    /// The parsed body items. Expansion stages rewrite this list in place.
    pub items: Vec<Item>,
    /// The span of the whole block, keyword through closing brace.
    pub span: Span,
}

/// One body item: a statement or an expandable construct.
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    /// `target = value;`
    Assign(Assign),
    /// `assert target == expected;`
    Assert(Assert),
    /// `for var in [lo:hi] { ... }` — consumed by the iteration expander.
    For(ForBlock),
    /// `permute { ... }` — consumed by the enumeration expander.
    Permute(PermuteBlock),
}

impl Item {
    /// Returns the span of this item.
    pub fn span(&self) -> Span {
        match self {
            Item::Assign(a) => a.span,
            Item::Assert(a) => a.span,
            Item::For(f) => f.span,
            Item::Permute(p) => p.span,
        }
    }
}

/// An assignment statement driving a signal to a value.
#[derive(Clone, Debug, PartialEq)]
pub struct Assign {
    /// The signal being driven.
    pub target: VarRef,
    /// The driven value (bits, helper call, or wildcard).
    pub value: Value,
    /// The span of the whole statement.
    pub span: Span,
}

/// An assertion statement sampling a signal against an expected value.
#[derive(Clone, Debug, PartialEq)]
pub struct Assert {
    /// The signal being sampled.
    pub target: VarRef,
    /// The expected value (bits or helper call; wildcards are not valid here).
    pub expected: Value,
    /// The span of the whole statement.
    pub span: Span,
}

/// A bounded iteration construct.
#[derive(Clone, Debug, PartialEq)]
pub struct ForBlock {
    /// The loop variable identifier.
    pub var: String,
    /// The inclusive lower bound expression (first endpoint, either direction).
    pub lo: Expr,
    /// The inclusive upper bound expression (second endpoint).
    pub hi: Expr,
    /// The loop body.
    pub body: Vec<Item>,
    /// The span of the whole construct.
    pub span: Span,
}

/// An exhaustive enumeration construct over wildcard assignments.
#[derive(Clone, Debug, PartialEq)]
pub struct PermuteBlock {
    /// The permute body.
    pub body: Vec<Item>,
    /// The span of the whole construct.
    pub span: Span,
}

/// A reference to a signal, optionally indexed.
#[derive(Clone, Debug, PartialEq)]
pub struct VarRef {
    /// The base signal identifier.
    pub base: String,
    /// The index form attached to the base.
    pub index: Index,
    /// The span of the reference.
    pub span: Span,
}

/// The index form of a [`VarRef`].
#[derive(Clone, Debug, PartialEq)]
pub enum Index {
    /// A scalar reference with no index.
    None,
    /// A single-element index, `name[i]`.
    Single(Expr),
    /// An inclusive, direction-sensitive range, `name[hi:lo]`.
    Range(Expr, Expr),
}

/// The right-hand side of an assignment or assertion.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A raw digit run, kept verbatim so leading zeros preserve width.
    Bits(String),
    /// A helper call (`bin(...)` or `7seg(...)`) producing a bit pattern.
    Call(Expr),
    /// `*` — enumerate both values; valid only inside `permute`.
    Wildcard,
}

/// A restricted integer-context expression.
///
/// This is deliberately not a general expression language: decimal and hex
/// literals, loop variables, homogeneous `+` or `*` chains, and the two
/// helper calls are all there is.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// An integer literal (decimal or `0x` hex in source).
    Int(i64),
    /// A loop variable; resolved to `Int` by the iteration expander.
    Var(String),
    /// A `+` chain, folded left-to-right.
    Sum(Vec<Expr>),
    /// A `*` chain, folded left-to-right.
    Product(Vec<Expr>),
    /// `bin(value, width)`.
    Bin(Box<Expr>, Box<Expr>),
    /// `7seg(value)`.
    SevenSeg(Box<Expr>),
}

impl Expr {
    /// Recursively replaces every `Var(name)` with `Int(value)`.
    ///
    /// This is the iteration expander's substitution primitive: because it
    /// walks the tree rather than the text, identifiers merely containing
    /// the loop variable name are never corrupted.
    pub fn substitute(&self, name: &str, value: i64) -> Expr {
        match self {
            Expr::Int(v) => Expr::Int(*v),
            Expr::Var(n) => {
                if n == name {
                    Expr::Int(value)
                } else {
                    Expr::Var(n.clone())
                }
            }
            Expr::Sum(terms) => {
                Expr::Sum(terms.iter().map(|t| t.substitute(name, value)).collect())
            }
            Expr::Product(terms) => {
                Expr::Product(terms.iter().map(|t| t.substitute(name, value)).collect())
            }
            Expr::Bin(v, w) => Expr::Bin(
                Box::new(v.substitute(name, value)),
                Box::new(w.substitute(name, value)),
            ),
            Expr::SevenSeg(v) => Expr::SevenSeg(Box::new(v.substitute(name, value))),
        }
    }
}
