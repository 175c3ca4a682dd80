//! Macro expansion for test block bodies.
//!
//! Consumes the [`Item`](dogen_syntax::Item) trees built by `dogen_syntax`
//! and rewrites them until only plain assignments and assertions remain:
//! the [`iterate`] module unrolls `for` constructs, the [`permute`] module
//! performs exhaustive wildcard enumeration, and the [`eval`] module is the
//! restricted expression evaluator both of them (and the statement lowerer)
//! lean on.

#![warn(missing_docs)]

pub mod eval;
pub mod iterate;
pub mod permute;

pub use eval::EvalError;

use dogen_diagnostics::DiagnosticSink;
use dogen_syntax::Item;

/// Fully expands one test block body.
///
/// Runs iteration expansion then enumeration expansion; the result contains
/// only `Assign` and `Assert` items. Returns `None` after emitting a
/// diagnostic on any fatal error.
pub fn expand_block(items: &[Item], sink: &DiagnosticSink) -> Option<Vec<Item>> {
    let items = iterate::expand(items, sink)?;
    permute::expand(&items, sink)
}
