//! Syntax analysis for the test-description language.
//!
//! This crate owns the front half of the pipeline: the [`brackets`] validator
//! (aggregated bracket-pairing diagnostics over the raw text), the [`blocks`]
//! extractor (balanced-brace `meta`/`test` block location over comment-blanked
//! text), and the [`lexer`]/[`parser`] pair that turns each test block body
//! into a small [`ast::Item`] tree. Everything downstream rewrites that tree;
//! no later stage ever re-scans text.

#![warn(missing_docs)]

pub mod ast;
pub mod blocks;
pub mod brackets;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{Assert, Assign, Document, Expr, ForBlock, Index, Item, PermuteBlock, TestBlock,
    Value, VarRef};

use dogen_diagnostics::DiagnosticSink;
use dogen_source::SourceFile;

/// Parses the input file into a [`Document`].
///
/// Runs comment blanking, block extraction, and body parsing. Bracket
/// validation is a separate, earlier stage (see [`brackets::validate`])
/// because its diagnostics are aggregated rather than fail-fast. Returns
/// `None` after emitting diagnostics on any fatal syntax or semantic error.
pub fn parse_document(file: &SourceFile, sink: &DiagnosticSink) -> Option<Document> {
    let blanked = file.blanked();
    let raw = blocks::extract(&blanked, sink)?;

    let meta_body = blanked[raw.meta.body.start as usize..raw.meta.body.end as usize].to_string();
    let mut tests = Vec::with_capacity(raw.tests.len());
    for block in &raw.tests {
        let items = parser::parse_test_body(&blanked, block.body, sink)?;
        tests.push(TestBlock {
            name: block.name.clone(),
            items,
            span: block.span,
        });
    }

    Some(Document {
        meta_body,
        meta_span: raw.meta.body,
        tests,
    })
}
