//! Bracket pairing validation over the raw input text.
//!
//! Runs before any other stage and is independent of all of them. Three
//! bracket kinds (round, curly, square) are tracked on separate stacks;
//! every mismatch in the document is reported in a single pass rather than
//! stopping at the first.

use dogen_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use dogen_source::{SourceFile, Span};

const OPENERS: [u8; 3] = [b'(', b'{', b'['];
const CLOSERS: [u8; 3] = [b')', b'}', b']'];

/// Checks that all brackets in the file pair and nest per kind.
///
/// Comment lines (trimmed form starting with `#`) are skipped entirely,
/// brackets included. Returns `true` if the document is balanced; otherwise
/// one diagnostic per unmatched opener or extra closer has been emitted.
pub fn validate(file: &SourceFile, sink: &DiagnosticSink) -> bool {
    let mut passed = true;
    let mut stacks: [Vec<u32>; 3] = [Vec::new(), Vec::new(), Vec::new()];

    let mut offset = 0u32;
    for line in file.content.split_inclusive('\n') {
        if !line.trim_start().starts_with('#') {
            for (i, b) in line.bytes().enumerate() {
                let pos = offset + i as u32;
                if let Some(kind) = OPENERS.iter().position(|&o| o == b) {
                    stacks[kind].push(pos);
                } else if let Some(kind) = CLOSERS.iter().position(|&c| c == b) {
                    if stacks[kind].pop().is_none() {
                        extra_closer(b as char, pos, sink);
                        passed = false;
                    }
                }
            }
        }
        offset += line.len() as u32;
    }

    for (kind, stack) in stacks.iter().enumerate() {
        for &pos in stack {
            unclosed_opener(OPENERS[kind] as char, pos, sink);
            passed = false;
        }
    }

    passed
}

fn extra_closer(bracket: char, pos: u32, sink: &DiagnosticSink) {
    sink.emit(Diagnostic::error(
        DiagnosticCode::new(Category::Error, 103),
        format!("extra closing bracket '{bracket}'"),
        Span::new(pos, pos + 1),
    ));
}

fn unclosed_opener(bracket: char, pos: u32, sink: &DiagnosticSink) {
    sink.emit(Diagnostic::error(
        DiagnosticCode::new(Category::Error, 103),
        format!("unclosed bracket '{bracket}'"),
        Span::new(pos, pos + 1),
    ));
}
