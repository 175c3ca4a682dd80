//! Balanced-brace block extraction over the comment-blanked input.
//!
//! Locates the single `meta` block and every top-level `test` block by
//! finding the keyword followed by `{` and scanning to the brace that
//! balances it. Extraction always consumes up to the balancing brace, so
//! overlapping matches are impossible; a `test` keyword appearing inside an
//! extracted test body is the "nested test blocks" semantic error.

use dogen_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use dogen_source::Span;

/// A block located in the blanked text, body not yet parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct RawBlock {
    /// The identifier following the keyword, if any (`test adder { ... }`).
    pub name: Option<String>,
    /// The span of the body text, between (not including) the braces.
    pub body: Span,
    /// The span of the whole block, keyword through closing brace.
    pub span: Span,
}

/// The raw blocks of one input file.
#[derive(Clone, Debug)]
pub struct RawDocument {
    /// The honored (first) meta block.
    pub meta: RawBlock,
    /// All top-level test blocks, in document order.
    pub tests: Vec<RawBlock>,
}

/// Extracts the meta block and all test blocks from the blanked text.
///
/// Fatal conditions (missing meta, unterminated block, nested test blocks)
/// are reported to the sink and yield `None`. Extra meta blocks are
/// warnings; only the first is honored.
pub fn extract(blanked: &str, sink: &DiagnosticSink) -> Option<RawDocument> {
    let bytes = blanked.as_bytes();
    let mut meta: Option<RawBlock> = None;
    let mut tests = Vec::new();

    let mut pos = 0usize;
    while pos < bytes.len() {
        if !is_word_start(bytes[pos]) {
            pos += 1;
            continue;
        }
        let word_start = pos;
        while pos < bytes.len() && is_word(bytes[pos]) {
            pos += 1;
        }
        let word = &blanked[word_start..pos];

        match word {
            "meta" => {
                if let Some((body, block_end)) = block_after(bytes, pos, word_start, sink)? {
                    let block = RawBlock {
                        name: None,
                        body,
                        span: Span::new(word_start as u32, block_end as u32),
                    };
                    if meta.is_some() {
                        sink.emit(
                            Diagnostic::warning(
                                DiagnosticCode::new(Category::Warning, 301),
                                "multiple meta blocks; only the first is honored",
                                block.span,
                            )
                            .with_help("merge these keys into the first meta block"),
                        );
                    } else {
                        meta = Some(block);
                    }
                    pos = block_end;
                }
            }
            "test" => {
                let (name, after_name) = optional_name(blanked, pos);
                if let Some((body, block_end)) = block_after(bytes, after_name, word_start, sink)?
                {
                    check_no_nested_test(blanked, body, sink)?;
                    tests.push(RawBlock {
                        name,
                        body,
                        span: Span::new(word_start as u32, block_end as u32),
                    });
                    pos = block_end;
                }
            }
            _ => {}
        }
    }

    match meta {
        Some(meta) => Some(RawDocument { meta, tests }),
        None => {
            sink.emit(Diagnostic::error(
                DiagnosticCode::new(Category::Error, 105),
                "no meta block found",
                Span::DUMMY,
            ));
            None
        }
    }
}

/// Skips whitespace after a keyword and, if a `{` follows, returns the body
/// span and the offset just past the balancing `}`.
///
/// Returns `Ok(None)` (keyword not actually introducing a block) when no `{`
/// follows, and a fatal error when the block is never terminated.
#[allow(clippy::type_complexity)]
fn block_after(
    bytes: &[u8],
    mut pos: usize,
    keyword_start: usize,
    sink: &DiagnosticSink,
) -> Option<Option<(Span, usize)>> {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    if pos >= bytes.len() || bytes[pos] != b'{' {
        return Some(None);
    }
    let body_start = pos + 1;

    // Depth starts at 1 just past the opener; the body ends where it first
    // returns to 0.
    let mut depth = 1u32;
    let mut i = body_start;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let body = Span::new(body_start as u32, i as u32);
                    return Some(Some((body, i + 1)));
                }
            }
            _ => {}
        }
        i += 1;
    }

    sink.emit(Diagnostic::error(
        DiagnosticCode::new(Category::Error, 106),
        "unterminated block",
        Span::new(keyword_start as u32, body_start as u32),
    ));
    None
}

/// Reads the optional identifier between `test` and `{`.
fn optional_name(blanked: &str, mut pos: usize) -> (Option<String>, usize) {
    let bytes = blanked.as_bytes();
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    if pos < bytes.len() && is_word_start(bytes[pos]) {
        let start = pos;
        while pos < bytes.len() && is_word(bytes[pos]) {
            pos += 1;
        }
        (Some(blanked[start..pos].to_string()), pos)
    } else {
        (None, pos)
    }
}

/// Rejects a `test [name] {` pattern inside an extracted test body.
fn check_no_nested_test(blanked: &str, body: Span, sink: &DiagnosticSink) -> Option<()> {
    let bytes = blanked.as_bytes();
    let mut pos = body.start as usize;
    let end = body.end as usize;
    while pos < end {
        if !is_word_start(bytes[pos]) {
            pos += 1;
            continue;
        }
        let word_start = pos;
        while pos < end && is_word(bytes[pos]) {
            pos += 1;
        }
        if &blanked[word_start..pos] == "test" {
            let (_, after_name) = optional_name(blanked, pos);
            let mut p = after_name;
            while p < end && bytes[p].is_ascii_whitespace() {
                p += 1;
            }
            if p < end && bytes[p] == b'{' {
                sink.emit(Diagnostic::error(
                    DiagnosticCode::new(Category::Error, 201),
                    "nested test blocks are not valid",
                    Span::new(word_start as u32, p as u32 + 1),
                ));
                return None;
            }
        }
    }
    Some(())
}

fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_ok(text: &str) -> RawDocument {
        let sink = DiagnosticSink::new();
        let doc = extract(text, &sink).expect("extraction should succeed");
        assert!(!sink.has_errors());
        doc
    }

    #[test]
    fn meta_and_one_test() {
        let text = "meta { vfile x.v; } test t1 { a = 1; }";
        let doc = extract_ok(text);
        assert_eq!(&text[doc.meta.body.start as usize..doc.meta.body.end as usize],
            " vfile x.v; ");
        assert_eq!(doc.tests.len(), 1);
        assert_eq!(doc.tests[0].name.as_deref(), Some("t1"));
    }

    #[test]
    fn unnamed_test() {
        let doc = extract_ok("meta { } test { a = 1; }");
        assert_eq!(doc.tests[0].name, None);
    }

    #[test]
    fn block_spans_lines() {
        let doc = extract_ok("meta\n{\n}\ntest\nt\n{\n}\n");
        assert_eq!(doc.tests[0].name.as_deref(), Some("t"));
    }

    #[test]
    fn nested_braces_in_body() {
        let text = "meta { } test t { for i in [0:1] { a = 1; } }";
        let doc = extract_ok(text);
        let body = &text[doc.tests[0].body.start as usize..doc.tests[0].body.end as usize];
        assert!(body.contains("for i in [0:1] { a = 1; }"));
    }

    #[test]
    fn missing_meta_is_fatal() {
        let sink = DiagnosticSink::new();
        assert!(extract("test t { }", &sink).is_none());
        assert!(sink.has_errors());
    }

    #[test]
    fn second_meta_is_warning() {
        let sink = DiagnosticSink::new();
        let doc = extract("meta { a 1; } meta { b 2; } test t { }", &sink).unwrap();
        assert!(!sink.has_errors());
        assert_eq!(sink.diagnostics().len(), 1);
        // The first meta is the honored one.
        assert_eq!(doc.meta.body.start, 6);
    }

    #[test]
    fn nested_test_is_fatal() {
        let sink = DiagnosticSink::new();
        assert!(extract("meta { } test a { test b { } }", &sink).is_none());
        let diags = sink.diagnostics();
        assert!(diags[0].message.contains("nested test"));
    }

    #[test]
    fn unterminated_block_is_fatal() {
        let sink = DiagnosticSink::new();
        assert!(extract("meta { ", &sink).is_none());
        assert!(sink.has_errors());
    }

    #[test]
    fn test_keyword_without_brace_is_ignored() {
        let doc = extract_ok("meta { } test t { } testing = 1;");
        assert_eq!(doc.tests.len(), 1);
    }
}
