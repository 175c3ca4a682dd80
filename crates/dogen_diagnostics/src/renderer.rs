//! Diagnostic rendering backends for human-readable output.

use crate::diagnostic::Diagnostic;
use dogen_source::SourceFile;

/// Trait for rendering diagnostics into formatted output strings.
///
/// Implementations format diagnostics for different output targets; the CLI
/// chooses between the terminal renderer and plain JSON serialization.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic, file: &SourceFile) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[E103]: extra closing bracket
///   --> tests/adder.test:10:5
///    |
/// 10 | }}
///    |  ^
///    |
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn severity_header(&self, diag: &Diagnostic) -> String {
        if self.color {
            let color_code = match diag.severity {
                crate::Severity::Error => "\x1b[31m",
                crate::Severity::Warning => "\x1b[33m",
            };
            format!(
                "{}{}[{}]\x1b[0m: {}\n",
                color_code, diag.severity, diag.code, diag.message
            )
        } else {
            format!("{}[{}]: {}\n", diag.severity, diag.code, diag.message)
        }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, file: &SourceFile) -> String {
        let mut out = String::new();

        out.push_str(&self.severity_header(diag));

        if !diag.span.is_dummy() {
            let (line, col) = file.line_col(diag.span.start);
            out.push_str(&format!("  --> {}:{line}:{col}\n", file.path.display()));

            let line_num = format!("{line}");
            let padding = " ".repeat(line_num.len());
            let line_content = get_source_line(&file.content, diag.span.start);

            out.push_str(&format!("{padding} |\n"));
            out.push_str(&format!("{line_num} | {line_content}\n"));

            let span_len = (diag.span.end - diag.span.start).max(1) as usize;
            let carets = "^".repeat(span_len.min(line_content.len().max(1)));
            let col_padding = " ".repeat((col as usize).saturating_sub(1));
            out.push_str(&format!("{padding} | {col_padding}{carets}\n"));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

/// Extracts the line of source code containing the given byte offset.
///
/// The offset is clamped to the nearest preceding char boundary, so a span
/// from any earlier stage can never panic the reporter.
fn get_source_line(content: &str, byte_offset: u32) -> &str {
    let mut offset = (byte_offset as usize).min(content.len());
    while !content.is_char_boundary(offset) {
        offset -= 1;
    }
    let start = content[..offset].rfind('\n').map_or(0, |pos| pos + 1);
    let end = content[offset..]
        .find('\n')
        .map_or(content.len(), |pos| offset + pos);
    &content[start..end]
}
