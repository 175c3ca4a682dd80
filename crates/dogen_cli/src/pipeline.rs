//! The generation pipeline shared by `dogen gen` and `dogen check`.
//!
//! Runs the whole compilation in order: bracket validation (aggregated),
//! document parsing, per-block expansion, meta configuration, statement
//! lowering, and script rendering. Any fatal error stops the run with the
//! diagnostics left in the sink; the output artifact is never produced on a
//! failed run.

use std::error::Error;
use std::fs;
use std::path::Path;

use dogen_diagnostics::{DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer};
use dogen_emit::{lower_block, render_script, MetaConfig};
use dogen_expand::expand_block;
use dogen_source::SourceFile;
use dogen_syntax::{brackets, parse_document};

use crate::{GlobalArgs, ReportFormat};

/// The result of one compilation run: the loaded source, everything the
/// stages reported, and the rendered script if all stages succeeded.
pub struct Compilation {
    /// The loaded input file.
    pub file: SourceFile,
    /// All diagnostics emitted during the run.
    pub sink: DiagnosticSink,
    /// The generated script, present only when no stage failed.
    pub script: Option<GeneratedScript>,
}

/// A successfully generated simulator script.
pub struct GeneratedScript {
    /// The output path declared by the meta `genfile` key.
    pub genfile: String,
    /// The rendered script text.
    pub text: String,
}

/// Loads and compiles one input file.
///
/// I/O failures reading the input are hard errors; language-level problems
/// are reported through the returned sink instead.
pub fn compile_file(path: &Path) -> Result<Compilation, Box<dyn Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let file = SourceFile::new(path, content);
    let sink = DiagnosticSink::new();
    let script = run_stages(&file, &sink);
    Ok(Compilation { file, sink, script })
}

fn run_stages(file: &SourceFile, sink: &DiagnosticSink) -> Option<GeneratedScript> {
    if !brackets::validate(file, sink) {
        return None;
    }
    let doc = parse_document(file, sink)?;
    let meta = MetaConfig::parse(&doc.meta_body, doc.meta_span, sink)?;

    let mut commands = meta.preamble();
    for test in &doc.tests {
        let items = expand_block(&test.items, sink)?;
        commands.extend(lower_block(test.name.as_deref(), &items, &meta, sink)?);
    }

    Some(GeneratedScript {
        genfile: meta.genfile.clone(),
        text: render_script(&commands),
    })
}

/// Renders all accumulated diagnostics in the requested format and, for the
/// text format, a result summary.
pub fn report_diagnostics(
    compilation: &Compilation,
    format: ReportFormat,
    global: &GlobalArgs,
) {
    let diagnostics = compilation.sink.diagnostics();
    match format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in &diagnostics {
                eprintln!("{}", renderer.render(diag, &compilation.file));
            }
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(&diagnostics).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }

    if !global.quiet && format == ReportFormat::Text {
        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let warnings = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        if errors + warnings > 0 {
            eprintln!("   Result: {errors} error(s), {warnings} warning(s)");
        }
    }
}
