//! `dogen gen` — compile an input file and write the simulator script.

use std::fs;
use std::path::PathBuf;

use crate::pipeline::{compile_file, report_diagnostics};
use crate::{GenArgs, GlobalArgs};

/// Runs the `dogen gen` command.
///
/// The output file is written only after every stage succeeds, so a failed
/// run leaves any previous artifact untouched. Returns exit code 0 on
/// success, 1 if the input has errors.
pub fn run(args: &GenArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let compilation = compile_file(&args.input)?;
    report_diagnostics(&compilation, args.format, global);

    let Some(script) = compilation.script else {
        return Ok(1);
    };

    let out_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&script.genfile));
    fs::write(&out_path, &script.text)
        .map_err(|e| format!("cannot write {}: {e}", out_path.display()))?;

    if !global.quiet {
        eprintln!("   Generated {}", out_path.display());
    }
    if global.verbose {
        eprintln!(
            "   {} command(s) from {}",
            script.text.lines().count(),
            args.input.display()
        );
    }
    Ok(0)
}
