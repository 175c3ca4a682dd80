//! `dogen check` — validate an input file without writing the script.

use crate::pipeline::{compile_file, report_diagnostics};
use crate::{CheckArgs, GlobalArgs};

/// Runs the `dogen check` command.
///
/// Performs the full generation pipeline but discards the rendered script.
/// Returns exit code 0 if the input is valid, 1 otherwise.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let compilation = compile_file(&args.input)?;
    report_diagnostics(&compilation, args.format, global);

    if compilation.script.is_some() {
        if !global.quiet {
            eprintln!("   OK {}", args.input.display());
        }
        Ok(0)
    } else {
        Ok(1)
    }
}
