//! Dogen CLI — the command-line interface for the simulator script generator.
//!
//! Provides `dogen gen` for compiling a test description into a simulator
//! `.do` script, `dogen check` for validating a description without writing
//! anything, and `dogen verify` for checking a simulator transcript against
//! the assertions a generated script ran.

#![warn(missing_docs)]

mod check;
mod gen;
mod pipeline;
mod verify;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Dogen — a simulator driver script generator for hardware test descriptions.
#[derive(Parser, Debug)]
#[command(name = "dogen", version, about = "Simulator script generator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a test description into a simulator script.
    Gen(GenArgs),
    /// Validate a test description without writing the script.
    Check(CheckArgs),
    /// Check a simulator transcript against its assert echoes.
    Verify(VerifyArgs),
}

/// Arguments for the `dogen gen` subcommand.
#[derive(Parser, Debug)]
pub struct GenArgs {
    /// The test description file to compile.
    pub input: PathBuf,

    /// Output path, overriding the meta `genfile` key.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `dogen check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// The test description file to validate.
    pub input: PathBuf,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `dogen verify` subcommand.
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// The simulator transcript file to verify.
    pub transcript: PathBuf,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => atty_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
    };

    let result = match cli.command {
        Command::Gen(ref args) => gen::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
        Command::Verify(ref args) => verify::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    }
}

/// Rough terminal detection — checks if stdout is a terminal.
fn atty_is_terminal() -> bool {
    // Use a simple heuristic: check the TERM env var.
    // In a real build we'd use the `is-terminal` crate, but this is
    // sufficient for now.
    std::env::var("TERM").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_gen_default() {
        let cli = Cli::parse_from(["dogen", "gen", "adder.test"]);
        match cli.command {
            Command::Gen(ref args) => {
                assert_eq!(args.input, PathBuf::from("adder.test"));
                assert!(args.output.is_none());
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Gen command"),
        }
    }

    #[test]
    fn parse_gen_with_output() {
        let cli = Cli::parse_from(["dogen", "gen", "adder.test", "--output", "adder.do"]);
        match cli.command {
            Command::Gen(ref args) => {
                assert_eq!(args.output, Some(PathBuf::from("adder.do")));
            }
            _ => panic!("expected Gen command"),
        }
    }

    #[test]
    fn parse_gen_json_format() {
        let cli = Cli::parse_from(["dogen", "gen", "adder.test", "--format", "json"]);
        match cli.command {
            Command::Gen(ref args) => {
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Gen command"),
        }
    }

    #[test]
    fn parse_check_default() {
        let cli = Cli::parse_from(["dogen", "check", "adder.test"]);
        match cli.command {
            Command::Check(ref args) => {
                assert_eq!(args.input, PathBuf::from("adder.test"));
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_verify() {
        let cli = Cli::parse_from(["dogen", "verify", "transcript.txt"]);
        match cli.command {
            Command::Verify(ref args) => {
                assert_eq!(args.transcript, PathBuf::from("transcript.txt"));
            }
            _ => panic!("expected Verify command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["dogen", "--quiet", "--color", "never", "check", "t.test"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_verbose_flag() {
        let cli = Cli::parse_from(["dogen", "--verbose", "gen", "t.test"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn parse_color_always() {
        let cli = Cli::parse_from(["dogen", "--color", "always", "check", "t.test"]);
        assert_eq!(cli.color, ColorChoice::Always);
    }

    #[test]
    fn parse_short_output_flag() {
        let cli = Cli::parse_from(["dogen", "gen", "t.test", "-o", "x.do"]);
        match cli.command {
            Command::Gen(ref args) => {
                assert_eq!(args.output, Some(PathBuf::from("x.do")));
            }
            _ => panic!("expected Gen command"),
        }
    }
}
