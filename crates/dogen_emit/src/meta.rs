//! Meta configuration: parsing the `meta` block body and building the
//! simulator preamble.
//!
//! The meta body has its own tiny grammar, separate from the test-body
//! expression language: `;`-separated entries, each a key and a value
//! separated by whitespace or a single `=`. Unknown keys become verbatim
//! preamble commands, in entry order.

use crate::command::Command;
use dogen_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use dogen_source::Span;

/// The resolved meta configuration for one input file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaConfig {
    /// Simulator library name (`vlib` line). Defaults to `work`.
    pub vlib: String,
    /// Compilation timescale. Defaults to `1ns/1ns`.
    pub timescale: String,
    /// Time advanced per assertion. Defaults to `4ns`.
    pub timestep: String,
    /// Simulator log file. Defaults to `output.txt`.
    pub logfile: String,
    /// Output script path. Defaults to `out.do`.
    pub genfile: String,
    /// The Verilog file under test. Required.
    pub vfile: String,
    /// The testbench module to simulate. Required.
    pub vmodule: String,
    /// Unrecognized entries, passed through to the preamble verbatim.
    pub extras: Vec<String>,
}

impl MetaConfig {
    /// Parses a meta block body.
    ///
    /// Entries are split on `;`; within an entry the first `=` is treated as
    /// whitespace, the first word is the key and the rest of the entry is the
    /// value. Missing `vfile` or `vmodule` is fatal. Returns `None` after
    /// emitting diagnostics on failure.
    pub fn parse(body: &str, span: Span, sink: &DiagnosticSink) -> Option<MetaConfig> {
        let mut config = MetaConfig {
            vlib: "work".to_string(),
            timescale: "1ns/1ns".to_string(),
            timestep: "4ns".to_string(),
            logfile: "output.txt".to_string(),
            genfile: "out.do".to_string(),
            vfile: String::new(),
            vmodule: String::new(),
            extras: Vec::new(),
        };

        for entry in body.split(';') {
            let entry = entry.replacen('=', " ", 1);
            let mut words = entry.split_whitespace();
            let Some(key) = words.next() else {
                continue;
            };
            let value = words.collect::<Vec<_>>().join(" ");
            match key {
                "vlib" => config.vlib = value,
                "timescale" => config.timescale = value,
                "timestep" => config.timestep = value,
                "logfile" => config.logfile = value,
                "genfile" => config.genfile = value,
                "vfile" => config.vfile = value,
                "vmodule" => config.vmodule = value,
                _ => config.extras.push(format!("{key} {value}")),
            }
        }

        let mut ok = true;
        for (key, present) in [
            ("vfile", !config.vfile.is_empty()),
            ("vmodule", !config.vmodule.is_empty()),
        ] {
            if !present {
                sink.emit(
                    Diagnostic::error(
                        DiagnosticCode::new(Category::Error, 205),
                        format!("the meta block does not define '{key}'"),
                        span,
                    )
                    .with_help(format!("add a '{key} <value>;' entry to the meta block")),
                );
                ok = false;
            }
        }
        ok.then_some(config)
    }

    /// Builds the simulator preamble: `vlib`, `vlog`, `vsim`, then any
    /// unrecognized entries in source order.
    pub fn preamble(&self) -> Vec<Command> {
        let mut out = vec![
            Command::Vlib(self.vlib.clone()),
            Command::Vlog {
                timescale: self.timescale.clone(),
                vfile: self.vfile.clone(),
            },
            Command::Vsim {
                module: self.vmodule.clone(),
                logfile: self.logfile.clone(),
            },
        ];
        out.extend(self.extras.iter().cloned().map(Command::Raw));
        out
    }
}
