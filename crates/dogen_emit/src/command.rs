//! The simulator command vocabulary emitted into `.do` scripts.

use std::fmt;

/// One simulator driver command.
///
/// The `Display` impl produces the exact line written into the output
/// script, so everything upstream works with typed commands and the
/// emitter's only job is joining them with newlines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `vlib <name>` — library setup.
    Vlib(String),
    /// `vlog -timescale <ts> <file>` — compile the design under test.
    Vlog {
        /// The simulation timescale, e.g. `1ns/1ns`.
        timescale: String,
        /// The Verilog file to compile.
        vfile: String,
    },
    /// `vsim <module> -l <log>` — start the simulation.
    Vsim {
        /// The testbench module to simulate.
        module: String,
        /// The simulator log file.
        logfile: String,
    },
    /// A user-supplied meta command passed through verbatim.
    Raw(String),
    /// `force {<ref>} <bits>` — drive a signal.
    Force {
        /// The signal reference, possibly indexed.
        signal: String,
        /// The driven bit pattern.
        bits: String,
    },
    /// `run <step>` — advance simulated time.
    Run(String),
    /// `echo "<text>"` — tag the log ahead of an examine.
    Echo(String),
    /// `examine {<ref>}` — sample and print a signal.
    Examine(String),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Vlib(name) => write!(f, "vlib {name}"),
            Command::Vlog { timescale, vfile } => {
                write!(f, "vlog -timescale {timescale} {vfile}")
            }
            Command::Vsim { module, logfile } => write!(f, "vsim {module} -l {logfile}"),
            Command::Raw(line) => write!(f, "{line}"),
            Command::Force { signal, bits } => write!(f, "force {{{signal}}} {bits}"),
            Command::Run(step) => write!(f, "run {step}"),
            Command::Echo(text) => write!(f, "echo \"{text}\""),
            Command::Examine(signal) => write!(f, "examine {{{signal}}}"),
        }
    }
}
