//! `dogen verify` — check a simulator transcript against its assert echoes.
//!
//! A generated script tags every assertion with an `echo "assert <bits>
//! <name>"` followed by one `examine` per sampled bit. In the simulator
//! transcript the echo appears as `# assert <bits> <name>` and each examine
//! prints the sampled std_logic value as `# St0` or `# St1`, so bit `k` of
//! the expected pattern must match transcript line `k + 1` after the echo.

use std::fs;

use crate::{GlobalArgs, VerifyArgs};

/// One failed assertion bit in a transcript.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    /// 1-based transcript line of the `# assert` echo.
    pub line: usize,
    /// The examine output line the pattern called for.
    pub expected: String,
    /// The line actually found, or `None` past the end of the transcript.
    pub actual: Option<String>,
}

/// The outcome of verifying one transcript.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Number of assert echoes found.
    pub total: usize,
    /// All mismatches, in transcript order.
    pub failures: Vec<Failure>,
}

impl VerifyReport {
    /// Returns `true` when every assertion matched its examine output.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Matches every assert echo in the transcript against the examine output
/// lines that follow it.
pub fn verify_transcript(content: &str) -> VerifyReport {
    let lines: Vec<&str> = content.lines().collect();
    let mut report = VerifyReport::default();

    for (i, line) in lines.iter().enumerate() {
        let Some(rest) = line.strip_prefix("# assert ") else {
            continue;
        };
        // The name tag after the pattern is informational only.
        let Some(bits) = rest.split_whitespace().next() else {
            continue;
        };
        report.total += 1;
        for (k, bit) in bits.chars().enumerate() {
            let expected = format!("# St{bit}");
            let actual = lines.get(i + 1 + k).copied();
            if actual != Some(expected.as_str()) {
                report.failures.push(Failure {
                    line: i + 1,
                    expected,
                    actual: actual.map(str::to_string),
                });
            }
        }
    }
    report
}

/// Runs the `dogen verify` command.
///
/// Returns exit code 0 when every assertion in the transcript passed, 1
/// otherwise.
pub fn run(args: &VerifyArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(&args.transcript)
        .map_err(|e| format!("cannot read {}: {e}", args.transcript.display()))?;
    let report = verify_transcript(&content);

    for failure in &report.failures {
        let found = match &failure.actual {
            Some(actual) => format!("'{actual}'"),
            None => "end of transcript".to_string(),
        };
        eprintln!(
            "assertion on line {} failed: expected '{}', found {}",
            failure.line, failure.expected, found
        );
    }
    if !global.quiet {
        if report.passed() {
            eprintln!("   All {} assertion(s) passed", report.total);
        } else {
            eprintln!(
                "   {} mismatch(es) across {} assertion(s)",
                report.failures.len(),
                report.total
            );
        }
    }
    Ok(if report.passed() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passing_scalar_assertion() {
        let report = verify_transcript("# assert 1 t1\n# St1\n");
        assert_eq!(report.total, 1);
        assert!(report.passed());
    }

    #[test]
    fn failing_scalar_assertion() {
        let report = verify_transcript("# assert 1 t1\n# St0\n");
        assert_eq!(report.total, 1);
        assert_eq!(
            report.failures,
            vec![Failure {
                line: 1,
                expected: "# St1".to_string(),
                actual: Some("# St0".to_string()),
            }]
        );
    }

    #[test]
    fn ranged_assertion_matches_bit_per_line() {
        let report = verify_transcript("# assert 10 t\n# St1\n# St0\n");
        assert_eq!(report.total, 1);
        assert!(report.passed());
    }

    #[test]
    fn ranged_assertion_reports_each_wrong_bit() {
        let report = verify_transcript("# assert 10 t\n# St0\n# St1\n");
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures.iter().all(|f| f.line == 1));
    }

    #[test]
    fn truncated_transcript_fails() {
        let report = verify_transcript("# assert 11 t\n# St1\n");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].actual, None);
    }

    #[test]
    fn unnamed_assertion_has_no_name_token() {
        // The generator leaves a trailing space when the test is unnamed.
        let report = verify_transcript("# assert 0 \n# St0\n");
        assert_eq!(report.total, 1);
        assert!(report.passed());
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        let report = verify_transcript(
            "# vsim adder_tb -l output.txt\n\
             # Loading work.adder_tb\n\
             # assert 1 t1\n\
             # St1\n\
             run 4ns\n",
        );
        assert_eq!(report.total, 1);
        assert!(report.passed());
    }

    #[test]
    fn multiple_assertions_counted() {
        let report = verify_transcript(
            "# assert 1 a\n# St1\n# assert 0 b\n# St1\n",
        );
        assert_eq!(report.total, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].line, 3);
    }

    #[test]
    fn empty_transcript_passes_vacuously() {
        let report = verify_transcript("");
        assert_eq!(report.total, 0);
        assert!(report.passed());
    }
}
