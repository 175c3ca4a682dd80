//! Statement lowering: fully-expanded body items to simulator commands.
//!
//! By the time a body reaches this stage every `for` and `permute` construct
//! has been consumed, so the item list is pure assignments and assertions.
//! Assignments lower to `force` commands; assertions lower to a timed `run`,
//! a tagging `echo`, and one `examine` per sampled bit.

use crate::command::Command;
use crate::meta::MetaConfig;
use dogen_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use dogen_expand::eval::{self, eval_bits, eval_int, EvalError};
use dogen_source::Span;
use dogen_syntax::{Assert, Assign, Expr, Index, Item, Value};

/// Lowers one fully-expanded test block into simulator commands.
///
/// `name` is the block's declared name, threaded into every emitted echo
/// tag. Fail-fast: the first offending statement aborts with `None` after
/// emitting a diagnostic.
pub fn lower_block(
    name: Option<&str>,
    items: &[Item],
    meta: &MetaConfig,
    sink: &DiagnosticSink,
) -> Option<Vec<Command>> {
    let mut out = Vec::new();
    for item in items {
        match item {
            Item::Assign(a) => lower_assign(a, &mut out, sink)?,
            Item::Assert(a) => lower_assert(a, name, meta, &mut out, sink)?,
            Item::For(_) | Item::Permute(_) => {
                unreachable!("constructs are expanded before lowering")
            }
        }
    }
    Some(out)
}

fn lower_assign(a: &Assign, out: &mut Vec<Command>, sink: &DiagnosticSink) -> Option<()> {
    let bits = eval_or_report(&a.value, a.span, sink)?;
    match &a.target.index {
        Index::None => out.push(Command::Force {
            signal: a.target.base.clone(),
            bits,
        }),
        Index::Single(expr) => {
            let i = eval_int_or_report(expr, a.span, sink)?;
            out.push(Command::Force {
                signal: format!("{}[{}]", a.target.base, i),
                bits,
            });
        }
        Index::Range(first, second) => {
            let bits = spread(&bits, first, second, a.span, "assignment", sink)?;
            for (k, bit) in bits {
                out.push(Command::Force {
                    signal: format!("{}[{}]", a.target.base, k),
                    bits: bit.to_string(),
                });
            }
        }
    }
    Some(())
}

fn lower_assert(
    a: &Assert,
    name: Option<&str>,
    meta: &MetaConfig,
    out: &mut Vec<Command>,
    sink: &DiagnosticSink,
) -> Option<()> {
    let expected = eval_or_report(&a.expected, a.span, sink)?;
    if !expected.bytes().all(|b| b == b'0' || b == b'1') {
        sink.emit(Diagnostic::error(
            DiagnosticCode::new(Category::Error, 203),
            format!("the expected value '{expected}' is not a pattern of 0s and 1s"),
            a.span,
        ));
        return None;
    }

    // Trailing space when the block is unnamed, matching the echo format
    // "assert <bits> <name>" exactly.
    let tag = name.unwrap_or("");
    match &a.target.index {
        Index::None | Index::Single(_) => {
            if expected.len() != 1 {
                sink.emit(
                    Diagnostic::error(
                        DiagnosticCode::new(Category::Error, 107),
                        format!(
                            "too many values passed to assert for the single signal '{}'",
                            a.target.base
                        ),
                        a.span,
                    )
                    .with_help("to assert multiple bits at once use a ranged reference instead"),
                );
                return None;
            }
            let signal = match &a.target.index {
                Index::Single(expr) => {
                    let i = eval_int_or_report(expr, a.span, sink)?;
                    format!("{}[{}]", a.target.base, i)
                }
                _ => a.target.base.clone(),
            };
            out.push(Command::Run(meta.timestep.clone()));
            out.push(Command::Echo(format!("assert {expected} {tag}")));
            out.push(Command::Examine(signal));
        }
        Index::Range(first, second) => {
            let bits = spread(&expected, first, second, a.span, "assert", sink)?;
            let full: String = bits.iter().map(|(_, b)| b).collect();
            out.push(Command::Run(meta.timestep.clone()));
            out.push(Command::Echo(format!("assert {full} {tag}")));
            for (k, _) in bits {
                out.push(Command::Examine(format!("{}[{}]", a.target.base, k)));
            }
        }
    }
    Some(())
}

/// Matches a value against an inclusive range: a single character broadcasts
/// to every index, a `magnitude`-length value pairs positionally in range
/// order, anything else is the cardinality error.
fn spread(
    bits: &str,
    first: &Expr,
    second: &Expr,
    span: Span,
    what: &str,
    sink: &DiagnosticSink,
) -> Option<Vec<(i64, char)>> {
    let first = eval_int_or_report(first, span, sink)?;
    let second = eval_int_or_report(second, span, sink)?;
    let step: i64 = if second >= first { 1 } else { -1 };
    let magnitude = (second - first).unsigned_abs() as usize + 1;

    let chars: Vec<char> = bits.chars().collect();
    let spread: Vec<char> = if chars.len() == 1 {
        vec![chars[0]; magnitude]
    } else if chars.len() == magnitude {
        chars
    } else {
        sink.emit(
            Diagnostic::error(
                DiagnosticCode::new(Category::Error, 107),
                format!("wrong number of values passed to the {what}"),
                span,
            )
            .with_note(format!("the target range spans {magnitude} bits"))
            .with_help(format!("provide 1 or {magnitude} values instead")),
        );
        return None;
    };

    let mut k = first;
    Some(
        spread
            .into_iter()
            .map(|c| {
                let pair = (k, c);
                k += step;
                pair
            })
            .collect(),
    )
}

fn eval_or_report(value: &Value, span: Span, sink: &DiagnosticSink) -> Option<String> {
    report_err(eval_bits(value), span, sink)
}

fn eval_int_or_report(expr: &Expr, span: Span, sink: &DiagnosticSink) -> Option<i64> {
    report_err(eval_int(expr), span, sink)
}

fn report_err<T>(
    result: Result<T, EvalError>,
    span: Span,
    sink: &DiagnosticSink,
) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(err) => {
            eval::report(&err, span, sink);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dogen_syntax::parser::parse_test_body;

    fn lower(name: Option<&str>, body: &str) -> Vec<String> {
        let sink = DiagnosticSink::new();
        let items = parse_test_body(body, Span::new(0, body.len() as u32), &sink)
            .expect("body should parse");
        let items = dogen_expand::expand_block(&items, &sink).expect("body should expand");
        lower_block(name, &items, &test_meta(), &sink)
            .expect("body should lower")
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn lower_err(body: &str) -> DiagnosticSink {
        let sink = DiagnosticSink::new();
        let items = parse_test_body(body, Span::new(0, body.len() as u32), &sink).unwrap();
        let items = dogen_expand::expand_block(&items, &sink).unwrap();
        assert!(lower_block(Some("t"), &items, &test_meta(), &sink).is_none());
        sink
    }

    fn test_meta() -> MetaConfig {
        let sink = DiagnosticSink::new();
        MetaConfig::parse("vfile a.v; vmodule m;", Span::new(0, 0), &sink).unwrap()
    }

    #[test]
    fn scalar_force() {
        assert_eq!(lower(None, "a = 1;"), vec!["force {a} 1"]);
    }

    #[test]
    fn indexed_force_evaluates_index() {
        assert_eq!(lower(None, "x[1+2] = 0;"), vec!["force {x[3]} 0"]);
    }

    #[test]
    fn ranged_force_broadcast() {
        assert_eq!(
            lower(None, "x[2:0] = 1;"),
            vec!["force {x[2]} 1", "force {x[1]} 1", "force {x[0]} 1"]
        );
    }

    #[test]
    fn ranged_force_positional() {
        assert_eq!(
            lower(None, "x[1:0] = 10;"),
            vec!["force {x[1]} 1", "force {x[0]} 0"]
        );
    }

    #[test]
    fn ranged_force_from_bin() {
        assert_eq!(
            lower(None, "x[3:0] = bin(5, 4);"),
            vec![
                "force {x[3]} 0",
                "force {x[2]} 1",
                "force {x[1]} 0",
                "force {x[0]} 1"
            ]
        );
    }

    #[test]
    fn ranged_force_ascending_direction() {
        assert_eq!(
            lower(None, "x[0:1] = 10;"),
            vec!["force {x[0]} 1", "force {x[1]} 0"]
        );
    }

    #[test]
    fn ranged_force_cardinality_error() {
        let sink = lower_err("x[3:0] = 10;");
        let diags = sink.take_all();
        assert_eq!(format!("{}", diags[0].code), "E107");
        assert_eq!(diags[0].help, vec!["provide 1 or 4 values instead"]);
    }

    #[test]
    fn scalar_assert() {
        assert_eq!(
            lower(Some("t1"), "assert a == 1;"),
            vec!["run 4ns", "echo \"assert 1 t1\"", "examine {a}"]
        );
    }

    #[test]
    fn unnamed_assert_keeps_trailing_space() {
        assert_eq!(
            lower(None, "assert a == 0;"),
            vec!["run 4ns", "echo \"assert 0 \"", "examine {a}"]
        );
    }

    #[test]
    fn indexed_assert() {
        assert_eq!(
            lower(Some("t"), "assert y[2*2] == 1;"),
            vec!["run 4ns", "echo \"assert 1 t\"", "examine {y[4]}"]
        );
    }

    #[test]
    fn ranged_assert_broadcast_repeats_expected() {
        assert_eq!(
            lower(Some("t"), "assert q[2:0] == 1;"),
            vec![
                "run 4ns",
                "echo \"assert 111 t\"",
                "examine {q[2]}",
                "examine {q[1]}",
                "examine {q[0]}"
            ]
        );
    }

    #[test]
    fn ranged_assert_positional() {
        assert_eq!(
            lower(Some("t"), "assert q[1:0] == 10;"),
            vec![
                "run 4ns",
                "echo \"assert 10 t\"",
                "examine {q[1]}",
                "examine {q[0]}"
            ]
        );
    }

    #[test]
    fn scalar_assert_rejects_multiple_bits() {
        let sink = lower_err("assert a == 11;");
        let diags = sink.take_all();
        assert_eq!(format!("{}", diags[0].code), "E107");
        assert!(diags[0].help[0].contains("ranged reference"));
    }

    #[test]
    fn assert_rejects_non_binary_expected() {
        let sink = lower_err("assert a == 2;");
        let diags = sink.take_all();
        assert_eq!(format!("{}", diags[0].code), "E203");
    }

    #[test]
    fn wildcard_outside_permute_is_fatal() {
        let sink = lower_err("a = *;");
        assert!(sink.has_errors());
    }

    #[test]
    fn seven_seg_assertion() {
        assert_eq!(
            lower(Some("seg"), "assert d[6:0] == 7seg(8);"),
            vec![
                "run 4ns",
                "echo \"assert 0000000 seg\"",
                "examine {d[6]}",
                "examine {d[5]}",
                "examine {d[4]}",
                "examine {d[3]}",
                "examine {d[2]}",
                "examine {d[1]}",
                "examine {d[0]}"
            ]
        );
    }

    #[test]
    fn expanded_permute_lowers_per_variant() {
        let commands = lower(Some("p"), "permute { y = *; assert z == 0; }");
        assert_eq!(
            commands,
            vec![
                "force {y} 0",
                "run 4ns",
                "echo \"assert 0 p\"",
                "examine {z}",
                "force {y} 1",
                "run 4ns",
                "echo \"assert 0 p\"",
                "examine {z}"
            ]
        );
    }
}
