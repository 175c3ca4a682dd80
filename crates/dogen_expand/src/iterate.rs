//! Iteration expansion: unrolling `for` constructs.
//!
//! A `For` node is replaced by one substituted copy of its body per value in
//! the inclusive range, in range order (ascending or descending by the sign
//! of `hi - lo`). Substitution is structural: every `Expr::Var` naming the
//! loop variable becomes an `Expr::Int`, so identifiers that merely contain
//! the loop variable's name are never touched. Nested `for` constructs are
//! expanded by recursing into the substituted copies, which strictly shrinks
//! the set of remaining `For` nodes.

use crate::eval::{self, eval_int};
use dogen_diagnostics::DiagnosticSink;
use dogen_syntax::{Assert, Assign, ForBlock, Index, Item, PermuteBlock, Value, VarRef};

/// Expands every `for` construct in `items`, recursively.
///
/// `Permute` nodes are preserved, but `for` constructs inside their bodies
/// are expanded here; enumeration expansion runs afterwards on the result.
pub fn expand(items: &[Item], sink: &DiagnosticSink) -> Option<Vec<Item>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Item::Assign(_) | Item::Assert(_) => out.push(item.clone()),
            Item::Permute(p) => out.push(Item::Permute(PermuteBlock {
                body: expand(&p.body, sink)?,
                span: p.span,
            })),
            Item::For(f) => out.extend(expand_one(f, sink)?),
        }
    }
    Some(out)
}

/// Unrolls a single `for` construct (and, recursively, anything it contains).
fn expand_one(f: &ForBlock, sink: &DiagnosticSink) -> Option<Vec<Item>> {
    let lo = match eval_int(&f.lo) {
        Ok(v) => v,
        Err(err) => {
            eval::report(&err, f.span, sink);
            return None;
        }
    };
    let hi = match eval_int(&f.hi) {
        Ok(v) => v,
        Err(err) => {
            eval::report(&err, f.span, sink);
            return None;
        }
    };

    let step: i64 = if hi >= lo { 1 } else { -1 };
    let count = (hi - lo).unsigned_abs() + 1;

    let mut out = Vec::new();
    let mut j = lo;
    for _ in 0..count {
        let substituted = substitute_items(&f.body, &f.var, j);
        out.extend(expand(&substituted, sink)?);
        j += step;
    }
    Some(out)
}

/// Deep-substitutes the loop variable throughout a body copy.
fn substitute_items(items: &[Item], var: &str, value: i64) -> Vec<Item> {
    items
        .iter()
        .map(|item| match item {
            Item::Assign(a) => Item::Assign(Assign {
                target: substitute_varref(&a.target, var, value),
                value: substitute_value(&a.value, var, value),
                span: a.span,
            }),
            Item::Assert(a) => Item::Assert(Assert {
                target: substitute_varref(&a.target, var, value),
                expected: substitute_value(&a.expected, var, value),
                span: a.span,
            }),
            Item::For(f) => {
                // An inner loop reusing the same variable name shadows the
                // outer one inside its own body; its bounds still see the
                // outer binding.
                let body = if f.var == var {
                    f.body.clone()
                } else {
                    substitute_items(&f.body, var, value)
                };
                Item::For(ForBlock {
                    var: f.var.clone(),
                    lo: f.lo.substitute(var, value),
                    hi: f.hi.substitute(var, value),
                    body,
                    span: f.span,
                })
            }
            Item::Permute(p) => Item::Permute(PermuteBlock {
                body: substitute_items(&p.body, var, value),
                span: p.span,
            }),
        })
        .collect()
}

fn substitute_varref(r: &VarRef, var: &str, value: i64) -> VarRef {
    let index = match &r.index {
        Index::None => Index::None,
        Index::Single(e) => Index::Single(e.substitute(var, value)),
        Index::Range(hi, lo) => Index::Range(hi.substitute(var, value), lo.substitute(var, value)),
    };
    VarRef {
        base: r.base.clone(),
        index,
        span: r.span,
    }
}

fn substitute_value(v: &Value, var: &str, value: i64) -> Value {
    match v {
        Value::Bits(raw) => Value::Bits(raw.clone()),
        Value::Call(e) => Value::Call(e.substitute(var, value)),
        Value::Wildcard => Value::Wildcard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dogen_source::Span;
    use dogen_syntax::parser::parse_test_body;
    use dogen_syntax::Expr;

    fn expand_body(body: &str) -> Vec<Item> {
        let sink = DiagnosticSink::new();
        let items = parse_test_body(body, Span::new(0, body.len() as u32), &sink)
            .expect("body should parse");
        expand(&items, &sink).expect("body should expand")
    }

    fn single_index(item: &Item) -> i64 {
        match item {
            Item::Assign(a) => match &a.target.index {
                Index::Single(Expr::Int(v)) => *v,
                other => panic!("expected literal single index, got {other:?}"),
            },
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn ascending_range() {
        let items = expand_body("for i in [0:2] { x[i] = 1; }");
        assert_eq!(items.len(), 3);
        let indices: Vec<i64> = items.iter().map(single_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn descending_range() {
        let items = expand_body("for i in [2:0] { x[i] = 1; }");
        let indices: Vec<i64> = items.iter().map(single_index).collect();
        assert_eq!(indices, vec![2, 1, 0]);
    }

    #[test]
    fn single_iteration_range() {
        let items = expand_body("for i in [5:5] { x[i] = 1; }");
        assert_eq!(items.len(), 1);
        assert_eq!(single_index(&items[0]), 5);
    }

    #[test]
    fn nested_loops_multiply() {
        let items = expand_body("for i in [0:1] { for j in [0:2] { x[i+j] = 1; } }");
        assert_eq!(items.len(), 6);
        let indices: Vec<i64> = items.iter().map(single_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 1, 2, 3]);
    }

    #[test]
    fn inner_bound_uses_outer_variable() {
        let items = expand_body("for i in [1:2] { for j in [0:i] { y[j] = 0; } }");
        // i=1 contributes 2 items (j=0..1), i=2 contributes 3 (j=0..2).
        assert_eq!(items.len(), 5);
    }

    #[test]
    fn variable_in_helper_argument() {
        let items = expand_body("for i in [2:2] { x[3:0] = bin(i, 4); }");
        match &items[0] {
            Item::Assign(a) => assert_eq!(
                a.value,
                Value::Call(Expr::Bin(Box::new(Expr::Int(2)), Box::new(Expr::Int(4))))
            ),
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn permute_body_is_substituted_but_preserved() {
        let items = expand_body("for i in [0:0] { permute { x[i] = *; } }");
        assert_eq!(items.len(), 1);
        match &items[0] {
            Item::Permute(p) => assert_eq!(single_index(&p.body[0]), 0),
            other => panic!("expected permute, got {other:?}"),
        }
    }

    #[test]
    fn unresolved_bound_is_fatal() {
        let sink = DiagnosticSink::new();
        let body = "for i in [0:k] { x[i] = 1; }";
        let items = parse_test_body(body, Span::new(0, body.len() as u32), &sink).unwrap();
        assert!(expand(&items, &sink).is_none());
        assert!(sink.has_errors());
    }

    #[test]
    fn shadowing_inner_variable() {
        let items = expand_body("for i in [0:1] { for i in [3:3] { x[i] = 1; } }");
        let indices: Vec<i64> = items.iter().map(single_index).collect();
        assert_eq!(indices, vec![3, 3]);
    }
}
