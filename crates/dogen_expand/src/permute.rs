//! Enumeration expansion: exhaustive wildcard enumeration in `permute` blocks.
//!
//! Within one permute body, ranged wildcard assignments are first split into
//! one single-index wildcard assignment per bit, in range order. Enumeration
//! proper is then a breadth-first binary expansion over a worklist of body
//! variants: each round resolves the first remaining wildcard of every
//! variant into a 0-branch and a 1-branch (0 first), so `k` wildcards yield
//! exactly `2^k` variants and every round strictly reduces the number of
//! unresolved wildcards. The permute construct is replaced by the
//! concatenation of all final variants.

use crate::eval::{self, eval_int};
use dogen_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use dogen_syntax::{Assign, Expr, Index, Item, PermuteBlock, Value};

/// Expands every `permute` construct in `items`.
///
/// Expects iteration expansion to have run already; a `permute` that still
/// contains another `permute` (for example via an unrolled loop body) is the
/// fatal "nested permute" semantic error.
pub fn expand(items: &[Item], sink: &DiagnosticSink) -> Option<Vec<Item>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Item::Assign(_) | Item::Assert(_) => out.push(item.clone()),
            Item::For(_) => unreachable!("for constructs are expanded before permute blocks"),
            Item::Permute(p) => out.extend(expand_one(p, sink)?),
        }
    }
    Some(out)
}

fn expand_one(p: &PermuteBlock, sink: &DiagnosticSink) -> Option<Vec<Item>> {
    if let Some(nested) = p.body.iter().find(|i| matches!(i, Item::Permute(_))) {
        sink.emit(Diagnostic::error(
            DiagnosticCode::new(Category::Error, 202),
            "nested permute blocks are not valid",
            nested.span(),
        ));
        return None;
    }

    let body = split_ranged_wildcards(&p.body, sink)?;

    let mut variants = vec![body];
    while variants.iter().any(|v| find_wildcard(v).is_some()) {
        let mut next = Vec::with_capacity(variants.len() * 2);
        for variant in &variants {
            match find_wildcard(variant) {
                Some(pos) => {
                    next.push(resolve_at(variant, pos, "0"));
                    next.push(resolve_at(variant, pos, "1"));
                }
                None => next.push(variant.clone()),
            }
        }
        variants = next;
    }

    Some(variants.into_iter().flatten().collect())
}

/// Rewrites `name[hi:lo] = *;` into one single-index wildcard per bit.
fn split_ranged_wildcards(items: &[Item], sink: &DiagnosticSink) -> Option<Vec<Item>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let Item::Assign(a) = item else {
            out.push(item.clone());
            continue;
        };
        let (Index::Range(hi, lo), Value::Wildcard) = (&a.target.index, &a.value) else {
            out.push(item.clone());
            continue;
        };

        let hi = eval_or_report(hi, a.span, sink)?;
        let lo = eval_or_report(lo, a.span, sink)?;
        let step: i64 = if lo >= hi { 1 } else { -1 };
        let count = (lo - hi).unsigned_abs() + 1;

        let mut k = hi;
        for _ in 0..count {
            out.push(Item::Assign(Assign {
                target: dogen_syntax::VarRef {
                    base: a.target.base.clone(),
                    index: Index::Single(Expr::Int(k)),
                    span: a.target.span,
                },
                value: Value::Wildcard,
                span: a.span,
            }));
            k += step;
        }
    }
    Some(out)
}

fn eval_or_report(expr: &Expr, span: dogen_source::Span, sink: &DiagnosticSink) -> Option<i64> {
    match eval_int(expr) {
        Ok(v) => Some(v),
        Err(err) => {
            eval::report(&err, span, sink);
            None
        }
    }
}

/// Finds the first scalar wildcard assignment in a variant.
fn find_wildcard(items: &[Item]) -> Option<usize> {
    items
        .iter()
        .position(|i| matches!(i, Item::Assign(a) if a.value == Value::Wildcard))
}

/// Returns a copy of the variant with the wildcard at `pos` resolved to `bit`.
fn resolve_at(items: &[Item], pos: usize, bit: &str) -> Vec<Item> {
    let mut copy = items.to_vec();
    if let Item::Assign(a) = &mut copy[pos] {
        a.value = Value::Bits(bit.to_string());
    }
    copy
}
