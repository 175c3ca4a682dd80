//! The restricted literal evaluator.
//!
//! Evaluates the deliberately small expression grammar — integer literals,
//! homogeneous `+`/`*` chains, and the `bin`/`7seg` helpers — in two
//! contexts: integer context (indices, loop bounds, helper arguments) and
//! bit context (assignment and assertion right-hand sides). A helper call
//! used where an integer is required evaluates to its bit string and that
//! string is reparsed as a decimal integer, which is exactly how nested
//! helper calls behaved in the textual splice-and-rescan scheme this
//! replaces.

use dogen_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use dogen_source::Span;
use dogen_syntax::{Expr, Value};
use thiserror::Error;

/// The active-low seven-segment patterns for hex digits 0 through 15.
///
/// Segment order and polarity match the standard common-anode hex font; a
/// `0` drives the segment on.
const SEVEN_SEG_PATTERNS: [&str; 16] = [
    "1000000", "1111001", "0100100", "0110000", "0011001", "0010010", "0000010", "1111000",
    "0000000", "0010000", "0001000", "0000011", "1000110", "0100001", "0000110", "0001110",
];

/// Errors produced while evaluating restricted expressions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    /// A loop variable survived past iteration expansion.
    #[error("unresolved identifier '{0}'")]
    UnresolvedVar(String),

    /// An arithmetic chain overflowed the integer range.
    #[error("arithmetic overflow while folding a constant expression")]
    ArithmeticOverflow,

    /// `bin()` was given a negative width.
    #[error("the bin() width must not be negative (got {0})")]
    NegativeWidth(i64),

    /// `bin()` was given a negative value.
    #[error("the value {0} passed to bin() must not be negative")]
    NegativeValue(i64),

    /// The value does not fit in the requested width.
    #[error("overflow from the bin() helper: {value} cannot be represented with {width} binary bits")]
    BinOverflow {
        /// The evaluated value argument.
        value: i64,
        /// The evaluated width argument.
        width: i64,
    },

    /// `7seg()` was given a value outside `[0, 15]`.
    #[error("the value passed to 7seg() evaluates to {0} and cannot be displayed on a 7 segment display")]
    SevenSegRange(i64),

    /// A helper's bit-string result was used as an integer but does not
    /// reparse as one.
    #[error("helper result '{0}' is not a valid integer")]
    NotAnInteger(String),

    /// A wildcard survived past enumeration expansion.
    #[error("wildcard values are only valid inside permute blocks")]
    UnexpectedWildcard,
}

impl EvalError {
    /// Returns the diagnostic code for this error.
    ///
    /// Unresolved identifiers are `E204`; everything else is the helper /
    /// constant-folding semantic error `E203`.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            EvalError::UnresolvedVar(_) => DiagnosticCode::new(Category::Error, 204),
            _ => DiagnosticCode::new(Category::Error, 203),
        }
    }
}

/// Emits `err` as a diagnostic at `span`.
pub fn report(err: &EvalError, span: Span, sink: &DiagnosticSink) {
    sink.emit(Diagnostic::error(err.code(), err.to_string(), span));
}

/// Evaluates an expression in integer context.
pub fn eval_int(expr: &Expr) -> Result<i64, EvalError> {
    match expr {
        Expr::Int(v) => Ok(*v),
        Expr::Var(name) => Err(EvalError::UnresolvedVar(name.clone())),
        Expr::Sum(terms) => fold(terms, i64::checked_add),
        Expr::Product(terms) => fold(terms, i64::checked_mul),
        Expr::Bin(..) | Expr::SevenSeg(..) => {
            let bits = eval_call(expr)?;
            bits.parse::<i64>()
                .map_err(|_| EvalError::NotAnInteger(bits))
        }
    }
}

/// Evaluates a right-hand-side value into its bit pattern.
pub fn eval_bits(value: &Value) -> Result<String, EvalError> {
    match value {
        Value::Bits(raw) => Ok(raw.clone()),
        Value::Call(expr) => eval_call(expr),
        Value::Wildcard => Err(EvalError::UnexpectedWildcard),
    }
}

/// Evaluates a helper call into its bit pattern.
fn eval_call(expr: &Expr) -> Result<String, EvalError> {
    match expr {
        Expr::Bin(value, width) => {
            let value = eval_int(value)?;
            let width = eval_int(width)?;
            if width < 0 {
                return Err(EvalError::NegativeWidth(width));
            }
            if value < 0 {
                return Err(EvalError::NegativeValue(value));
            }
            // The minimal representation of any value, zero included, is one
            // bit wide, so a zero width always overflows.
            let needed = 64 - u32::min(value.leading_zeros(), 63);
            if i64::from(needed) > width {
                return Err(EvalError::BinOverflow { value, width });
            }
            Ok(format!("{value:0w$b}", w = width as usize))
        }
        Expr::SevenSeg(value) => {
            let value = eval_int(value)?;
            if !(0..=15).contains(&value) {
                return Err(EvalError::SevenSegRange(value));
            }
            Ok(SEVEN_SEG_PATTERNS[value as usize].to_string())
        }
        other => Ok(eval_int(other)?.to_string()),
    }
}

fn fold(terms: &[Expr], op: fn(i64, i64) -> Option<i64>) -> Result<i64, EvalError> {
    let mut iter = terms.iter();
    let first = match iter.next() {
        Some(t) => eval_int(t)?,
        None => return Err(EvalError::ArithmeticOverflow),
    };
    iter.try_fold(first, |acc, t| {
        op(acc, eval_int(t)?).ok_or(EvalError::ArithmeticOverflow)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(value: i64, width: i64) -> Expr {
        Expr::Bin(Box::new(Expr::Int(value)), Box::new(Expr::Int(width)))
    }

    #[test]
    fn int_literal() {
        assert_eq!(eval_int(&Expr::Int(42)), Ok(42));
    }

    #[test]
    fn sum_and_product_fold_left_to_right() {
        let sum = Expr::Sum(vec![Expr::Int(1), Expr::Int(2), Expr::Int(3)]);
        assert_eq!(eval_int(&sum), Ok(6));
        let product = Expr::Product(vec![Expr::Int(2), Expr::Int(3), Expr::Int(4)]);
        assert_eq!(eval_int(&product), Ok(24));
    }

    #[test]
    fn unresolved_var() {
        assert_eq!(
            eval_int(&Expr::Var("i".to_string())),
            Err(EvalError::UnresolvedVar("i".to_string()))
        );
    }

    #[test]
    fn bin_basic() {
        assert_eq!(eval_call(&bin(5, 3)), Ok("101".to_string()));
        assert_eq!(eval_call(&bin(5, 6)), Ok("000101".to_string()));
        assert_eq!(eval_call(&bin(0, 4)), Ok("0000".to_string()));
    }

    #[test]
    fn bin_round_trips() {
        for width in 1..=8i64 {
            for value in 0..(1i64 << width) {
                let bits = eval_call(&bin(value, width)).unwrap();
                assert_eq!(bits.len(), width as usize);
                assert_eq!(i64::from_str_radix(&bits, 2).unwrap(), value);
            }
        }
    }

    #[test]
    fn bin_overflow() {
        assert_eq!(
            eval_call(&bin(5, 2)),
            Err(EvalError::BinOverflow { value: 5, width: 2 })
        );
        // Even zero needs one bit.
        assert_eq!(
            eval_call(&bin(0, 0)),
            Err(EvalError::BinOverflow { value: 0, width: 0 })
        );
    }

    #[test]
    fn bin_negative_width() {
        assert_eq!(eval_call(&bin(1, -1)), Err(EvalError::NegativeWidth(-1)));
    }

    #[test]
    fn seven_seg_table() {
        let seg = |v: i64| eval_call(&Expr::SevenSeg(Box::new(Expr::Int(v))));
        assert_eq!(seg(0), Ok("1000000".to_string()));
        assert_eq!(seg(8), Ok("0000000".to_string()));
        assert_eq!(seg(15), Ok("0001110".to_string()));
        for v in 0..=15 {
            assert_eq!(seg(v).unwrap().len(), 7);
            // Pure function: same input, same pattern.
            assert_eq!(seg(v), seg(v));
        }
    }

    #[test]
    fn seven_seg_out_of_range() {
        let seg = |v: i64| eval_call(&Expr::SevenSeg(Box::new(Expr::Int(v))));
        assert_eq!(seg(16), Err(EvalError::SevenSegRange(16)));
        assert_eq!(seg(-1), Err(EvalError::SevenSegRange(-1)));
    }

    #[test]
    fn nested_helper_in_integer_context() {
        // bin(5,3) produces "101", which reparses as decimal 101.
        let nested = Expr::Bin(Box::new(bin(5, 3)), Box::new(Expr::Int(8)));
        assert_eq!(eval_call(&nested), Ok("01100101".to_string()));
    }

    #[test]
    fn bits_value_kept_verbatim() {
        assert_eq!(
            eval_bits(&Value::Bits("0011".to_string())),
            Ok("0011".to_string())
        );
    }

    #[test]
    fn wildcard_is_an_error() {
        assert_eq!(eval_bits(&Value::Wildcard), Err(EvalError::UnexpectedWildcard));
    }

    #[test]
    fn arithmetic_overflow() {
        let sum = Expr::Sum(vec![Expr::Int(i64::MAX), Expr::Int(1)]);
        assert_eq!(eval_int(&sum), Err(EvalError::ArithmeticOverflow));
    }
}
