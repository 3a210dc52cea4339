// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! NASL's implicit coercion rules for the operators that have a dedicated
//! opcode.

use std::cmp::Ordering;

use super::{InterpretErrorKind, MAX_STRING_LEN, NaslValue};
use crate::nasl::code::OpCode;

type Result<T = NaslValue> = std::result::Result<T, InterpretErrorKind>;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }
}

/// Undefined counts as zero and bools as zero or one.
fn numeric(value: &NaslValue) -> Option<Num> {
    match value {
        NaslValue::Null => Some(Num::Int(0)),
        NaslValue::Number(n) => Some(Num::Int(*n)),
        NaslValue::Float(f) => Some(Num::Float(*f)),
        NaslValue::Boolean(b) => Some(Num::Int(*b as i64)),
        _ => None,
    }
}

fn integer(value: &NaslValue) -> Option<i64> {
    match numeric(value)? {
        Num::Int(i) => Some(i),
        Num::Float(_) => None,
    }
}

fn unsupported(op: &'static str, lhs: &NaslValue, rhs: &NaslValue) -> InterpretErrorKind {
    InterpretErrorKind::UnsupportedOperation {
        op,
        lhs: lhs.type_name(),
        rhs: rhs.type_name(),
    }
}

fn bool_value(b: bool) -> NaslValue {
    NaslValue::Number(b as i64)
}

/// Applies an int and a float variant of an arithmetic operator.
fn arithmetic(
    op: &'static str,
    lhs: &NaslValue,
    rhs: &NaslValue,
    int: impl Fn(i64, i64) -> Result,
    float: impl Fn(f64, f64) -> f64,
) -> Result {
    match (numeric(lhs), numeric(rhs)) {
        (Some(Num::Int(a)), Some(Num::Int(b))) => int(a, b),
        (Some(a), Some(b)) => Ok(NaslValue::Float(float(a.as_f64(), b.as_f64()))),
        _ => Err(unsupported(op, lhs, rhs)),
    }
}

fn bitwise(
    op: &'static str,
    lhs: &NaslValue,
    rhs: &NaslValue,
    f: impl Fn(i64, i64) -> i64,
) -> Result {
    match (integer(lhs), integer(rhs)) {
        (Some(a), Some(b)) => Ok(NaslValue::Number(f(a, b))),
        _ => Err(unsupported(op, lhs, rhs)),
    }
}

pub fn add(lhs: &NaslValue, rhs: &NaslValue) -> Result {
    match (lhs, rhs) {
        (NaslValue::Null, x) | (x, NaslValue::Null) => Ok(x.clone()),
        (NaslValue::String(a), b) => Ok(NaslValue::String(format!("{a}{b}"))),
        (a, NaslValue::String(b)) => Ok(NaslValue::String(format!("{a}{b}"))),
        _ => arithmetic(
            "+",
            lhs,
            rhs,
            |a, b| Ok(a.wrapping_add(b).into()),
            |a, b| a + b,
        ),
    }
}

pub fn sub(lhs: &NaslValue, rhs: &NaslValue) -> Result {
    match (lhs, rhs) {
        (NaslValue::String(a), NaslValue::String(b)) => {
            Ok(NaslValue::String(a.replacen(b.as_str(), "", 1)))
        }
        _ => arithmetic(
            "-",
            lhs,
            rhs,
            |a, b| Ok(a.wrapping_sub(b).into()),
            |a, b| a - b,
        ),
    }
}

pub fn mul(lhs: &NaslValue, rhs: &NaslValue) -> Result {
    match (lhs, rhs) {
        (NaslValue::String(s), n) | (n, NaslValue::String(s)) if integer(n).is_some() => {
            let count = usize::try_from(integer(n).unwrap_or_default()).unwrap_or_default();
            match s.len().checked_mul(count) {
                Some(len) if len <= MAX_STRING_LEN => Ok(NaslValue::String(s.repeat(count))),
                _ => Err(InterpretErrorKind::StringTooLong(MAX_STRING_LEN)),
            }
        }
        _ => arithmetic(
            "*",
            lhs,
            rhs,
            |a, b| Ok(a.wrapping_mul(b).into()),
            |a, b| a * b,
        ),
    }
}

pub fn div(lhs: &NaslValue, rhs: &NaslValue) -> Result {
    arithmetic(
        "/",
        lhs,
        rhs,
        |a, b| {
            a.checked_div(b)
                .map(NaslValue::Number)
                .ok_or(InterpretErrorKind::DivisionByZero)
        },
        |a, b| a / b,
    )
}

pub fn rem(lhs: &NaslValue, rhs: &NaslValue) -> Result {
    if let NaslValue::String(fmt) = lhs {
        return Ok(NaslValue::String(format_string(fmt, rhs)));
    }
    arithmetic(
        "%",
        lhs,
        rhs,
        |a, b| {
            a.checked_rem(b)
                .map(NaslValue::Number)
                .ok_or(InterpretErrorKind::DivisionByZero)
        },
        |a, b| a % b,
    )
}

/// Replaces `%s` and `%d` in `fmt` with the elements of `args` (or `args`
/// itself when it is not an array).
fn format_string(fmt: &str, args: &NaslValue) -> String {
    let mut args: Box<dyn Iterator<Item = &NaslValue>> = match args {
        NaslValue::Array(a) => Box::new(a.values()),
        x => Box::new(std::iter::once(x)),
    };
    let mut result = String::with_capacity(fmt.len());
    let mut chars = fmt.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('s') => {
                chars.next();
                result.push_str(&args.next().map(|v| v.to_string()).unwrap_or_default());
            }
            Some('d') => {
                chars.next();
                let n = args.next().map(|v| v.to_number()).unwrap_or_default();
                result.push_str(&n.to_string());
            }
            Some('%') => {
                chars.next();
                result.push('%');
            }
            _ => result.push('%'),
        }
    }
    result
}

fn shift_left(a: i64, b: i64) -> i64 {
    u32::try_from(b)
        .ok()
        .and_then(|b| a.checked_shl(b))
        .unwrap_or(0)
}

fn shift_right(a: i64, b: i64) -> i64 {
    u32::try_from(b)
        .ok()
        .and_then(|b| a.checked_shr(b))
        .unwrap_or(if a < 0 { -1 } else { 0 })
}

pub fn equal(lhs: &NaslValue, rhs: &NaslValue) -> bool {
    match (lhs, rhs) {
        (NaslValue::Number(a), NaslValue::Number(b)) => a == b,
        (NaslValue::Float(_), NaslValue::Number(_) | NaslValue::Float(_))
        | (NaslValue::Number(_), NaslValue::Float(_)) => {
            numeric(lhs).map(Num::as_f64) == numeric(rhs).map(Num::as_f64)
        }
        (NaslValue::Boolean(_), _) | (_, NaslValue::Boolean(_)) => lhs.to_bool() == rhs.to_bool(),
        _ => lhs == rhs,
    }
}

fn compare(op: &'static str, lhs: &NaslValue, rhs: &NaslValue) -> Result<Ordering> {
    match (lhs, rhs) {
        (NaslValue::String(a), NaslValue::String(b)) => Ok(a.cmp(b)),
        _ => match (numeric(lhs), numeric(rhs)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => Ok(a.cmp(&b)),
            (Some(a), Some(b)) => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .ok_or_else(|| unsupported(op, lhs, rhs)),
            _ => Err(unsupported(op, lhs, rhs)),
        },
    }
}

/// Evaluates a binary operator opcode.
pub fn binary(op: OpCode, lhs: &NaslValue, rhs: &NaslValue) -> Result {
    use OpCode::*;
    match op {
        Add | PlusEq => add(lhs, rhs),
        Sub | MinusEq => sub(lhs, rhs),
        Mul | MulEq => mul(lhs, rhs),
        Div | DivEq => div(lhs, rhs),
        Mod | ModEq => rem(lhs, rhs),
        Shl | ShlEq => bitwise("<<", lhs, rhs, shift_left),
        Shr | ShrEq => bitwise(">>", lhs, rhs, shift_right),
        BitAnd => bitwise("&", lhs, rhs, |a, b| a & b),
        BitOr => bitwise("|", lhs, rhs, |a, b| a | b),
        BitXor => bitwise("^", lhs, rhs, |a, b| a ^ b),
        Eq => Ok(bool_value(equal(lhs, rhs))),
        NotEq => Ok(bool_value(!equal(lhs, rhs))),
        Lt => compare("<", lhs, rhs).map(|o| bool_value(o.is_lt())),
        LtEq => compare("<=", lhs, rhs).map(|o| bool_value(o.is_le())),
        Gt => compare(">", lhs, rhs).map(|o| bool_value(o.is_gt())),
        GtEq => compare(">=", lhs, rhs).map(|o| bool_value(o.is_ge())),
        _ => unreachable!("{op:?} is not a binary operator"),
    }
}

pub fn not(value: &NaslValue) -> NaslValue {
    bool_value(!value.to_bool())
}

pub fn neg(value: &NaslValue) -> Result {
    match value {
        NaslValue::Number(n) => Ok(NaslValue::Number(n.wrapping_neg())),
        NaslValue::Float(f) => Ok(NaslValue::Float(-f)),
        x => Err(InterpretErrorKind::UnsupportedUnary {
            op: "-",
            operand: x.type_name(),
        }),
    }
}

pub fn plus(value: &NaslValue) -> Result {
    match value {
        NaslValue::Number(_) | NaslValue::Float(_) => Ok(value.clone()),
        x => Err(InterpretErrorKind::UnsupportedUnary {
            op: "+",
            operand: x.type_name(),
        }),
    }
}

/// `++` and `--`, undefined starts at zero.
pub fn step(value: &NaslValue, delta: i64) -> Result {
    let op = if delta > 0 { "++" } else { "--" };
    match numeric(value) {
        Some(Num::Int(n)) => Ok(NaslValue::Number(n.wrapping_add(delta))),
        Some(Num::Float(f)) => Ok(NaslValue::Float(f + delta as f64)),
        None => Err(InterpretErrorKind::UnsupportedUnary {
            op,
            operand: value.type_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(x: &str) -> NaslValue {
        x.into()
    }

    #[test]
    fn add_coercions() {
        assert_eq!(add(&1.into(), &2.into()).unwrap(), 3.into());
        assert_eq!(add(&NaslValue::Null, &5.into()).unwrap(), 5.into());
        assert_eq!(add(&s("a"), &NaslValue::Null).unwrap(), s("a"));
        assert_eq!(add(&s("a"), &1.into()).unwrap(), s("a1"));
        assert_eq!(add(&1.into(), &s("a")).unwrap(), s("1a"));
        assert_eq!(add(&1.into(), &1.5.into()).unwrap(), 2.5.into());
        let sum = add(&(i32::MAX as i64).into(), &1.into()).unwrap();
        assert_eq!(sum, NaslValue::Number(i32::MAX as i64 + 1));
        assert_eq!(sum.type_name(), "int64");
    }

    #[test]
    fn add_rejects_arrays() {
        let err = add(&NaslValue::list(vec![]), &1.into()).unwrap_err();
        assert_eq!(err.to_string(), "cannot support op1[array] + op2[int]");
    }

    #[test]
    fn string_subtraction_removes_first_occurrence() {
        assert_eq!(sub(&s("aaa<b>aaa"), &s("<b>")).unwrap(), s("aaaaaa"));
        assert_eq!(sub(&s("abab"), &s("ab")).unwrap(), s("ab"));
        assert_eq!(sub(&s("abc"), &s("x")).unwrap(), s("abc"));
        assert!(sub(&s("abc"), &1.into()).is_err());
    }

    #[test]
    fn multiplication_repeats_strings() {
        assert_eq!(mul(&s("ab"), &3.into()).unwrap(), s("ababab"));
        assert_eq!(mul(&2.into(), &s("x")).unwrap(), s("xx"));
        assert_eq!(mul(&2.into(), &3.into()).unwrap(), 6.into());
        assert_eq!(mul(&s("ab"), &(-1).into()).unwrap(), s(""));
    }

    #[test]
    fn repeated_strings_are_bounded() {
        assert!(matches!(
            mul(&s("ab"), &i64::MAX.into()),
            Err(InterpretErrorKind::StringTooLong(MAX_STRING_LEN))
        ));
        let over = (MAX_STRING_LEN / 2 + 1) as i64;
        assert!(matches!(
            mul(&over.into(), &s("ab")),
            Err(InterpretErrorKind::StringTooLong(_))
        ));
    }

    #[test]
    fn division_by_zero() {
        assert!(matches!(
            div(&1.into(), &0.into()),
            Err(InterpretErrorKind::DivisionByZero)
        ));
        assert!(matches!(
            rem(&1.into(), &0.into()),
            Err(InterpretErrorKind::DivisionByZero)
        ));
        assert_eq!(div(&7.into(), &2.into()).unwrap(), 3.into());
    }

    #[test]
    fn string_formatting() {
        assert_eq!(rem(&s("%s=%d%%"), &vec![s("a"), 5.into()].into()).unwrap(), s("a=5%"));
        assert_eq!(rem(&s("v%s"), &1.into()).unwrap(), s("v1"));
    }

    #[test]
    fn comparisons() {
        assert_eq!(binary(OpCode::Eq, &1.into(), &1.0.into()).unwrap(), 1.into());
        assert_eq!(binary(OpCode::Eq, &true.into(), &5.into()).unwrap(), 1.into());
        assert_eq!(binary(OpCode::Eq, &s("a"), &s("a")).unwrap(), 1.into());
        assert_eq!(binary(OpCode::NotEq, &s("1"), &1.into()).unwrap(), 1.into());
        assert_eq!(binary(OpCode::Lt, &NaslValue::Null, &1.into()).unwrap(), 1.into());
        assert_eq!(binary(OpCode::Gt, &s("b"), &s("a")).unwrap(), 1.into());
        let err = binary(OpCode::Gt, &s("b"), &1.into()).unwrap_err();
        assert_eq!(err.to_string(), "cannot support op1[string] > op2[int]");
    }

    #[test]
    fn bitwise_operators() {
        assert_eq!(binary(OpCode::BitAnd, &6.into(), &3.into()).unwrap(), 2.into());
        assert_eq!(binary(OpCode::Shl, &1.into(), &4.into()).unwrap(), 16.into());
        assert_eq!(binary(OpCode::Shr, &(-16).into(), &2.into()).unwrap(), (-4).into());
        assert!(binary(OpCode::BitOr, &1.5.into(), &1.into()).is_err());
    }

    #[test]
    fn unary_operators() {
        assert_eq!(not(&s("")), 1.into());
        assert_eq!(neg(&3.into()).unwrap(), (-3).into());
        assert!(neg(&s("a")).is_err());
        assert_eq!(step(&NaslValue::Null, 1).unwrap(), 1.into());
        assert_eq!(step(&1.into(), -1).unwrap(), 0.into());
    }
}
