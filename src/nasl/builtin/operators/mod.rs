// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Operators without a dedicated opcode. The compiler lowers them to calls
//! of these functions.

#[cfg(test)]
mod tests;

use regex::RegexBuilder;

use super::BuiltinError;
use crate::nasl::{
    interpreter::{ArrayKey, NaslIterator},
    prelude::*,
};

fn two_operands(params: &Params) -> (NaslValue, NaslValue) {
    (
        params.get_param_by_number_or(0, NaslValue::Null),
        params.get_param_by_number_or(1, NaslValue::Null),
    )
}

fn integer_operand(value: &NaslValue, function: &str) -> Result<i64, FnError> {
    match value {
        NaslValue::Null => Ok(0),
        NaslValue::Number(n) => Ok(*n),
        NaslValue::Boolean(b) => Ok(*b as i64),
        x => Err(ArgumentError::wrong_argument(function, "int", x.type_name()).into()),
    }
}

/// `a ** b`
fn pow(params: &Params, _: &Context) -> NaslResult {
    match two_operands(params) {
        (NaslValue::Float(a), b) => Ok(NaslValue::Float(a.powf(b.to_number() as f64))),
        (a, NaslValue::Float(b)) => Ok(NaslValue::Float((a.to_number() as f64).powf(b))),
        (a, b) => {
            let base = integer_operand(&a, "**")?;
            let exponent = integer_operand(&b, "**")?;
            let result = match u32::try_from(exponent) {
                Ok(e) => base.wrapping_pow(e),
                // Only 1 and -1 have a non zero integral inverse.
                Err(_) => match base {
                    1 => 1,
                    -1 if exponent % 2 == 0 => 1,
                    -1 => -1,
                    _ => 0,
                },
            };
            Ok(NaslValue::Number(result))
        }
    }
}

/// `a >>> b`. Values within the 32 bit range are shifted as unsigned 32 bit
/// integers.
fn right_shift_logical(params: &Params, _: &Context) -> NaslResult {
    let (a, b) = two_operands(params);
    let value = integer_operand(&a, ">>>")?;
    let shift = integer_operand(&b, ">>>")?;
    let result = match i32::try_from(value) {
        Ok(v) => (v as u32).checked_shr(shift as u32).unwrap_or(0) as i64,
        Err(_) => (value as u64).checked_shr(shift as u32).unwrap_or(0) as i64,
    };
    Ok(NaslValue::Number(result))
}

/// `a <<< b`
fn left_shift_logical(params: &Params, _: &Context) -> NaslResult {
    let (a, b) = two_operands(params);
    let value = integer_operand(&a, "<<<")?;
    let shift = integer_operand(&b, "<<<")?;
    Ok(NaslValue::Number(
        (value as u64).checked_shl(shift as u32).unwrap_or(0) as i64,
    ))
}

/// `~a`
fn bit_not(params: &Params, _: &Context) -> NaslResult {
    let value = integer_operand(&params.get_param_by_number_or(0, NaslValue::Null), "~")?;
    Ok(NaslValue::Number(!value))
}

/// `a =~ b`, searches the regular expression `b` within `a`.
fn re_equal(params: &Params, _: &Context) -> NaslResult {
    let (haystack, pattern) = two_operands(params);
    let re = RegexBuilder::new(&pattern.to_string())
        .build()
        .map_err(|e| BuiltinError::Regex(e.to_string()))?;
    Ok(NaslValue::Number(re.is_match(&haystack.to_string()) as i64))
}

/// `b >< a` is lowered to `strIn(a, b)`: does `a` contain `b`.
fn str_in(params: &Params, _: &Context) -> NaslResult {
    let (haystack, needle) = two_operands(params);
    Ok(NaslValue::Number(
        haystack.to_string().contains(&needle.to_string()) as i64,
    ))
}

/// `a[i]` and `a.field`. Strings are indexed by character, anything else
/// yields undefined.
fn get_array_elem(params: &Params, _: &Context) -> NaslResult {
    let (base, index) = two_operands(params);
    Ok(match base {
        NaslValue::Array(arr) => {
            let key = ArrayKey::from_value(&index)
                .map_err(|e| ArgumentError::WrongArgument(e.to_string()))?;
            arr.get(&key).cloned().unwrap_or_default()
        }
        NaslValue::String(s) => match index {
            NaslValue::Number(i) => usize::try_from(i)
                .ok()
                .and_then(|i| s.chars().nth(i))
                .map(|c| NaslValue::String(c.to_string()))
                .unwrap_or_default(),
            _ => NaslValue::Null,
        },
        _ => NaslValue::Null,
    })
}

/// Creates the iterator used by `foreach`.
fn new_iterator(params: &Params, _: &Context) -> NaslResult {
    let collection = params.get_param_by_number_or(0, NaslValue::Null);
    Ok(NaslValue::Iterator(NaslIterator::over(&collection)))
}

pub struct Operators;

function_set! {
    Operators,
    sync_stateless,
    (
        (pow, "__pow"),
        (right_shift_logical, "RightShiftLogical"),
        (left_shift_logical, "LeftShiftLogical"),
        (bit_not, "BitNot"),
        (re_equal, "reEqual"),
        (str_in, "strIn"),
        get_array_elem,
        (new_iterator, "__NewIterator"),
    )
}
