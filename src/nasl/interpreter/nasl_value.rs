// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::{fmt::Display, sync::Arc};

use itertools::Itertools;

use super::{NaslArray, NaslIterator};
use crate::nasl::code::FunctionCode;

/// Upper bound in bytes for strings built by repetition.
pub const MAX_STRING_LEN: usize = 256 * 1024 * 1024;

/// Represents a NASL value during runtime.
///
/// Values are immutable. Arrays are shared behind an `Arc` and cloned on
/// write, which gives NASL's copy on assignment semantics without copying on
/// every read.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum NaslValue {
    /// Undefined
    #[default]
    Null,
    /// Integer value. See [`NaslValue::is_wide`] for the int/int64 distinction.
    Number(i64),
    Float(f64),
    /// String value, bytes outside of UTF-8 are stored one char per byte.
    String(String),
    Boolean(bool),
    Array(Arc<NaslArray>),
    /// A user defined function
    Function(Arc<FunctionCode>),
    /// Iterator handle used by `foreach`
    Iterator(NaslIterator),
    /// Handle of an object living outside of the VM, e.g. an open socket
    Native(NativeHandle),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeHandle {
    pub kind: &'static str,
    pub id: i64,
}

impl NaslValue {
    /// Creates an array value containing the given list.
    pub fn list(values: Vec<NaslValue>) -> Self {
        Self::Array(Arc::new(NaslArray::from_list(values)))
    }

    pub fn array(array: NaslArray) -> Self {
        Self::Array(Arc::new(array))
    }

    /// Creates a string from bytes by mapping each byte to a char.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::String(bytes_to_str(bytes))
    }

    /// Integers exceeding the 32 bit range carry the `int64` tag.
    pub fn is_wide(&self) -> bool {
        matches!(self, Self::Number(n) if i32::try_from(*n).is_err())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            NaslValue::Null => "undefined",
            NaslValue::Number(_) if self.is_wide() => "int64",
            NaslValue::Number(_) => "int",
            NaslValue::Float(_) => "float",
            NaslValue::String(_) => "string",
            NaslValue::Boolean(_) => "bool",
            NaslValue::Array(_) => "array",
            NaslValue::Function(_) => "function",
            NaslValue::Iterator(_) => "iterator",
            NaslValue::Native(h) => h.kind,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn to_bool(&self) -> bool {
        match self {
            NaslValue::Null => false,
            NaslValue::Number(n) => *n != 0,
            NaslValue::Float(f) => *f != 0.0,
            NaslValue::String(s) => !s.is_empty(),
            NaslValue::Boolean(b) => *b,
            NaslValue::Array(a) => !a.is_empty(),
            NaslValue::Function(_) | NaslValue::Iterator(_) | NaslValue::Native(_) => true,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            NaslValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Lenient integer conversion, strings are parsed like `atoi`.
    pub fn to_number(&self) -> i64 {
        match self {
            NaslValue::Number(n) => *n,
            NaslValue::Float(f) => *f as i64,
            NaslValue::Boolean(b) => *b as i64,
            NaslValue::String(s) => atoi(s),
            _ => 0,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NaslValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&NaslArray> {
        match self {
            NaslValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        str_to_bytes(&self.to_string())
    }
}

/// Parses the leading decimal integer of `s`, returns 0 if there is none.
pub fn atoi(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or_default()
}

pub fn bytes_to_str(bytes: &[u8]) -> String {
    bytes.iter().map(|b| *b as char).collect()
}

/// Chars up to U+00FF keep their byte value, wider chars are UTF-8 encoded.
pub fn str_to_bytes(s: &str) -> Vec<u8> {
    let mut result = Vec::with_capacity(s.len());
    for c in s.chars() {
        match u8::try_from(c) {
            Ok(b) => result.push(b),
            Err(_) => {
                let mut buf = [0; 4];
                result.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    result
}

impl Display for NaslValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NaslValue::Null => Ok(()),
            NaslValue::Number(x) => write!(f, "{x}"),
            NaslValue::Float(x) => write!(f, "{x}"),
            NaslValue::String(x) => write!(f, "{x}"),
            NaslValue::Boolean(true) => write!(f, "1"),
            NaslValue::Boolean(false) => write!(f, "0"),
            NaslValue::Array(x) => write!(
                f,
                "[{}]",
                x.entries().map(|(k, v)| format!("{k}: {v}")).join(", ")
            ),
            NaslValue::Function(x) => write!(f, "<function {}>", x.name),
            NaslValue::Iterator(_) => write!(f, "<iterator>"),
            NaslValue::Native(h) => write!(f, "<{} #{}>", h.kind, h.id),
        }
    }
}

impl From<bool> for NaslValue {
    fn from(b: bool) -> Self {
        NaslValue::Boolean(b)
    }
}

impl From<&str> for NaslValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for NaslValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i32> for NaslValue {
    fn from(n: i32) -> Self {
        Self::Number(n as i64)
    }
}

impl From<i64> for NaslValue {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<usize> for NaslValue {
    fn from(n: usize) -> Self {
        Self::Number(n as i64)
    }
}

impl From<f64> for NaslValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<NaslArray> for NaslValue {
    fn from(a: NaslArray) -> Self {
        Self::array(a)
    }
}

impl<T: Into<NaslValue>> From<Vec<T>> for NaslValue {
    fn from(values: Vec<T>) -> Self {
        Self::list(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<NaslValue>> From<Option<T>> for NaslValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_width_tag() {
        assert_eq!(NaslValue::Number(5).type_name(), "int");
        assert_eq!(NaslValue::Number(i32::MAX as i64).type_name(), "int");
        assert_eq!(NaslValue::Number(i32::MAX as i64 + 1).type_name(), "int64");
        assert_eq!(NaslValue::Number(i32::MIN as i64 - 1).type_name(), "int64");
    }

    #[test]
    fn truthiness() {
        assert!(!NaslValue::Null.to_bool());
        assert!(!NaslValue::from("").to_bool());
        assert!(NaslValue::from("0").to_bool());
        assert!(!NaslValue::from(0).to_bool());
        assert!(!NaslValue::list(vec![]).to_bool());
        assert!(NaslValue::from(vec![1]).to_bool());
        let handle = NaslValue::Native(NativeHandle {
            kind: "socket",
            id: 3,
        });
        assert!(handle.to_bool());
        assert_eq!(handle.type_name(), "socket");
    }

    #[test]
    fn lenient_number() {
        assert_eq!(atoi("42abc"), 42);
        assert_eq!(atoi("  -7"), -7);
        assert_eq!(atoi("abc"), 0);
        assert_eq!(NaslValue::from("12").to_number(), 12);
        assert_eq!(NaslValue::Boolean(true).to_number(), 1);
    }

    #[test]
    fn bytes_survive_string_conversion() {
        let bytes = vec![0x00, 0x41, 0xff];
        let value = NaslValue::from_bytes(&bytes);
        assert_eq!(value.to_bytes(), bytes);
    }

    #[test]
    fn display() {
        assert_eq!(NaslValue::Null.to_string(), "");
        assert_eq!(NaslValue::from(vec![1, 2]).to_string(), "[0: 1, 1: 2]");
    }
}
