// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Defines NASL functions that deal with string and their helpers
//!
//! Strings hold one char per byte for binary data, so every index and length
//! in this module counts chars.

#[cfg(test)]
mod tests;

use crate::nasl::{interpreter::MAX_STRING_LEN, prelude::*};

fn chars(value: &NaslValue) -> Vec<char> {
    value.to_string().chars().collect()
}

/// Clamps a NASL index into `0..=len`.
fn clamp(idx: i64, len: usize) -> usize {
    usize::try_from(idx).unwrap_or_default().min(len)
}

/// Appends `value` as raw bytes: numbers become a single byte, arrays
/// contribute each of their values.
fn append_raw(data: &mut String, value: &NaslValue) {
    match value {
        NaslValue::Number(x) => data.push(*x as u8 as char),
        NaslValue::Boolean(x) => data.push(*x as u8 as char),
        NaslValue::Array(arr) => {
            for v in arr.values() {
                append_raw(data, v);
            }
        }
        NaslValue::Null => {}
        x => data.push_str(&x.to_string()),
    }
}

/// NASL function to concatenate the string representation of all positional
/// arguments.
fn string(params: &Params, _: &Context) -> NaslResult {
    Ok(params
        .positionals()
        .iter()
        .map(ToString::to_string)
        .collect::<String>()
        .into())
}

/// Like `string`, but skips undefined values.
fn strcat(params: &Params, _: &Context) -> NaslResult {
    Ok(params
        .positionals()
        .iter()
        .filter(|v| !v.is_null())
        .map(ToString::to_string)
        .collect::<String>()
        .into())
}

/// NASL function to parse numeric values into characters and combine with additional values
fn raw_string(params: &Params, _: &Context) -> NaslResult {
    let mut data = String::new();
    for value in params.positionals() {
        append_raw(&mut data, value);
    }
    Ok(data.into())
}

/// Returns the byte value of the first char of a string.
fn ord(params: &Params, _: &Context) -> NaslResult {
    let s = params.required_positional(0)?.to_string();
    Ok(s.chars()
        .next()
        .map(|c| NaslValue::Number(c as i64))
        .unwrap_or_default())
}

/// NASL function to convert an integer into a hexadecimal number.
/// Only the lowest byte is used, `hex(256)` is `0x00`.
fn hex(params: &Params, _: &Context) -> NaslResult {
    let n = params.required_positional(0)?.to_number();
    Ok(format!("0x{:02x}", n.rem_euclid(256)).into())
}

/// Lower case hex representation of the bytes of a string.
fn hexstr(params: &Params, _: &Context) -> NaslResult {
    Ok(match params.get_param_by_number(0) {
        Some(NaslValue::Array(_)) | None => NaslValue::Null,
        Some(value) => hex::encode(value.to_bytes()).into(),
    })
}

/// Returns the rest of the first argument starting at the first occurrence
/// of the second one.
fn strstr(params: &Params, _: &Context) -> NaslResult {
    let haystack = params.get_param_by_number_or(0, "".into()).to_string();
    let needle = params.get_param_by_number_or(1, "".into()).to_string();
    Ok(haystack
        .find(&needle)
        .map(|idx| NaslValue::from(&haystack[idx..]))
        .unwrap_or_default())
}

/// `substr(s, start, end)` returns the chars from `start` up to, but not
/// including, `end`. Without `end` the rest of the string is returned.
fn substr(params: &Params, _: &Context) -> NaslResult {
    let s = chars(params.required_positional(0)?);
    let start = params.get_param_by_number(1).map(NaslValue::to_number);
    let end = params.get_param_by_number(2).map(NaslValue::to_number);
    let (start, end) = match (start, end) {
        (None, None) => {
            return Err(ArgumentError::WrongArgument("substr needs a start or an end".into()).into());
        }
        (start, end) => (
            clamp(start.unwrap_or(0), s.len()),
            clamp(end.unwrap_or(s.len() as i64), s.len()),
        ),
    };
    if start > end {
        return Err(ArgumentError::WrongArgument(format!(
            "start index ({start}) larger than end ({end})"
        ))
        .into());
    }
    Ok(s[start..end].iter().collect::<String>().into())
}

/// `insstr(s, ins, start, end)` replaces the chars from `start` to `end`,
/// both inclusive, with `ins`. Without `end` the rest of `s` is replaced.
fn insstr(params: &Params, _: &Context) -> NaslResult {
    let s = chars(params.required_positional(0)?);
    let insert = params.required_positional(1)?.to_string();
    let start = clamp(params.required_positional(2)?.to_number(), s.len());
    let end = params
        .get_param_by_number(3)
        .map(|v| clamp(v.to_number().saturating_add(1), s.len()))
        .unwrap_or(s.len());
    if start > end {
        return Err(ArgumentError::WrongArgument(format!(
            "start index ({start}) larger than end ({end})"
        ))
        .into());
    }
    let mut result: String = s[..start].iter().collect();
    result.push_str(&insert);
    result.extend(&s[end..]);
    Ok(result.into())
}

fn tolower(params: &Params, _: &Context) -> NaslResult {
    Ok(params
        .get_param_by_number(0)
        .map(|v| NaslValue::from(v.to_string().to_lowercase()))
        .unwrap_or_default())
}

fn toupper(params: &Params, _: &Context) -> NaslResult {
    Ok(params
        .get_param_by_number(0)
        .map(|v| NaslValue::from(v.to_string().to_uppercase()))
        .unwrap_or_default())
}

/// NASL function to return a buffer of required length with repeated occurrences of a specified string
///
/// The length is taken from `length` or the first positional argument, the
/// repeated string from `data`, defaulting to `X`.
fn crap(params: &Params, _: &Context) -> NaslResult {
    let length = params
        .named_or_positional("length", 0)
        .map(NaslValue::to_number)
        .ok_or_else(|| FnError::missing_argument("length"))?;
    let length = usize::try_from(length)
        .map_err(|_| ArgumentError::wrong_argument("length", "positive", &length.to_string()))?;
    if length > MAX_STRING_LEN {
        return Err(ArgumentError::wrong_argument(
            "length",
            &format!("at most {MAX_STRING_LEN}"),
            &length.to_string(),
        )
        .into());
    }
    let data = params.str_by_name("data").unwrap_or_else(|| "X".to_owned());
    if data.is_empty() {
        return Ok(NaslValue::from(""));
    }
    Ok(data.chars().cycle().take(length).collect::<String>().into())
}

fn strlen(params: &Params, _: &Context) -> NaslResult {
    Ok(match params.get_param_by_number(0) {
        Some(NaslValue::Array(_)) | None => NaslValue::Number(0),
        Some(value) => NaslValue::from(value.to_string().chars().count()),
    })
}

/// Splits a string by `sep`, defaulting to a new line. Empty parts are
/// dropped. With `keep: TRUE` each part keeps its trailing separator.
fn split(params: &Params, _: &Context) -> NaslResult {
    let s = params.required_positional(0)?.to_string();
    let sep = params.str_by_name("sep").unwrap_or_else(|| "\n".to_owned());
    let keep = params.bool_by_name("keep", false);
    if sep.is_empty() {
        return Err(ArgumentError::wrong_argument("sep", "not empty", "empty").into());
    }
    let parts: Vec<NaslValue> = if keep {
        s.split_inclusive(sep.as_str()).map(NaslValue::from).collect()
    } else {
        s.split(sep.as_str())
            .filter(|p| !p.is_empty())
            .map(NaslValue::from)
            .collect()
    };
    Ok(NaslValue::list(parts))
}

/// Removes trailing whitespace.
fn chomp(params: &Params, _: &Context) -> NaslResult {
    Ok(params
        .get_param_by_number(0)
        .map(|v| NaslValue::from(v.to_string().trim_end()))
        .unwrap_or_default())
}

fn int(params: &Params, _: &Context) -> NaslResult {
    Ok(NaslValue::Number(
        params
            .get_param_by_number(0)
            .map(NaslValue::to_number)
            .unwrap_or_default(),
    ))
}

/// NASL function to lookup position of a substring within a string
///
/// The optional third argument is the char offset to start the search at.
/// The result counts from that offset, `-1` means not found.
fn stridx(params: &Params, _: &Context) -> NaslResult {
    let haystack = chars(params.required_positional(0)?);
    let needle: Vec<char> = chars(params.required_positional(1)?);
    let offset = clamp(
        params.get_param_by_number_or(2, 0.into()).to_number(),
        haystack.len(),
    );
    let haystack = &haystack[offset..];
    let found = if needle.is_empty() {
        Some(0)
    } else {
        haystack.windows(needle.len()).position(|w| w == needle)
    };
    Ok(found.map(NaslValue::from).unwrap_or(NaslValue::Number(-1)))
}

/// Replaces occurrences of `find` in `string` with `replace`. When `count`
/// is given and positive only that many occurrences are replaced.
fn str_replace(params: &Params, _: &Context) -> NaslResult {
    let s = params.required_named("string")?.to_string();
    let find = params.required_named("find")?.to_string();
    let replace = params.str_by_name("replace").unwrap_or_default();
    if find.is_empty() {
        return Ok(s.into());
    }
    Ok(match params.int_by_name("count") {
        Some(count) if count > 0 => s.replacen(&find, &replace, count as usize),
        _ => s.replace(&find, &replace),
    }
    .into())
}

pub struct NaslString;

function_set! {
    NaslString,
    sync_stateless,
    (
        string,
        strcat,
        raw_string,
        ord,
        hex,
        hexstr,
        strstr,
        substr,
        insstr,
        tolower,
        toupper,
        crap,
        strlen,
        split,
        chomp,
        int,
        stridx,
        str_replace,
    )
}
