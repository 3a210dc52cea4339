// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Defines NASL miscellaneous functions

#[cfg(test)]
mod tests;

use std::{
    thread,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use itertools::Itertools;
use rand::Rng;

use super::BuiltinError;
use crate::nasl::prelude::*;

/// NASL function to display any number of NASL values
///
/// The values are concatenated like `string` does and written to stdout.
fn display(params: &Params, _: &Context) -> NaslResult {
    let line: String = params.positionals().iter().map(ToString::to_string).collect();
    println!("{line}");
    Ok(NaslValue::Null)
}

/// A representation of `value` that shows its type.
fn dump_value(value: &NaslValue) -> String {
    match value {
        NaslValue::Null => "NULL".to_owned(),
        NaslValue::String(s) => format!("{s:?}"),
        NaslValue::Array(arr) => format!(
            "[{}]",
            arr.entries()
                .map(|(k, v)| format!("{k}: {}", dump_value(v)))
                .join(", ")
        ),
        x => x.to_string(),
    }
}

/// Prints each argument with its type to stdout.
fn dump(params: &Params, _: &Context) -> NaslResult {
    for value in params.positionals() {
        println!("{}: {}", nasl_type_name(value), dump_value(value));
    }
    Ok(NaslValue::Null)
}

fn nasl_type_name(value: &NaslValue) -> &'static str {
    match value {
        NaslValue::Null => "undef",
        NaslValue::Boolean(_) => "int",
        x => x.type_name(),
    }
}

/// Returns the type of given unnamed argument.
// typeof is a reserved keyword, therefore it is prefixed with "nasl_"
fn nasl_typeof(params: &Params, _: &Context) -> NaslResult {
    let value = params.get_param_by_number_or(0, NaslValue::Null);
    Ok(nasl_type_name(&value).into())
}

/// Returns true when the given unnamed argument is null.
fn isnull(params: &Params, _: &Context) -> NaslResult {
    Ok(params.get_param_by_number(0).is_none().into())
}

/// Returns true when a builtin or a function of the running script has the
/// given name.
fn defined_func(params: &Params, context: &Context) -> NaslResult {
    let name = params.required_positional(0)?.to_string();
    Ok(context.nasl_fn_defined(&name).into())
}

/// Returns the seconds counted from 1st January 1970 as an integer.
fn unixtime(_: &Params, _: &Context) -> NaslResult {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|t| t.as_secs())
        .map_err(|e| BuiltinError::Io(e.to_string()))?;
    Ok(NaslValue::Number(secs as i64))
}

/// NASL function to get a non negative random number
fn nasl_rand(_: &Params, _: &Context) -> NaslResult {
    Ok(NaslValue::Number(rand::thread_rng().gen_range(0..=i32::MAX as i64)))
}

fn duration_arg(params: &Params) -> Result<u64, FnError> {
    let value = params.required_positional(0)?.to_number();
    u64::try_from(value).map_err(|_| {
        ArgumentError::wrong_argument("duration", "positive", &value.to_string()).into()
    })
}

/// takes an integer and sleeps the amount of seconds
fn sleep(params: &Params, _: &Context) -> NaslResult {
    thread::sleep(Duration::from_secs(duration_arg(params)?));
    Ok(NaslValue::Null)
}

/// takes an integer and sleeps the amount of microseconds
fn usleep(params: &Params, _: &Context) -> NaslResult {
    thread::sleep(Duration::from_micros(duration_arg(params)?));
    Ok(NaslValue::Null)
}

/// Aborts the script when the first argument is false. The optional second
/// argument is the message of the failure.
fn assert(params: &Params, _: &Context) -> NaslResult {
    let condition = params.get_param_by_number(0).is_some_and(NaslValue::to_bool);
    if condition {
        return Ok(NaslValue::Null);
    }
    let message = params
        .named_or_positional("msg", 1)
        .map(ToString::to_string)
        .unwrap_or_else(|| "condition is false".to_owned());
    Err(BuiltinError::Assertion(message).into())
}

/// Returns a preference of the scanner, undefined when it is not set.
fn get_preference(params: &Params, context: &Context) -> NaslResult {
    let name = params.required_positional(0)?.to_string();
    Ok(context.script().scanner_preference(&name).into())
}

/// Whether checks that may harm the target are disabled, which is the
/// scanner preference `safe_checks` set to `yes`.
fn safe_checks(_: &Params, context: &Context) -> NaslResult {
    Ok((context.script().scanner_preference("safe_checks") == Some("yes")).into())
}

/// Returns the scanner preference `vendor_version`, or an empty string.
fn vendor_version(_: &Params, context: &Context) -> NaslResult {
    Ok(context
        .script()
        .scanner_preference("vendor_version")
        .unwrap_or_default()
        .into())
}

pub struct Misc;

function_set! {
    Misc,
    sync_stateless,
    (
        display,
        dump,
        (nasl_typeof, "typeof"),
        isnull,
        defined_func,
        unixtime,
        (nasl_rand, "rand"),
        sleep,
        usleep,
        assert,
        get_preference,
        safe_checks,
        vendor_version,
    )
}
