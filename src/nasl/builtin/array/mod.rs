// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Defines various built-in functions for NASL arrays and lists.
//!
//! In NASL an array is a list and a dictionary at the same time: numeric
//! keys address the list side, string keys the dictionary side.


use std::cmp::Ordering;

use crate::nasl::prelude::*;

/// Flattens the positional arguments into one list. Array arguments
/// contribute their values, undefined arguments are skipped.
fn create_list(params: &Params) -> Vec<NaslValue> {
    let mut values = Vec::new();
    for value in params.positionals() {
        match value {
            NaslValue::Array(arr) => values.extend(arr.values().filter(|v| !v.is_null()).cloned()),
            NaslValue::Null => {}
            x => values.push(x.clone()),
        }
    }
    values
}

/// NASL function to create a list out of a number of unnamed arguments
fn make_list(params: &Params, _: &Context) -> NaslResult {
    Ok(NaslValue::list(create_list(params)))
}

/// Like `make_list`, but keeps only the first occurrence of each value.
fn make_list_unique(params: &Params, _: &Context) -> NaslResult {
    let mut unique: Vec<NaslValue> = Vec::new();
    for value in create_list(params) {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    Ok(NaslValue::list(unique))
}

/// NASL function to create an array out of an even number of arguments
///
/// Each uneven argument is used as a key while each even argument is used as a value.
/// Integer keys land on the list side, every other key is stringified.
/// When there is an uneven number of elements the last key will be dropped, as there is no corresponding value.
/// So `make_array(1, 0, 1)` will return the same response as `make_array(1, 0)`.
fn make_array(params: &Params, _: &Context) -> NaslResult {
    let mut arr = NaslArray::new();
    for pair in params.positionals().chunks_exact(2) {
        let value = pair[1].clone();
        match &pair[0] {
            NaslValue::Number(idx) => arr
                .add_ele_to_list(*idx, value)
                .map_err(|e| ArgumentError::WrongArgument(e.to_string()))?,
            key => arr.add_ele_to_array(&key.to_string(), value),
        }
    }
    Ok(NaslValue::array(arr))
}

/// Returns a list with the keys of the given arrays: the defined numeric
/// indices first, then the string keys.
fn keys(params: &Params, _: &Context) -> NaslResult {
    let mut keys = vec![];
    for value in params.positionals() {
        let NaslValue::Array(arr) = value else {
            return Ok(NaslValue::Null);
        };
        keys.extend(
            arr.num_elt()
                .iter()
                .enumerate()
                .filter(|(_, v)| !v.is_null())
                .map(|(i, _)| NaslValue::from(i)),
        );
        keys.extend(arr.hash_elt().keys().map(|k| NaslValue::from(k.as_str())));
    }
    Ok(NaslValue::list(keys))
}

/// NASL function to return the number of list slots of an array.
fn max_index(params: &Params, _: &Context) -> NaslResult {
    Ok(match params.required_positional(0)? {
        NaslValue::Array(arr) => NaslValue::from(arr.max_idx()),
        _ => NaslValue::Null,
    })
}

fn is_array(params: &Params, _: &Context) -> NaslResult {
    Ok(matches!(params.get_param_by_number(0), Some(NaslValue::Array(_))).into())
}

/// Returns whether the named argument `array` has the string key `search`.
fn in_array(params: &Params, _: &Context) -> NaslResult {
    let search = params.str_by_name("search").unwrap_or_default();
    match params.required_named("array")? {
        NaslValue::Array(arr) => Ok(arr.get_ele_by_key(&search).is_some().into()),
        x => Err(ArgumentError::wrong_argument("array", "an array", x.type_name()).into()),
    }
}

/// Numbers sort before strings, anything else after both.
fn sort_order(a: &NaslValue, b: &NaslValue) -> Ordering {
    fn rank(v: &NaslValue) -> u8 {
        match v {
            NaslValue::Number(_) | NaslValue::Float(_) | NaslValue::Boolean(_) => 0,
            NaslValue::String(_) => 1,
            _ => 2,
        }
    }
    match (a, b) {
        (NaslValue::String(a), NaslValue::String(b)) => a.cmp(b),
        (NaslValue::Float(a), NaslValue::Float(b)) => a.total_cmp(b),
        (NaslValue::Float(a), b) if rank(b) == 0 => a.total_cmp(&(b.to_number() as f64)),
        (a, NaslValue::Float(b)) if rank(a) == 0 => (a.to_number() as f64).total_cmp(b),
        (a, b) if rank(a) == 0 && rank(b) == 0 => a.to_number().cmp(&b.to_number()),
        (a, b) => rank(a).cmp(&rank(b)),
    }
}

/// NASL function to sort the values of the given arrays. The keys are dropped and a list is returned.
fn nasl_sort(params: &Params, _: &Context) -> NaslResult {
    let mut values = create_list(params);
    values.sort_by(sort_order);
    Ok(NaslValue::list(values))
}

pub struct Array;

function_set! {
    Array,
    sync_stateless,
    (
        make_array,
        make_list,
        make_list_unique,
        (nasl_sort, "sort"),
        keys,
        max_index,
        is_array,
        in_array,
    )
}
