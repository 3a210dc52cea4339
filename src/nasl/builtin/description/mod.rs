// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! The `script_*` functions a script calls in its description block to
//! declare its metadata.

#[cfg(test)]
mod tests;

use crate::nasl::prelude::*;

/// The `ACT_*` values a script passes to `script_category`, in execution
/// order.
pub const ATTACK_CATEGORIES: [(&str, i64); 11] = [
    ("ACT_INIT", 0),
    ("ACT_SCANNER", 1),
    ("ACT_SETTINGS", 2),
    ("ACT_GATHER_INFO", 3),
    ("ACT_ATTACK", 4),
    ("ACT_MIXED_ATTACK", 5),
    ("ACT_DESTRUCTIVE_ATTACK", 6),
    ("ACT_DENIAL", 7),
    ("ACT_KILL_HOST", 8),
    ("ACT_FLOOD", 9),
    ("ACT_END", 10),
];

fn first_string(params: &Params) -> Result<String, FnError> {
    Ok(params.required_positional(0)?.to_string())
}

/// All defined positional arguments as strings.
fn strings(params: &Params) -> Vec<String> {
    params
        .positionals()
        .iter()
        .filter(|v| !v.is_null())
        .map(ToString::to_string)
        .collect()
}

macro_rules! set_field {
    ($($name: ident => $field: ident),* $(,)?) => {
        $(
            fn $name(params: &Params, context: &Context) -> NaslResult {
                let value = first_string(params)?;
                context.script().with_info(|info| info.$field = value);
                Ok(NaslValue::Null)
            }
        )*
    };
}

macro_rules! extend_field {
    ($($name: ident => $field: ident),* $(,)?) => {
        $(
            fn $name(params: &Params, context: &Context) -> NaslResult {
                let values = strings(params);
                context.script().with_info(|info| info.$field.extend(values));
                Ok(NaslValue::Null)
            }
        )*
    };
}

set_field! {
    script_name => name,
    script_version => version,
    script_copyright => copyright,
    script_family => family,
    script_oid => oid,
    script_summary => summary,
}

extend_field! {
    script_require_keys => required_keys,
    script_exclude_keys => excluded_keys,
    script_require_ports => required_ports,
    script_require_udp_ports => required_udp_ports,
    script_cve_id => cve,
}

fn script_timeout(params: &Params, context: &Context) -> NaslResult {
    let timeout = match params.required_positional(0)? {
        NaslValue::Number(n) => *n,
        x => return Err(FnError::wrong_unnamed_argument("int", x.type_name())),
    };
    context.script().with_info(|info| info.timeout = timeout);
    Ok(NaslValue::Null)
}

fn script_id(params: &Params, context: &Context) -> NaslResult {
    let id = params.required_positional(0)?.to_number();
    context.script().with_info(|info| info.id = id);
    Ok(NaslValue::Null)
}

fn script_set_attribute(params: &Params, context: &Context) -> NaslResult {
    let name = params
        .named_or_positional("attribute", 0)
        .map(ToString::to_string)
        .ok_or_else(|| FnError::missing_argument("attribute"))?;
    let value = params
        .named_or_positional("value", 1)
        .map(ToString::to_string)
        .unwrap_or_default();
    context
        .script()
        .with_info(|info| info.attributes.insert(name, value));
    Ok(NaslValue::Null)
}

fn script_end_attributes(_: &Params, _: &Context) -> NaslResult {
    Ok(NaslValue::Null)
}

fn script_category(params: &Params, context: &Context) -> NaslResult {
    let category = match params.required_positional(0)? {
        NaslValue::Number(n) if ATTACK_CATEGORIES.iter().any(|(_, c)| c == n) => *n,
        x => return Err(FnError::wrong_unnamed_argument("ACT_* category", &x.to_string())),
    };
    context.script().with_info(|info| info.category = category);
    Ok(NaslValue::Null)
}

fn script_dependencies(params: &Params, context: &Context) -> NaslResult {
    context.script().with_info(|info| {
        for dependency in strings(params) {
            info.add_dependency(&dependency);
        }
    });
    Ok(NaslValue::Null)
}

/// The keyword argument `re` holds a `key=regex` condition; it replaces the
/// plain entry of the same key.
fn script_mandatory_keys(params: &Params, context: &Context) -> NaslResult {
    let mut keys = strings(params);
    if keys.is_empty() {
        return Err(FnError::missing_argument("key"));
    }
    if let Some(re) = params.str_by_name("re") {
        match re.split_once('=') {
            Some((key, _)) => match keys.iter_mut().find(|k| k.as_str() == key) {
                Some(existing) => *existing = re,
                None => keys.push(re),
            },
            None => {
                return Err(ArgumentError::wrong_argument("re", "key=regex", &re).into());
            }
        }
    }
    context
        .script()
        .with_info(|info| info.mandatory_keys.extend(keys));
    Ok(NaslValue::Null)
}

fn script_bugtraq_id(params: &Params, context: &Context) -> NaslResult {
    let ids: Vec<i64> = params
        .positionals()
        .iter()
        .filter(|v| !v.is_null())
        .map(NaslValue::to_number)
        .collect();
    context.script().with_info(|info| info.bugtraq.extend(ids));
    Ok(NaslValue::Null)
}

fn name_and_value(params: &Params) -> Result<(String, String), FnError> {
    let name = params.required_named("name")?.to_string();
    let value = params.required_named("value")?.to_string();
    Ok((name, value))
}

fn script_xref(params: &Params, context: &Context) -> NaslResult {
    let (name, value) = name_and_value(params)?;
    context.script().with_info(|info| info.xrefs.insert(name, value));
    Ok(NaslValue::Null)
}

fn script_tag(params: &Params, context: &Context) -> NaslResult {
    let (name, value) = name_and_value(params)?;
    context.script().with_info(|info| info.tags.insert(name, value));
    Ok(NaslValue::Null)
}

fn script_add_preference(params: &Params, context: &Context) -> NaslResult {
    let name = params.required_named("name")?.to_string();
    let class = params.required_named("type")?.to_string();
    let default = params.get_param_by_name_or("value", "".into()).to_string();
    context
        .script()
        .with_info(|info| info.add_preference(&name, &class, &default));
    Ok(NaslValue::Null)
}

/// Returns the configured value of a preference or its declared default.
fn script_get_preference(params: &Params, context: &Context) -> NaslResult {
    let name = first_string(params)?;
    Ok(context.script().preference(&name).into())
}

/// Like `script_get_preference`, but only for preferences declared with the
/// type `file`.
fn script_get_preference_file_content(params: &Params, context: &Context) -> NaslResult {
    let name = first_string(params)?;
    let is_file = context
        .script()
        .with_info(|info| info.preference(&name).is_some_and(|p| p.class == "file"));
    if !is_file {
        return Ok(NaslValue::Null);
    }
    Ok(context.script().preference(&name).into())
}

fn get_script_oid(_: &Params, context: &Context) -> NaslResult {
    Ok(context.script().script_info().oid.into())
}

pub struct Description;

function_set! {
    Description,
    sync_stateless,
    (
        script_name,
        script_version,
        script_timeout,
        script_copyright,
        script_category,
        script_family,
        script_oid,
        script_id,
        script_summary,
        script_set_attribute,
        script_end_attributes,
        script_dependencies,
        script_require_keys,
        script_mandatory_keys,
        script_require_ports,
        script_require_udp_ports,
        script_exclude_keys,
        script_add_preference,
        script_get_preference,
        script_get_preference_file_content,
        script_cve_id,
        script_bugtraq_id,
        script_xref,
        script_tag,
        get_script_oid,
    )
}
