// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception


use crate::nasl::prelude::*;
use crate::storage::{KbItem, kb::is_pattern};

impl From<KbItem> for NaslValue {
    fn from(item: KbItem) -> Self {
        match item {
            KbItem::Number(n) => NaslValue::Number(n),
            KbItem::String(s) => NaslValue::String(s),
        }
    }
}

/// Integers are stored as they are, everything else as its string form.
fn kb_item(value: &NaslValue) -> KbItem {
    match value {
        NaslValue::Number(n) => KbItem::Number(*n),
        NaslValue::Boolean(b) => KbItem::Number(*b as i64),
        x => KbItem::String(x.to_string()),
    }
}

struct Item {
    name: String,
    value: KbItem,
    expires: Option<u64>,
}

impl Item {
    fn new(params: &Params) -> Result<Self, FnError> {
        let name = params.required_named("name")?.to_string();
        let value = kb_item(params.required_named("value")?);
        let expires = params
            .int_by_name("expires")
            .and_then(|e| u64::try_from(e).ok());
        Ok(Self {
            name,
            value,
            expires,
        })
    }
}

/// NASL function to set a value under name in a knowledge base
/// Only pushes unique values for the given name.
fn set_kb_item(params: &Params, c: &Context) -> NaslResult {
    let item = Item::new(params)?;
    c.kb().add(&item.name, item.value, item.expires)?;
    Ok(NaslValue::Null)
}

/// NASL function to replace all values of a kb item
fn replace_kb_item(params: &Params, c: &Context) -> NaslResult {
    let item = Item::new(params)?;
    c.kb().replace(&item.name, item.value, item.expires)?;
    Ok(NaslValue::Null)
}

/// NASL function to get the first value stored under a key.
fn get_kb_item(params: &Params, c: &Context) -> NaslResult {
    let key = params.required_positional(0)?.to_string();
    Ok(c
        .kb()
        .get(&key)?
        .into_iter()
        .next()
        .map(NaslValue::from)
        .unwrap_or_default())
}

/// NASL function to retrieve the items of a key.
///
/// For a pattern containing `*` an array of each matching key and its first
/// value is returned, otherwise a list of all values of the key.
fn get_kb_list(params: &Params, c: &Context) -> NaslResult {
    let key = params.required_positional(0)?.to_string();
    if !is_pattern(&key) {
        let values = c.kb().get(&key)?.into_iter().map(NaslValue::from).collect();
        return Ok(NaslValue::list(values));
    }
    let mut result = NaslArray::new();
    for (key, item) in c.kb().get_matching(&key)? {
        if result.get_ele_by_key(&key).is_none() {
            result.add_ele_to_array(&key, item.into());
        }
    }
    Ok(NaslValue::array(result))
}

pub struct KnowledgeBase;

function_set! {
    KnowledgeBase,
    sync_stateless,
    (
        set_kb_item,
        replace_kb_item,
        get_kb_item,
        get_kb_list,
    )
}
