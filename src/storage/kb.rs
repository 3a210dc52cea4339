// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! The knowledge base scripts use to share findings.

use std::{
    fmt::Display,
    sync::RwLock,
    time::{SystemTime, UNIX_EPOCH},
};

use glob::Pattern;
use indexmap::IndexMap;

use super::StorageError;

/// A value stored under a knowledge base key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum KbItem {
    Number(i64),
    String(String),
}

impl Display for KbItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KbItem::Number(n) => write!(f, "{n}"),
            KbItem::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for KbItem {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for KbItem {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for KbItem {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[derive(Clone, Debug)]
struct Entry {
    item: KbItem,
    /// Unix timestamp in seconds after which the entry is ignored.
    expires: Option<u64>,
}

impl Entry {
    fn is_valid(&self, now: u64) -> bool {
        self.expires.is_none_or(|e| e > now)
    }
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Keys containing a `*` are treated as glob patterns.
pub fn is_pattern(key: &str) -> bool {
    key.contains('*')
}

/// A knowledge base for one host.
///
/// A key holds the list of distinct values added to it, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryKb(RwLock<IndexMap<String, Vec<Entry>>>);

impl InMemoryKb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `item` unless the key already holds it.
    pub fn add(
        &self,
        key: &str,
        item: KbItem,
        expires_in: Option<u64>,
    ) -> Result<(), StorageError> {
        let expires = expires_in.map(|seconds| now() + seconds);
        let mut kb = self.0.write()?;
        let entries = kb.entry(key.to_owned()).or_default();
        match entries.iter_mut().find(|e| e.item == item) {
            Some(existing) => existing.expires = expires,
            None => entries.push(Entry { item, expires }),
        }
        Ok(())
    }

    /// Replaces all values of `key` with `item`.
    pub fn replace(
        &self,
        key: &str,
        item: KbItem,
        expires_in: Option<u64>,
    ) -> Result<(), StorageError> {
        let expires = expires_in.map(|seconds| now() + seconds);
        let mut kb = self.0.write()?;
        kb.insert(key.to_owned(), vec![Entry { item, expires }]);
        Ok(())
    }

    /// Returns the values stored under `key`.
    pub fn get(&self, key: &str) -> Result<Vec<KbItem>, StorageError> {
        let now = now();
        let kb = self.0.read()?;
        Ok(kb
            .get(key)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.is_valid(now))
                    .map(|e| e.item.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Returns every `(key, value)` pair whose key matches the glob `pattern`.
    pub fn get_matching(&self, pattern: &str) -> Result<Vec<(String, KbItem)>, StorageError> {
        let matcher = Pattern::new(pattern).map_err(|e| StorageError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: e.to_string(),
        })?;
        let now = now();
        let kb = self.0.read()?;
        Ok(kb
            .iter()
            .filter(|(key, _)| matcher.matches(key))
            .flat_map(|(key, entries)| {
                entries
                    .iter()
                    .filter(move |e| e.is_valid(now))
                    .map(move |e| (key.clone(), e.item.clone()))
            })
            .collect())
    }

    /// Whether `key` holds at least one value.
    pub fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(!self.get(key)?.is_empty())
    }

    pub fn remove(&self, key: &str) -> Result<Vec<KbItem>, StorageError> {
        let mut kb = self.0.write()?;
        Ok(kb
            .shift_remove(key)
            .map(|entries| entries.into_iter().map(|e| e.item).collect())
            .unwrap_or_default())
    }

    pub fn len(&self) -> usize {
        self.0.read().map(|kb| kb.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
