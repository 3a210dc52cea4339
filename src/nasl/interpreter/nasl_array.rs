// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! NASL's combined list and map type.
//!
//! A NASL array holds numerically indexed elements and string keyed
//! elements side by side. The two sides never overlap: `a[1]` and `a["1"]`
//! are different elements.

use std::fmt::Display;

use indexmap::IndexMap;
use thiserror::Error;

use super::NaslValue;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArrayError {
    #[error("Negative index {0} is not allowed.")]
    NegativeIndex(i64),
}

/// The key of an element within a [`NaslArray`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Index(usize),
    Key(String),
}

impl ArrayKey {
    /// Ints (and bools or undefined) index the list, everything else the map.
    pub fn from_value(value: &NaslValue) -> Result<Self, ArrayError> {
        match value {
            NaslValue::Number(n) => Self::index(*n),
            NaslValue::Boolean(b) => Ok(Self::Index(*b as usize)),
            NaslValue::Null => Ok(Self::Index(0)),
            NaslValue::Float(f) => Self::index(*f as i64),
            NaslValue::String(s) => Ok(Self::Key(s.clone())),
            x => Ok(Self::Key(x.to_string())),
        }
    }

    fn index(n: i64) -> Result<Self, ArrayError> {
        usize::try_from(n)
            .map(Self::Index)
            .map_err(|_| ArrayError::NegativeIndex(n))
    }
}

impl Display for ArrayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArrayKey::Index(i) => write!(f, "{i}"),
            ArrayKey::Key(k) => write!(f, "{k}"),
        }
    }
}

impl From<ArrayKey> for NaslValue {
    fn from(key: ArrayKey) -> Self {
        match key {
            ArrayKey::Index(i) => NaslValue::from(i),
            ArrayKey::Key(k) => NaslValue::String(k),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NaslArray {
    /// Next numeric insertion index
    max_idx: usize,
    num_elt: Vec<NaslValue>,
    hash_elt: IndexMap<String, NaslValue>,
}

impl NaslArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_list(values: Vec<NaslValue>) -> Self {
        Self {
            max_idx: values.len(),
            num_elt: values,
            hash_elt: IndexMap::new(),
        }
    }

    /// Stores `value` at numeric index `idx`, growing the list with undefined
    /// values when `idx` lies beyond its end.
    pub fn add_ele_to_list(&mut self, idx: i64, value: NaslValue) -> Result<(), ArrayError> {
        let idx = usize::try_from(idx).map_err(|_| ArrayError::NegativeIndex(idx))?;
        *self.slot_at(idx) = value;
        Ok(())
    }

    pub fn add_ele_to_array(&mut self, key: &str, value: NaslValue) {
        self.hash_elt.insert(key.to_owned(), value);
    }

    /// Appends `value` at the next numeric index.
    pub fn push(&mut self, value: NaslValue) {
        let idx = self.max_idx;
        *self.slot_at(idx) = value;
    }

    fn slot_at(&mut self, idx: usize) -> &mut NaslValue {
        if idx >= self.num_elt.len() {
            self.num_elt.resize(idx + 1, NaslValue::Null);
        }
        self.max_idx = self.max_idx.max(idx + 1);
        &mut self.num_elt[idx]
    }

    pub fn get_ele_by_index(&self, idx: usize) -> Option<&NaslValue> {
        self.num_elt.get(idx)
    }

    pub fn get_ele_by_key(&self, key: &str) -> Option<&NaslValue> {
        self.hash_elt.get(key)
    }

    pub fn get(&self, key: &ArrayKey) -> Option<&NaslValue> {
        match key {
            ArrayKey::Index(i) => self.get_ele_by_index(*i),
            ArrayKey::Key(k) => self.get_ele_by_key(k),
        }
    }

    /// Returns the element for `key`, creating an undefined one if missing.
    pub fn entry(&mut self, key: &ArrayKey) -> &mut NaslValue {
        match key {
            ArrayKey::Index(i) => self.slot_at(*i),
            ArrayKey::Key(k) => self.hash_elt.entry(k.clone()).or_default(),
        }
    }

    pub fn set(&mut self, key: &ArrayKey, value: NaslValue) {
        *self.entry(key) = value;
    }

    /// Numeric indices in ascending order followed by the string keys in
    /// insertion order.
    pub fn keys(&self) -> Vec<ArrayKey> {
        (0..self.num_elt.len())
            .map(ArrayKey::Index)
            .chain(self.hash_elt.keys().cloned().map(ArrayKey::Key))
            .collect()
    }

    /// Values in [`NaslArray::keys`] order.
    pub fn values(&self) -> impl Iterator<Item = &NaslValue> {
        self.num_elt.iter().chain(self.hash_elt.values())
    }

    pub fn entries(&self) -> impl Iterator<Item = (ArrayKey, &NaslValue)> {
        self.num_elt
            .iter()
            .enumerate()
            .map(|(i, v)| (ArrayKey::Index(i), v))
            .chain(
                self.hash_elt
                    .iter()
                    .map(|(k, v)| (ArrayKey::Key(k.clone()), v)),
            )
    }

    pub fn max_idx(&self) -> usize {
        self.max_idx
    }

    pub fn num_elt(&self) -> &[NaslValue] {
        &self.num_elt
    }

    pub fn num_elt_mut(&mut self) -> &mut Vec<NaslValue> {
        &mut self.num_elt
    }

    pub fn hash_elt(&self) -> &IndexMap<String, NaslValue> {
        &self.hash_elt
    }

    pub fn len(&self) -> usize {
        self.num_elt.len() + self.hash_elt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl FromIterator<NaslValue> for NaslArray {
    fn from_iter<T: IntoIterator<Item = NaslValue>>(iter: T) -> Self {
        Self::from_list(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_grows_with_gaps() {
        let mut arr = NaslArray::new();
        arr.add_ele_to_list(3, 7.into()).unwrap();
        assert_eq!(arr.max_idx(), 4);
        assert_eq!(
            arr.num_elt(),
            &[NaslValue::Null, NaslValue::Null, NaslValue::Null, 7.into()]
        );
        arr.add_ele_to_list(1, 2.into()).unwrap();
        assert_eq!(arr.max_idx(), 4);
        assert_eq!(arr.get_ele_by_index(1), Some(&NaslValue::Number(2)));
    }

    #[test]
    fn negative_index_is_rejected() {
        let mut arr = NaslArray::new();
        assert_eq!(
            arr.add_ele_to_list(-1, 1.into()),
            Err(ArrayError::NegativeIndex(-1))
        );
        assert_eq!(
            ArrayKey::from_value(&NaslValue::Number(-2)),
            Err(ArrayError::NegativeIndex(-2))
        );
    }

    #[test]
    fn string_keys_do_not_touch_the_list() {
        let mut arr = NaslArray::from_list(vec![1.into()]);
        arr.add_ele_to_array("1", "one".into());
        assert_eq!(arr.max_idx(), 1);
        assert_eq!(arr.get_ele_by_index(1), None);
        assert_eq!(arr.get_ele_by_key("1"), Some(&NaslValue::from("one")));
    }

    #[test]
    fn keys_are_numeric_then_inserted_strings() {
        let mut arr = NaslArray::new();
        arr.add_ele_to_array("zeta", 1.into());
        arr.push(2.into());
        arr.add_ele_to_array("alpha", 3.into());
        arr.push(4.into());
        assert_eq!(
            arr.keys(),
            vec![
                ArrayKey::Index(0),
                ArrayKey::Index(1),
                ArrayKey::Key("zeta".into()),
                ArrayKey::Key("alpha".into()),
            ]
        );
        let values: Vec<_> = arr.values().cloned().collect();
        assert_eq!(values, vec![2.into(), 4.into(), 1.into(), 3.into()]);
    }

    #[test]
    fn copy_is_independent() {
        let mut arr = NaslArray::from_list(vec![1.into()]);
        let copy = arr.copy();
        arr.push(2.into());
        assert_eq!(copy.len(), 1);
        assert_eq!(arr.len(), 2);
    }
}
