// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::sync::Arc;

use super::NaslValue;

/// The iterator behind `foreach`.
///
/// Takes a snapshot of the collection when created, so assignments to the
/// iterated variable within the loop body do not change the iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct NaslIterator {
    items: Arc<[NaslValue]>,
    position: usize,
}

impl NaslIterator {
    /// Arrays yield their defined values, numeric side first. Undefined yields
    /// nothing and any other value yields itself once.
    pub fn over(value: &NaslValue) -> Self {
        let items: Arc<[NaslValue]> = match value {
            NaslValue::Array(arr) => arr.values().filter(|v| !v.is_null()).cloned().collect(),
            NaslValue::Null => Arc::new([]),
            NaslValue::Iterator(it) => it.items[it.position..].into(),
            x => Arc::new([x.clone()]),
        };
        Self { items, position: 0 }
    }

    /// Returns the next value and whether there was one.
    pub fn next_value(&mut self) -> (NaslValue, bool) {
        match self.items.get(self.position) {
            Some(value) => {
                self.position += 1;
                (value.clone(), true)
            }
            None => (NaslValue::Null, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nasl::interpreter::NaslArray;

    #[test]
    fn iterates_numeric_then_hash_values() {
        let mut arr = NaslArray::from_list(vec![1.into(), NaslValue::Null, 3.into()]);
        arr.add_ele_to_array("k", "v".into());
        let mut it = NaslIterator::over(&arr.into());
        assert_eq!(it.next_value(), (1.into(), true));
        assert_eq!(it.next_value(), (3.into(), true));
        assert_eq!(it.next_value(), ("v".into(), true));
        assert_eq!(it.next_value(), (NaslValue::Null, false));
        assert_eq!(it.next_value(), (NaslValue::Null, false));
    }

    #[test]
    fn undefined_and_scalars() {
        assert_eq!(
            NaslIterator::over(&NaslValue::Null).next_value(),
            (NaslValue::Null, false)
        );
        let mut it = NaslIterator::over(&5.into());
        assert_eq!(it.next_value(), (5.into(), true));
        assert!(!it.next_value().1);
    }
}
