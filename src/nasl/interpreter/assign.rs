// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::sync::Arc;

use super::{ArrayKey, InterpretErrorKind, Interpreter, NaslArray, NaslValue, Place};

impl Interpreter<'_> {
    /// Reads through a place. Missing elements and indexing into a
    /// non array yield undefined.
    pub(super) fn read(&self, place: &Place) -> Result<NaslValue, InterpretErrorKind> {
        let Some(mut current) = self.slots.get(place.slot) else {
            return Ok(NaslValue::Null);
        };
        for index in &place.path {
            let NaslValue::Array(arr) = current else {
                return Ok(NaslValue::Null);
            };
            match arr.get(&ArrayKey::from_value(index)?) {
                Some(value) => current = value,
                None => return Ok(NaslValue::Null),
            }
        }
        Ok(current.clone())
    }

    /// Writes through a place. Undefined or scalar values on the way are
    /// replaced by empty arrays, shared arrays are copied first.
    pub(super) fn write(&mut self, place: &Place, value: NaslValue) -> Result<(), InterpretErrorKind> {
        let keys = place
            .path
            .iter()
            .map(ArrayKey::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        let mut target = self.slot_mut(place.slot);
        for key in &keys {
            if !matches!(target, NaslValue::Array(_)) {
                *target = NaslValue::array(NaslArray::new());
            }
            target = match target {
                NaslValue::Array(arr) => Arc::make_mut(arr).entry(key),
                _ => return Err(InterpretErrorKind::ExpectedReference),
            };
        }
        *target = value;
        Ok(())
    }
}
