// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! The arguments of a builtin call.
//!
//! NASL functions accept positional and keyword arguments at the same time.
//! An undefined argument counts as missing in every lookup.

use indexmap::IndexMap;

use super::error::ArgumentError;
use crate::nasl::interpreter::NaslValue;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params {
    positional: Vec<NaslValue>,
    named: IndexMap<String, NaslValue>,
}

impl Params {
    pub fn new(positional: Vec<NaslValue>, named: IndexMap<String, NaslValue>) -> Self {
        Self { positional, named }
    }

    pub fn from_positionals(positional: Vec<NaslValue>) -> Self {
        Self {
            positional,
            named: IndexMap::new(),
        }
    }

    pub fn positionals(&self) -> &[NaslValue] {
        &self.positional
    }

    pub fn named(&self) -> impl Iterator<Item = (&str, &NaslValue)> {
        self.named.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get_param_by_number(&self, idx: usize) -> Option<&NaslValue> {
        self.positional.get(idx).filter(|v| !v.is_null())
    }

    pub fn get_param_by_name(&self, name: &str) -> Option<&NaslValue> {
        self.named.get(name).filter(|v| !v.is_null())
    }

    pub fn get_param_by_number_or(&self, idx: usize, default: NaslValue) -> NaslValue {
        self.get_param_by_number(idx).cloned().unwrap_or(default)
    }

    pub fn get_param_by_name_or(&self, name: &str, default: NaslValue) -> NaslValue {
        self.get_param_by_name(name).cloned().unwrap_or(default)
    }

    /// Looks up a keyword argument, falling back to a positional one.
    pub fn named_or_positional(&self, name: &str, idx: usize) -> Option<&NaslValue> {
        self.get_param_by_name(name)
            .or_else(|| self.get_param_by_number(idx))
    }

    pub fn required_named(&self, name: &str) -> Result<&NaslValue, ArgumentError> {
        self.get_param_by_name(name)
            .ok_or_else(|| ArgumentError::MissingNamed(vec![name.to_owned()]))
    }

    pub fn required_positional(&self, idx: usize) -> Result<&NaslValue, ArgumentError> {
        self.get_param_by_number(idx)
            .ok_or(ArgumentError::MissingPositionals {
                expected: idx + 1,
                got: self.positional.len(),
            })
    }

    pub fn str_by_name(&self, name: &str) -> Option<String> {
        self.get_param_by_name(name).map(ToString::to_string)
    }

    pub fn int_by_name(&self, name: &str) -> Option<i64> {
        self.get_param_by_name(name).map(NaslValue::to_number)
    }

    pub fn bool_by_name(&self, name: &str, default: bool) -> bool {
        self.get_param_by_name(name)
            .map(NaslValue::to_bool)
            .unwrap_or(default)
    }

    /// Fails when more than `max` positional arguments are given.
    pub fn max_positionals(&self, max: usize) -> Result<(), ArgumentError> {
        if self.positional.len() > max {
            return Err(ArgumentError::TrailingPositionals {
                expected: max,
                got: self.positional.len(),
            });
        }
        Ok(())
    }

    /// Fails on keyword arguments other than `allowed`.
    pub fn allowed_named(&self, allowed: &[&str]) -> Result<(), ArgumentError> {
        match self.named.keys().find(|k| !allowed.contains(&k.as_str())) {
            Some(unexpected) => Err(ArgumentError::UnexpectedArgument(unexpected.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Params {
        let mut named = IndexMap::new();
        named.insert("sep".to_owned(), NaslValue::from(","));
        named.insert("empty".to_owned(), NaslValue::Null);
        Params::new(vec![1.into(), NaslValue::Null, "x".into()], named)
    }

    #[test]
    fn undefined_counts_as_missing() {
        let p = params();
        assert_eq!(p.get_param_by_number(0), Some(&NaslValue::from(1)));
        assert_eq!(p.get_param_by_number(1), None);
        assert_eq!(p.get_param_by_name("empty"), None);
        assert_eq!(p.get_param_by_name_or("empty", 5.into()), NaslValue::from(5));
        assert_eq!(p.positionals().len(), 3);
    }

    #[test]
    fn keyword_before_positional() {
        let p = params();
        assert_eq!(p.named_or_positional("sep", 2), Some(&NaslValue::from(",")));
        assert_eq!(p.named_or_positional("other", 2), Some(&NaslValue::from("x")));
    }

    #[test]
    fn argument_checks() {
        let p = params();
        assert_eq!(
            p.max_positionals(1),
            Err(ArgumentError::TrailingPositionals {
                expected: 1,
                got: 3
            })
        );
        assert_eq!(
            p.allowed_named(&["sep"]),
            Err(ArgumentError::UnexpectedArgument("empty".to_owned()))
        );
        assert_eq!(
            p.required_named("missing"),
            Err(ArgumentError::MissingNamed(vec!["missing".to_owned()]))
        );
    }
}
