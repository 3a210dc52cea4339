// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Defines function error kinds
use thiserror::Error;

use crate::nasl::{builtin::BuiltinError, interpreter::NaslValue};
use crate::storage::StorageError;

#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct FnError {
    #[source]
    pub kind: FnErrorKind,
    return_value: Option<NaslValue>,
}

impl FnError {
    /// The value the call yields when the error is tolerated.
    pub fn return_value(&self) -> &Option<NaslValue> {
        &self.return_value
    }

    /// Fatal errors abort the script instead of being logged.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            FnErrorKind::Builtin(BuiltinError::Assertion(_) | BuiltinError::NotImplemented(_))
        )
    }

    pub fn with_return_value(mut self, value: impl Into<NaslValue>) -> Self {
        self.return_value = Some(value.into());
        self
    }

    /// Helper function to quickly construct a `WrongArgument` variant
    /// for a positional argument.
    pub fn wrong_unnamed_argument(expected: &str, got: &str) -> Self {
        ArgumentError::WrongArgument(format!("Expected {expected} but {got}")).into()
    }

    /// Helper function to quickly construct a `MissingArguments` variant
    /// for a single missing argument.
    pub fn missing_argument(val: &str) -> Self {
        ArgumentError::MissingNamed(vec![val.to_string()]).into()
    }
}

impl From<FnErrorKind> for FnError {
    fn from(kind: FnErrorKind) -> Self {
        FnError {
            kind,
            return_value: None,
        }
    }
}

macro_rules! from_kind {
    ($($ty: ty),*) => {
        $(
            impl From<$ty> for FnError {
                fn from(value: $ty) -> Self {
                    FnErrorKind::from(value).into()
                }
            }
        )*
    };
}

from_kind!(ArgumentError, BuiltinError, InternalError, StorageError);

#[derive(Debug, Clone, Error)]
/// Descriptive kind of error that can occur while calling a function
pub enum FnErrorKind {
    #[error("{0}")]
    Argument(#[from] ArgumentError),
    #[error("{0}")]
    Builtin(#[from] BuiltinError),
    #[error("{0}")]
    Internal(#[from] InternalError),
}

impl From<StorageError> for FnErrorKind {
    fn from(value: StorageError) -> Self {
        FnErrorKind::Internal(InternalError::Storage(value))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgumentError {
    #[error("Expected {expected} but got {got}")]
    MissingPositionals { expected: usize, got: usize },
    #[error("Expected {expected} but got {got}")]
    TrailingPositionals { expected: usize, got: usize },
    #[error("Missing arguments: {}", .0.join(", "))]
    MissingNamed(Vec<String>),
    #[error("Unknown named argument given to function: {}", .0)]
    UnexpectedArgument(String),
    #[error("Function was called with wrong arguments: {0}")]
    WrongArgument(String),
}

impl ArgumentError {
    /// Helper function to quickly construct a `WrongArgument` variant
    /// containing the name of the argument, the expected value and
    /// the actual value.
    pub fn wrong_argument(key: &str, expected: &str, got: &str) -> Self {
        ArgumentError::WrongArgument(format!("Expected {key} to be {expected} but it is {got}"))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InternalError {
    #[error("{0}")]
    Storage(#[from] StorageError),
}

impl TryFrom<FnError> for ArgumentError {
    type Error = ();

    fn try_from(value: FnError) -> Result<Self, Self::Error> {
        match value.kind {
            FnErrorKind::Argument(e) => Ok(e),
            _ => Err(()),
        }
    }
}

impl TryFrom<FnError> for BuiltinError {
    type Error = ();

    fn try_from(value: FnError) -> Result<Self, Self::Error> {
        match value.kind {
            FnErrorKind::Builtin(e) => Ok(e),
            _ => Err(()),
        }
    }
}
