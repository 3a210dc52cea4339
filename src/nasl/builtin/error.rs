// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuiltinError {
    /// `assert` failed. Fatal.
    #[error("assertion failed: {0}")]
    Assertion(String),
    /// The function is known but has no implementation. Fatal.
    #[error("method `{0}` is not implement")]
    NotImplemented(String),
    #[error("Invalid regular expression: {0}")]
    Regex(String),
    #[error("Invalid pattern: {0}")]
    Pattern(String),
    #[error("{0}")]
    Io(String),
}
