// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::sync::PoisonError;

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum StorageError {
    /// A lock was poisoned by a panicking writer.
    #[error("Unexpected issue: {0}")]
    Dirty(String),
    #[error("Invalid key pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl<S> From<PoisonError<S>> for StorageError {
    fn from(value: PoisonError<S>) -> Self {
        Self::Dirty(format!("{value:?}"))
    }
}
