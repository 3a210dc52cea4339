// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Storage shared between script runs on the same host.

pub mod error;
pub mod kb;

pub use error::StorageError;
pub use kb::{InMemoryKb, KbItem};
