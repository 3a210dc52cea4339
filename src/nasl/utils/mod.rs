// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! The interface between the interpreter and builtin functions.

pub mod context;
pub mod error;
mod executor;
pub mod hosts;
pub mod lookup_keys;
pub mod params;
pub mod script_info;

pub use context::{Context, ResultKind, ScanResult, ScriptCtx, Target};
pub use error::{ArgumentError, FnError, FnErrorKind, InternalError};
pub use executor::{Executor, IntoFunctionSet, NaslFunction, StoredFunctionSet};
pub use params::Params;
pub use script_info::{ScriptInfo, ScriptPreference};

/// The result of a function call.
pub type NaslResult = Result<crate::nasl::interpreter::NaslValue, FnError>;
