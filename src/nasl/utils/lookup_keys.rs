// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Names of internally used symbols and pseudo builtins.

/// _FCT_ANON_ARGS is used to gather unnamed parameter within a function call
pub const FC_ANON_ARGS: &str = "_FCT_ANON_ARGS";

/// Prefix of the root scope symbol a user defined function is stored in.
pub const FUNCTION_PREFIX: &str = "__function__";

/// The pseudo builtin turning a collection into a `foreach` iterator.
pub const NEW_ITERATOR: &str = "__NewIterator";
