// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! The builtin functions available to every NASL script.
//!
//! Each area lives in its own module containing a function set. The sets are
//! combined by [`nasl_std_functions`] into one [`Executor`]. The names it
//! contains decide at compile time whether a call targets a builtin or a
//! user defined function.

mod array;
mod description;
mod error;
mod host;
mod knowledge_base;
mod misc;
mod operators;
mod regex;
mod report_functions;
mod string;
mod unimplemented;

pub use description::ATTACK_CATEGORIES;
pub use error::BuiltinError;
pub use report_functions::{REPORT_COMMON, REPORT_ERROR, REPORT_SECURITY};

use super::{
    interpreter::NaslValue,
    utils::{Executor, ScriptCtx},
};

/// Creates a new Executor and adds all the functions to it.
pub fn nasl_std_functions() -> Executor {
    let mut executor = Executor::default();
    executor
        .add_set(operators::Operators)
        .add_set(array::Array)
        .add_set(string::NaslString)
        .add_set(regex::RegularExpressions)
        .add_set(knowledge_base::KnowledgeBase)
        .add_set(description::Description)
        .add_set(report_functions::Reporting)
        .add_set(misc::Misc)
        .add_set(host::Host)
        .add_set(unimplemented::Unimplemented);
    executor
}

/// The predefined global variables of a script run: the `ACT_*` categories
/// and `description`, which is true while the metadata is collected.
pub fn nasl_std_variables(script: &ScriptCtx) -> Vec<(&'static str, NaslValue)> {
    ATTACK_CATEGORIES
        .iter()
        .map(|(name, value)| (*name, NaslValue::Number(*value)))
        .chain([(
            "description",
            NaslValue::Boolean(script.is_description_mode()),
        )])
        .collect()
}
