// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

pub mod builtin;
pub mod code;
pub mod compiler;
pub mod engine;
pub mod error;
pub mod interpreter;
pub mod syntax;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub mod prelude {
    pub use super::code::{CodeUnit, FunctionCode, Instruction, OpCode, Position, SlotId};
    pub use super::compiler::{CompileError, CompileOptions, Compiler, SymbolTable};
    pub use super::engine::{EngineConfig, EngineError, ExecutionOutcome, ScriptEngine};
    pub use super::interpreter::{
        ExitSignal, InterpretError, InterpretErrorKind, Interpreter, InterpreterOptions, Interrupt,
        NaslArray, NaslValue,
    };
    pub use super::syntax::{LoadError, Loader};
    pub use super::utils::ArgumentError;
    pub use super::utils::Context;
    pub use super::utils::FnError;
    pub use super::utils::FnErrorKind;
    pub use super::utils::NaslResult;
    pub use super::utils::Params;
    pub use super::utils::ScriptCtx;
    pub use super::utils::ScriptInfo;
    pub use crate::function_set;
}

pub use prelude::*;

pub use builtin::nasl_std_functions;

#[cfg(test)]
mod test_prelude {
    pub use super::prelude::*;
    pub use super::test_utils::TestBuilder;
    pub use super::test_utils::check_code_result;
    pub use crate::check_code_result_matches;
    pub use crate::check_err_matches;
}
