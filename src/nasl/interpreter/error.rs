// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::fmt::Display;

use thiserror::Error;

use super::nasl_array::ArrayError;
use crate::nasl::{
    code::Position, compiler::CompileError, syntax::LoadError, utils::error::FnErrorKind,
};

#[derive(Debug, Clone, Error)]
/// An error that occurred while calling a builtin function, which could not
/// be tolerated.
#[error("Error while calling function '{function}': {kind}")]
pub struct FunctionCallError {
    pub function: String,
    pub kind: FnErrorKind,
}

impl FunctionCallError {
    pub fn new(function: &str, kind: FnErrorKind) -> Self {
        Self {
            function: function.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum InterpretErrorKind {
    #[error("cannot support op1[{lhs}] {op} op2[{rhs}]")]
    UnsupportedOperation {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("cannot support {op} op1[{operand}]")]
    UnsupportedUnary {
        op: &'static str,
        operand: &'static str,
    },
    #[error("Division by zero.")]
    DivisionByZero,
    #[error("Strings longer than {0} bytes are not supported.")]
    StringTooLong(usize),
    #[error("{0}")]
    Array(#[from] ArrayError),
    #[error("undefined method `{0}`")]
    UndefinedFunction(String),
    #[error("A value of type {0} is not callable.")]
    NotCallable(&'static str),
    #[error("{0}")]
    FunctionCall(#[from] FunctionCallError),
    #[error("Include file names must end with .inc, got {0}.")]
    InvalidIncludeName(String),
    #[error("{0}")]
    Load(#[from] LoadError),
    #[error("{0}")]
    Compile(#[from] CompileError),
    #[error("Maximum call depth of {0} exceeded.")]
    CallDepthExceeded(usize),
    #[error("Operand stack underflow.")]
    StackUnderflow,
    #[error("Expected an assignable reference.")]
    ExpectedReference,
    #[error("Expected an iterator, found {0}.")]
    ExpectedIterator(&'static str),
}

/// A fault within the VM. Faults abort the current script.
#[derive(Debug, Clone, Error)]
pub struct InterpretError {
    pub kind: InterpretErrorKind,
    pub position: Option<Position>,
}

impl Display for InterpretError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.position {
            Some(position) => write!(f, "{position}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl InterpretError {
    pub fn new(kind: InterpretErrorKind, position: Option<Position>) -> Self {
        Self { kind, position }
    }
}

impl From<InterpretErrorKind> for InterpretError {
    fn from(kind: InterpretErrorKind) -> Self {
        Self {
            kind,
            position: None,
        }
    }
}

/// Raised by `exit()`. Not an error: the script ended on purpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitSignal {
    pub code: i64,
    pub message: Option<String>,
}

impl Display for ExitSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "exit({}): {message}", self.code),
            None => write!(f, "exit({})", self.code),
        }
    }
}

/// Unwinds the VM.
#[derive(Debug, Clone, Error)]
pub enum Interrupt {
    #[error("{0}")]
    Exit(ExitSignal),
    #[error("{0}")]
    Fault(#[from] InterpretError),
}

impl From<InterpretErrorKind> for Interrupt {
    fn from(kind: InterpretErrorKind) -> Self {
        Self::Fault(kind.into())
    }
}

impl Interrupt {
    pub fn fault_kind(&self) -> Option<&InterpretErrorKind> {
        match self {
            Interrupt::Exit(_) => None,
            Interrupt::Fault(e) => Some(&e.kind),
        }
    }
}
