// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::fmt::Display;

use codespan_reporting::files::SimpleFile;
use thiserror::Error;

use super::symbol_table::SymbolError;
use crate::nasl::{
    error::{AsCodespanError, Span, emit_errors, emit_errors_str},
    syntax::{ParseError, ParseErrorKind},
};

#[derive(Clone, Debug, PartialEq, Error)]
pub enum CompileErrorKind {
    #[error("{0}")]
    Parse(ParseErrorKind),
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("increment expression must be identifier")]
    InvalidIncrementTarget,
    #[error("{0}")]
    Symbol(#[from] SymbolError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub kind: CompileErrorKind,
    pub span: Span,
}

impl From<ParseError> for Diagnostic {
    fn from(e: ParseError) -> Self {
        Self {
            kind: CompileErrorKind::Parse(e.kind),
            span: e.span,
        }
    }
}

impl AsCodespanError for Diagnostic {
    fn span(&self) -> Span {
        self.span
    }

    fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// All errors found while compiling one file.
#[derive(Clone, Debug, Error)]
pub struct CompileError {
    pub file: SimpleFile<String, String>,
    pub errors: Vec<Diagnostic>,
}

impl CompileError {
    pub fn new(name: &str, code: &str, errors: Vec<Diagnostic>) -> Self {
        Self {
            file: SimpleFile::new(name.to_owned(), code.to_owned()),
            errors,
        }
    }

    pub fn kinds(&self) -> impl Iterator<Item = &CompileErrorKind> {
        self.errors.iter().map(|e| &e.kind)
    }

    /// Renders the errors with source snippets to stderr.
    pub fn emit(&self) {
        emit_errors(&self.file, self.errors.iter());
    }

    /// Renders the errors with source snippets.
    pub fn render(&self) -> String {
        emit_errors_str(&self.file, self.errors.iter())
    }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.file.name();
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{name}:{}:{}: {}",
                e.span.start.line, e.span.start.column, e.kind
            )?;
        }
        Ok(())
    }
}
