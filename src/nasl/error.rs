// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{Buffer, ColorChoice, StandardStream};

pub type SourceFile = SimpleFile<String, String>;

/// A point within a source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location {
    /// Byte offset into the source
    pub byte: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// Creates a span covering both `self` and `other`.
    pub fn join(self, other: Span) -> Self {
        Self {
            start: self.start,
            end: other.end,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start.byte..self.end.byte
    }
}

pub trait Spanned {
    fn span(&self) -> Span;
}

pub trait AsCodespanError {
    fn span(&self) -> Span;
    fn message(&self) -> String;
}

fn diagnostic<T: AsCodespanError>(err: &T) -> Diagnostic<()> {
    Diagnostic::error()
        .with_message(err.message())
        .with_labels(vec![
            Label::primary((), err.span().range()).with_message(err.message()),
        ])
}

/// Writes the given errors to stderr.
pub fn emit_errors<'a, T: AsCodespanError + 'a>(
    file: &SourceFile,
    errs: impl Iterator<Item = &'a T>,
) {
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let config = term::Config::default();
    for err in errs {
        if let Err(e) = term::emit(&mut writer.lock(), &config, file, &diagnostic(err)) {
            tracing::warn!(%e, "unable to render diagnostic");
        }
    }
}

/// Renders the given errors into a string without colors.
pub fn emit_errors_str<'a, T: AsCodespanError + 'a>(
    file: &SourceFile,
    errs: impl Iterator<Item = &'a T>,
) -> String {
    let mut writer = Buffer::no_color();
    let config = term::Config::default();
    for err in errs {
        if let Err(e) = term::emit(&mut writer, &config, file, &diagnostic(err)) {
            tracing::warn!(%e, "unable to render diagnostic");
        }
    }
    String::from_utf8_lossy(writer.as_slice()).into_owned()
}
