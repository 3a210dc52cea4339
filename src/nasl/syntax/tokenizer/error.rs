// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use thiserror::Error;

use crate::nasl::error::{AsCodespanError, Span};

#[derive(Clone, Debug, PartialEq)]
pub struct TokenizerError {
    pub kind: TokenizerErrorKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TokenizerErrorKind {
    #[error("Unexpected character '{0}'.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string literal.")]
    UnterminatedStringLiteral,
    #[error("Failed to parse number literal. {0}")]
    WrongNumberLiteral(String),
    #[error("Invalid IPv4 address.")]
    IllegalIPv4Address,
}

impl AsCodespanError for TokenizerError {
    fn span(&self) -> Span {
        self.span
    }

    fn message(&self) -> String {
        self.kind.to_string()
    }
}
