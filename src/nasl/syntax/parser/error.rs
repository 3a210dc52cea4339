// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use thiserror::Error;

use crate::nasl::{
    error::{AsCodespanError, Span},
    syntax::{
        token::{Keyword, TokenKind},
        tokenizer::{TokenizerError, TokenizerErrorKind},
    },
};

#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseErrorKind {
    pub fn to_error(self, span: Span) -> ParseError {
        ParseError { span, kind: self }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("Expected '{0}'.")]
    TokenExpected(TokenKind),
    #[error("Expected expression.")]
    ExpressionExpected,
    #[error("Unexpected keyword '{0}'.")]
    UnexpectedKeyword(Keyword),
    #[error("Unexpected token '{0}'.")]
    UnexpectedToken(TokenKind),
    #[error("Expected identifier.")]
    IdentExpected,
    #[error("Error during tokenization: {0}")]
    Tokenizer(TokenizerErrorKind),
}

impl From<TokenizerError> for ParseError {
    fn from(e: TokenizerError) -> Self {
        Self {
            kind: ParseErrorKind::Tokenizer(e.kind),
            span: e.span,
        }
    }
}

impl AsCodespanError for ParseError {
    fn span(&self) -> Span {
        self.span
    }

    fn message(&self) -> String {
        self.kind.to_string()
    }
}
