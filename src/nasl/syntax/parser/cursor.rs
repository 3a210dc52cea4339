// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use crate::nasl::{
    error::{Location, Span, Spanned},
    syntax::token::{Token, TokenKind},
};

/// Walks over the tokens of a file. The last token is always `Eof`.
pub struct Cursor {
    tokens: Vec<Token>,
    position: usize,
    previous_end: Location,
}

impl Cursor {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let end = tokens.last().map(|t| t.span().end).unwrap_or_default();
            tokens.push(Token::new(TokenKind::Eof, Span::new(end, end)));
        }
        Self {
            tokens,
            position: 0,
            previous_end: Location::default(),
        }
    }

    fn token_at(&self, position: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[position.min(last)]
    }

    pub fn peek(&self) -> &Token {
        self.token_at(self.position)
    }

    pub fn peek_next(&self) -> &Token {
        self.token_at(self.position + 1)
    }

    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        self.previous_end = token.span().end;
        token
    }

    /// The start of the current token.
    pub fn current_token_start(&self) -> Location {
        self.peek().span().start
    }

    /// The end of the previously consumed token.
    pub fn previous_token_end(&self) -> Location {
        self.previous_end
    }
}
