// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

mod error;

use super::token::{Keyword, LiteralKind, Token, TokenKind};
use crate::nasl::error::{Location, Span};
pub use error::{TokenizerError, TokenizerErrorKind};

struct Cursor {
    chars: Vec<char>,
    position: usize,
    location: Location,
}

impl Cursor {
    fn new(code: &str) -> Self {
        Self {
            chars: code.chars().collect(),
            position: 0,
            location: Location {
                byte: 0,
                line: 1,
                column: 1,
            },
        }
    }

    fn is_at_eof(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> char {
        self.peek_ahead(0)
    }

    fn peek_ahead(&self, ahead: usize) -> char {
        const EOF_CHAR: char = '\0';
        self.chars
            .get(self.position + ahead)
            .copied()
            .unwrap_or(EOF_CHAR)
    }

    fn advance(&mut self) -> Option<char> {
        let result = self.chars.get(self.position).copied()?;
        self.position += 1;
        self.location.byte += result.len_utf8();
        if result == '\n' {
            self.location.line += 1;
            self.location.column = 1;
        } else {
            self.location.column += 1;
        }
        Some(result)
    }

    /// Skips characters while given predicate returns true
    fn skip_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while !self.is_at_eof() && predicate(self.peek()) {
            self.advance();
        }
    }
}

/// Identifies if number is base10, base 8, hex or binary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberBase {
    /// Base 2: contains 01 is defined by 0b e.g.: `0b010101`
    Binary,
    /// Base 8: contains 0-7 is defined by a starting 0 e.g.: `012345670`
    Octal,
    /// Base 10: contains 0-9 is the default e.g.: `1234567890`
    Base10,
    /// Base 16: contains 0-9A-F is defined by a starting 0x e.g.: `0x123456789ABCDEF0`
    Hex,
}

impl NumberBase {
    fn verifier(self) -> fn(char) -> bool {
        match self {
            Self::Binary => |c| c == '0' || c == '1',
            Self::Octal => |c| ('0'..='7').contains(&c),
            Self::Base10 => |c| c.is_ascii_digit(),
            Self::Hex => |c| c.is_ascii_hexdigit(),
        }
    }

    pub fn radix(&self) -> u32 {
        match self {
            NumberBase::Binary => 2,
            NumberBase::Octal => 8,
            NumberBase::Base10 => 10,
            NumberBase::Hex => 16,
        }
    }
}

/// Tokenizer uses a cursor to create tokens
pub struct Tokenizer {
    cursor: Cursor,
    start: Location,
    start_position: usize,
}

// Is used to simplify cases for two symbol tokens, e.g.
// '+' => two_symbol_token!(self.cursor, Plus, '+', PlusPlus, '=', PlusEqual),
macro_rules! two_symbol_token {
    ($cursor:expr, $single_symbol:tt, $($matching_char:tt, $two_symbol_token:expr ), *) => {
        {
            match $cursor.peek() {
                $($matching_char => {
                  $cursor.advance();
                  $two_symbol_token
                }, )*
                _ => $single_symbol,
            }
        }
    };
}

impl Tokenizer {
    /// Splits `code` into tokens, the last one is always [`TokenKind::Eof`].
    pub fn tokenize(code: &str) -> Result<Vec<Token>, Vec<TokenizerError>> {
        let mut tokenizer = Tokenizer {
            cursor: Cursor::new(code),
            start: Location::default(),
            start_position: 0,
        };
        let mut tokens = vec![];
        let mut errors = vec![];
        loop {
            tokenizer.cursor.skip_while(char::is_whitespace);
            if tokenizer.cursor.peek() == '#' {
                tokenizer.cursor.skip_while(|c| c != '\n');
                continue;
            }
            tokenizer.start = tokenizer.cursor.location;
            tokenizer.start_position = tokenizer.cursor.position;
            let Some(current) = tokenizer.cursor.advance() else {
                break;
            };
            match tokenizer.scan_token(current) {
                Ok(kind) => tokens.push(Token::new(kind, tokenizer.span())),
                Err(kind) => errors.push(TokenizerError {
                    kind,
                    span: tokenizer.span(),
                }),
            }
        }
        let end = tokenizer.cursor.location;
        tokens.push(Token::new(TokenKind::Eof, Span::new(end, end)));
        if errors.is_empty() {
            Ok(tokens)
        } else {
            Err(errors)
        }
    }

    fn span(&self) -> Span {
        Span::new(self.start, self.cursor.location)
    }

    fn substring_from(&self, start: usize) -> String {
        self.cursor.chars[start..self.cursor.position].iter().collect()
    }

    // > can be parsed to >>>, >>=, >>>=, >!<
    fn tokenize_greater(&mut self) -> TokenKind {
        use TokenKind::*;
        match self.cursor.peek() {
            '=' => {
                self.cursor.advance();
                GreaterEqual
            }
            '<' => {
                self.cursor.advance();
                GreaterLess
            }
            '>' => {
                self.cursor.advance();
                match self.cursor.peek() {
                    '>' => {
                        self.cursor.advance();
                        if self.cursor.peek() == '=' {
                            self.cursor.advance();
                            return GreaterGreaterGreaterEqual;
                        }
                        GreaterGreaterGreater
                    }
                    '=' => {
                        self.cursor.advance();
                        GreaterGreaterEqual
                    }
                    _ => GreaterGreater,
                }
            }
            '!' if self.cursor.peek_ahead(1) == '<' => {
                self.cursor.advance();
                self.cursor.advance();
                GreaterBangLess
            }
            _ => Greater,
        }
    }

    // < can be parsed to <<, <<=, <<<, <<<=
    fn tokenize_less(&mut self) -> TokenKind {
        use TokenKind::*;
        match self.cursor.peek() {
            '=' => {
                self.cursor.advance();
                LessEqual
            }
            '<' => {
                self.cursor.advance();
                match self.cursor.peek() {
                    '=' => {
                        self.cursor.advance();
                        LessLessEqual
                    }
                    '<' => {
                        self.cursor.advance();
                        if self.cursor.peek() == '=' {
                            self.cursor.advance();
                            return LessLessLessEqual;
                        }
                        LessLessLess
                    }
                    _ => LessLess,
                }
            }
            _ => Less,
        }
    }

    // A backslash protects the following character in `'` strings only.
    fn tokenize_string(&mut self, quote: char) -> Result<TokenKind, TokenizerErrorKind> {
        let start = self.cursor.position;
        let mut back_slash = false;
        self.cursor.skip_while(|c| {
            if !back_slash && c == quote {
                false
            } else {
                back_slash = quote == '\'' && !back_slash && c == '\\';
                true
            }
        });
        if self.cursor.is_at_eof() {
            return Err(TokenizerErrorKind::UnterminatedStringLiteral);
        }
        let raw = self.substring_from(start);
        self.cursor.advance();
        Ok(TokenKind::Literal(if quote == '"' {
            LiteralKind::String(raw)
        } else {
            LiteralKind::Data(raw)
        }))
    }

    fn skip_digits(&mut self) -> bool {
        let before = self.cursor.position;
        self.cursor.skip_while(|c| c.is_ascii_digit());
        self.cursor.position != before
    }

    // Called after a base 10 number followed by `.` and a digit.
    fn tokenize_float_or_ipv4(&mut self, start: usize) -> Result<TokenKind, TokenizerErrorKind> {
        self.cursor.advance();
        self.skip_digits();
        if self.cursor.peek() != '.' {
            let literal = self.substring_from(start);
            return literal
                .parse::<f64>()
                .map(|f| TokenKind::Literal(LiteralKind::Float(f)))
                .map_err(|e| TokenizerErrorKind::WrongNumberLiteral(e.to_string()));
        }
        for _ in 0..2 {
            if self.cursor.peek() != '.' || !self.cursor.peek_ahead(1).is_ascii_digit() {
                self.cursor
                    .skip_while(|c| c.is_ascii_alphanumeric() || c == '.');
                return Err(TokenizerErrorKind::IllegalIPv4Address);
            }
            self.cursor.advance();
            self.skip_digits();
        }
        let address = self.substring_from(start);
        if address.parse::<std::net::Ipv4Addr>().is_err() {
            return Err(TokenizerErrorKind::IllegalIPv4Address);
        }
        Ok(TokenKind::Literal(LiteralKind::IPv4Address(address)))
    }

    // checks if a number is binary, octal, base10 or hex
    fn tokenize_number(&mut self, current: char) -> Result<TokenKind, TokenizerErrorKind> {
        use NumberBase::*;
        let mut start = self.start_position;
        let base = if current == '0' {
            match self.cursor.peek() {
                'b' | 'B' => {
                    self.cursor.advance();
                    start += 2;
                    Binary
                }
                'x' | 'X' => {
                    self.cursor.advance();
                    start += 2;
                    Hex
                }
                peeked if ('0'..='7').contains(&peeked) => {
                    start += 1;
                    Octal
                }
                _ => Base10,
            }
        } else {
            Base10
        };
        self.cursor.skip_while(base.verifier());
        if base == Base10 && self.cursor.peek() == '.' && self.cursor.peek_ahead(1).is_ascii_digit()
        {
            return self.tokenize_float_or_ipv4(start);
        }
        let digits = self.substring_from(start);
        let trailing = self.cursor.peek();
        if trailing.is_ascii_alphanumeric() || trailing == '_' {
            self.cursor.skip_while(|c| c.is_ascii_alphanumeric() || c == '_');
            return Err(TokenizerErrorKind::WrongNumberLiteral(format!(
                "Invalid character '{trailing}' in {base:?} number."
            )));
        }
        if digits.is_empty() {
            return Err(TokenizerErrorKind::WrongNumberLiteral(format!(
                "Missing digits in {base:?} number."
            )));
        }
        i64::from_str_radix(&digits, base.radix())
            .map(|n| TokenKind::Literal(LiteralKind::Number(n)))
            .map_err(|e| TokenizerErrorKind::WrongNumberLiteral(e.to_string()))
    }

    // Checks if an identifier is a Keyword or not
    fn tokenize_identifier(&mut self) -> TokenKind {
        self.cursor
            .skip_while(|c| c.is_alphanumeric() || c == '_');
        let lookup = self.substring_from(self.start_position);
        if lookup == "x" {
            let mut ahead = 0;
            while self.cursor.peek_ahead(ahead).is_whitespace() {
                ahead += 1;
            }
            if ahead > 0 && self.cursor.peek_ahead(ahead).is_ascii_digit() {
                return TokenKind::X;
            }
        }
        if let Some(keyword) = Keyword::new(&lookup) {
            TokenKind::Keyword(keyword)
        } else if let Some(literal) = LiteralKind::from_keyword(&lookup) {
            TokenKind::Literal(literal)
        } else {
            TokenKind::Ident(lookup)
        }
    }

    fn scan_token(&mut self, current: char) -> Result<TokenKind, TokenizerErrorKind> {
        use TokenKind::*;
        let kind = match current {
            '(' => LeftParen,
            ')' => RightParen,
            '[' => LeftBracket,
            ']' => RightBracket,
            '{' => LeftBrace,
            '}' => RightBrace,
            ',' => Comma,
            '.' => Dot,
            '-' => two_symbol_token!(self.cursor, Minus, '-', MinusMinus, '=', MinusEqual),
            '+' => two_symbol_token!(self.cursor, Plus, '+', PlusPlus, '=', PlusEqual),
            '%' => two_symbol_token!(self.cursor, Percent, '=', PercentEqual),
            ';' => Semicolon,
            '/' => two_symbol_token!(self.cursor, Slash, '=', SlashEqual),
            '*' => two_symbol_token!(self.cursor, Star, '*', StarStar, '=', StarEqual),
            ':' => Colon,
            '~' => Tilde,
            '&' => two_symbol_token!(self.cursor, Ampersand, '&', AmpersandAmpersand),
            '|' => two_symbol_token!(self.cursor, Pipe, '|', PipePipe),
            '^' => Caret,
            '!' => two_symbol_token!(self.cursor, Bang, '=', BangEqual, '~', BangTilde),
            '=' => two_symbol_token!(self.cursor, Equal, '=', EqualEqual, '~', EqualTilde),
            '>' => self.tokenize_greater(),
            '<' => self.tokenize_less(),
            '"' | '\'' => return self.tokenize_string(current),
            c if c.is_ascii_digit() => return self.tokenize_number(c),
            c if c.is_alphabetic() || c == '_' => self.tokenize_identifier(),
            c => return Err(TokenizerErrorKind::UnexpectedCharacter(c)),
        };
        Ok(kind)
    }
}
