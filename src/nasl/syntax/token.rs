// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Token kinds produced by the tokenizer.
use std::fmt::Display;

use crate::nasl::error::{Span, Spanned};

/// A reserved NASL keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    /// function declaration
    Function,
    /// for
    For,
    /// foreach
    ForEach,
    /// if
    If,
    /// else
    Else,
    /// while
    While,
    /// repeat
    Repeat,
    /// until
    Until,
    /// local_var
    LocalVar,
    /// global_var
    GlobalVar,
    /// return
    Return,
    /// continue
    Continue,
    /// break
    Break,
    /// include
    Include,
    /// exit
    Exit,
}

macro_rules! make_keyword_matcher {
    ($($matcher:ident, $define:expr),+) => {
        impl Keyword {
            /// Creates a new keyword based on a string identifier
            pub fn new(keyword: &str) -> Option<Self> {
                match keyword {
                    $(
                    stringify!($matcher) => Some($define),
                    )*
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for Keyword {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                $(
                    if *self == $define {
                        return write!(f, stringify!($matcher));
                    }
                )*
                Ok(())
            }
        }
    }
}

make_keyword_matcher! {
    function, Keyword::Function,
    for, Keyword::For,
    foreach, Keyword::ForEach,
    if, Keyword::If,
    else, Keyword::Else,
    while, Keyword::While,
    repeat, Keyword::Repeat,
    until, Keyword::Until,
    local_var, Keyword::LocalVar,
    global_var, Keyword::GlobalVar,
    return, Keyword::Return,
    include, Keyword::Include,
    exit, Keyword::Exit,
    continue, Keyword::Continue,
    break, Keyword::Break
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    ident: String,
    span: Span,
}

impl Ident {
    pub fn new(ident: String, span: Span) -> Self {
        Self { ident, span }
    }

    pub fn to_str(&self) -> &str {
        &self.ident
    }
}

impl Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ident)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralKind {
    /// A string enclosed in `"`. Escape sequences are kept undecoded.
    String(String),
    /// A string enclosed in `'`. Escape sequences are kept undecoded.
    Data(String),
    /// A Number can be either binary (0b), octal (0), base10 (1-9) or hex (0x)
    Number(i64),
    Float(f64),
    /// An IPv4 address in dotted notation, evaluates to a string.
    IPv4Address(String),
    Boolean(bool),
    Null,
}

impl LiteralKind {
    pub fn from_keyword(lookup: &str) -> Option<Self> {
        match lookup {
            "NULL" | "Null" => Some(Self::Null),
            "FALSE" => Some(Self::Boolean(false)),
            "TRUE" => Some(Self::Boolean(true)),
            _ => None,
        }
    }
}

impl Display for LiteralKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralKind::String(s) => write!(f, "\"{s}\""),
            LiteralKind::Data(s) => write!(f, "'{s}'"),
            LiteralKind::Number(n) => write!(f, "{n}"),
            LiteralKind::Float(n) => write!(f, "{n}"),
            LiteralKind::IPv4Address(ip) => write!(f, "{ip}"),
            LiteralKind::Boolean(true) => write!(f, "TRUE"),
            LiteralKind::Boolean(false) => write!(f, "FALSE"),
            LiteralKind::Null => write!(f, "NULL"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub span: Span,
}

/// Is used to identify a Token
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `%`
    Percent,
    /// `%=`
    PercentEqual,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `~`
    Tilde,
    /// `^`
    Caret,
    /// `&`
    Ampersand,
    /// `&&`
    AmpersandAmpersand,
    /// `|`
    Pipe,
    /// `||`
    PipePipe,
    /// `!`
    Bang,
    /// `!=`
    BangEqual,
    /// `!~`
    BangTilde,
    /// `=`
    Equal,
    /// `==`
    EqualEqual,
    /// `=~`
    EqualTilde,
    /// `>`
    Greater,
    /// `>>`
    GreaterGreater,
    /// `>=`
    GreaterEqual,
    /// `><`
    GreaterLess,
    /// `<`
    Less,
    /// `<<`
    LessLess,
    /// `<=`
    LessEqual,
    /// `-`
    Minus,
    /// `--`
    MinusMinus,
    /// `-=`
    MinusEqual,
    /// `+`
    Plus,
    /// `+=`
    PlusEqual,
    /// `++`
    PlusPlus,
    /// `/`
    Slash,
    /// `/=`
    SlashEqual,
    /// `*`
    Star,
    /// `**`
    StarStar,
    /// `*=`
    StarEqual,
    /// `>>>`
    GreaterGreaterGreater,
    /// `>>=`
    GreaterGreaterEqual,
    /// `<<<`
    LessLessLess,
    /// `<<=`
    LessLessEqual,
    /// `<<<=`
    LessLessLessEqual,
    /// `>!<`
    GreaterBangLess,
    /// `>>>=`
    GreaterGreaterGreaterEqual,
    /// `x` repeats the expression on its left, e.g. `send_packet(udp) x 200;`
    X,
    Literal(LiteralKind),
    Keyword(Keyword),
    Ident(String),
    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Percent => "%",
            TokenKind::PercentEqual => "%=",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Tilde => "~",
            TokenKind::Caret => "^",
            TokenKind::Ampersand => "&",
            TokenKind::AmpersandAmpersand => "&&",
            TokenKind::Pipe => "|",
            TokenKind::PipePipe => "||",
            TokenKind::Bang => "!",
            TokenKind::BangEqual => "!=",
            TokenKind::BangTilde => "!~",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::EqualTilde => "=~",
            TokenKind::Greater => ">",
            TokenKind::GreaterGreater => ">>",
            TokenKind::GreaterEqual => ">=",
            TokenKind::GreaterLess => "><",
            TokenKind::Less => "<",
            TokenKind::LessLess => "<<",
            TokenKind::LessEqual => "<=",
            TokenKind::Minus => "-",
            TokenKind::MinusMinus => "--",
            TokenKind::MinusEqual => "-=",
            TokenKind::Plus => "+",
            TokenKind::PlusEqual => "+=",
            TokenKind::PlusPlus => "++",
            TokenKind::Slash => "/",
            TokenKind::SlashEqual => "/=",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::StarEqual => "*=",
            TokenKind::GreaterGreaterGreater => ">>>",
            TokenKind::GreaterGreaterEqual => ">>=",
            TokenKind::LessLessLess => "<<<",
            TokenKind::LessLessEqual => "<<=",
            TokenKind::LessLessLessEqual => "<<<=",
            TokenKind::GreaterBangLess => ">!<",
            TokenKind::GreaterGreaterGreaterEqual => ">>>=",
            TokenKind::X => "x",
            TokenKind::Literal(literal) => return write!(f, "{literal}"),
            TokenKind::Keyword(kw) => return write!(f, "{kw}"),
            TokenKind::Ident(ident) => return write!(f, "{ident}"),
            TokenKind::Eof => "end of file",
        };
        write!(f, "{symbol}")
    }
}

/// Contains the TokenType as well as the position.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'", self.kind)
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for Literal {
    fn span(&self) -> Span {
        self.span
    }
}
