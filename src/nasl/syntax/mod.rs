// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Tokenizer, parser and loader of NASL source code.

pub mod grammar;
mod loader;
pub mod parser;
pub mod token;
pub mod tokenizer;

pub use grammar::Ast;
pub use loader::{EmbeddedSource, LoadError, Loader};
pub use parser::{
    Parser,
    error::{ParseError, ParseErrorKind},
};
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::{Tokenizer, TokenizerError};

/// Tokenizes and parses `code`. All tokenizer errors are reported before
/// parsing starts.
pub fn parse(code: &str) -> Result<Ast, Vec<ParseError>> {
    let tokens = Tokenizer::tokenize(code)
        .map_err(|errs| errs.into_iter().map(ParseError::from).collect::<Vec<_>>())?;
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    #[test]
    fn use_parser() {
        let code = "a = 23;b = 1;";
        let expected = ["a = 23;", "b = 1;"];
        for (i, stmt) in super::parse(code).unwrap().into_iter().enumerate() {
            assert_eq!(&code[stmt.span.range()], expected[i]);
        }
    }

    #[test]
    fn tokenizer_errors_are_reported() {
        let errs = super::parse("a = '1;\n").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].kind.to_string().contains("Unterminated"));
    }
}
