// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! A Pratt parser producing the [`Ast`](super::grammar::Ast).

mod cursor;
pub mod error;
#[cfg(test)]
mod tests;

use cursor::Cursor;
use error::{ParseError, ParseErrorKind};

use super::{
    grammar::{
        Argument, AssignmentOperator, Ast, BinaryOperator, Call, Expr, ExprKind, For, Foreach,
        FunctionDecl, If, IncrementOperator, POSTFIX_BINDING_POWER, REPEAT_BINDING_POWER, Repeat,
        Statement, StatementKind, UnaryPrefixOperator, VarScope, VarScopeDecl, While,
    },
    token::{Ident, Keyword, Token, TokenKind},
};
use crate::nasl::error::{Location, Span, Spanned};

type Result<T, E = ParseErrorKind> = std::result::Result<T, E>;

pub trait Parse: Sized {
    fn parse(parser: &mut Parser) -> Result<Self>;
}

pub trait Matches: Sized {
    fn matches(kind: &TokenKind) -> bool;

    fn peek(parser: &Parser) -> bool {
        Self::matches(parser.cursor.peek().kind())
    }

    fn peek_next(parser: &Parser) -> bool {
        Self::matches(parser.cursor.peek_next().kind())
    }
}

pub struct Parser {
    cursor: Cursor,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            cursor: Cursor::new(tokens),
        }
    }

    pub fn parse<T: Parse>(&mut self) -> Result<T, ParseError> {
        T::parse(self).map_err(|err| err.to_error(self.cursor.peek().span()))
    }

    /// Parses all statements, collecting every error instead of stopping
    /// at the first one.
    pub fn parse_program(&mut self) -> Result<Ast, Vec<ParseError>> {
        let mut stmts = vec![];
        let mut errs = vec![];
        while !self.is_at_end() {
            match self.parse::<Statement>() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    errs.push(err);
                    self.synchronize();
                }
            }
        }
        if errs.is_empty() {
            Ok(Ast::new(stmts))
        } else {
            Err(errs)
        }
    }

    fn synchronize(&mut self) {
        while !self.is_at_end() {
            let token = self.advance();
            if matches!(token.kind, TokenKind::Semicolon | TokenKind::RightBrace) {
                return;
            }
            if let TokenKind::Keyword(
                Keyword::LocalVar | Keyword::GlobalVar | Keyword::Function | Keyword::If,
            ) = self.cursor.peek().kind
            {
                return;
            }
        }
    }

    fn advance(&mut self) -> Token {
        self.cursor.advance()
    }

    fn peek(&self) -> &TokenKind {
        self.cursor.peek().kind()
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek() == kind
    }

    fn consume(&mut self, expected: TokenKind) -> Result<Token> {
        if self.cursor.peek().kind != expected {
            Err(ParseErrorKind::TokenExpected(expected))
        } else {
            Ok(self.advance())
        }
    }

    fn consume_pat<T>(
        &mut self,
        predicate: impl Fn(&TokenKind) -> Option<T>,
        e: ParseErrorKind,
    ) -> Result<T> {
        if let Some(t) = predicate(self.cursor.peek().kind()) {
            self.advance();
            Ok(t)
        } else {
            Err(e)
        }
    }

    /// Consumes the token if it matches.
    fn eat(&mut self, kind: TokenKind) -> bool {
        let found = self.check(&kind);
        if found {
            self.advance();
        }
        found
    }

    fn is_at_end(&self) -> bool {
        self.cursor.peek().kind == TokenKind::Eof
    }

    fn start(&self) -> Location {
        self.cursor.current_token_start()
    }

    fn span_from(&self, start: Location) -> Span {
        Span::new(start, self.cursor.previous_token_end())
    }

    /// Parses `( expr )`.
    fn parenthesized(&mut self) -> Result<Expr> {
        self.consume(TokenKind::LeftParen)?;
        let expr = Expr::parse(self)?;
        self.consume(TokenKind::RightParen)?;
        Ok(expr)
    }

    /// Parses a comma separated list of `T` until `end`, consuming `end`.
    fn list<T>(&mut self, end: TokenKind, mut item: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let mut items = vec![];
        while !self.check(&end) {
            items.push(item(self)?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.consume(end)?;
        Ok(items)
    }

    fn block(&mut self) -> Result<Vec<Statement>> {
        self.consume(TokenKind::LeftBrace)?;
        let mut stmts = vec![];
        while !self.check(&TokenKind::RightBrace) {
            if self.is_at_end() {
                return Err(ParseErrorKind::TokenExpected(TokenKind::RightBrace));
            }
            stmts.push(Statement::parse(self)?);
        }
        self.advance();
        Ok(stmts)
    }

    fn statement_kind(&mut self) -> Result<StatementKind> {
        let keyword = match self.peek() {
            TokenKind::Semicolon => {
                self.advance();
                return Ok(StatementKind::NoOp);
            }
            TokenKind::LeftBrace => return Ok(StatementKind::Block(self.block()?)),
            TokenKind::Keyword(keyword) => *keyword,
            _ => {
                let expr = Expr::parse(self)?;
                self.consume(TokenKind::Semicolon)?;
                return Ok(StatementKind::Expr(expr));
            }
        };
        self.advance();
        let kind = match keyword {
            Keyword::If => {
                let condition = self.parenthesized()?;
                let if_branch = Box::new(Statement::parse(self)?);
                let else_branch = if self.eat(TokenKind::Keyword(Keyword::Else)) {
                    Some(Box::new(Statement::parse(self)?))
                } else {
                    None
                };
                StatementKind::If(If {
                    condition,
                    if_branch,
                    else_branch,
                })
            }
            Keyword::While => {
                let condition = self.parenthesized()?;
                let block = Box::new(Statement::parse(self)?);
                StatementKind::While(While { condition, block })
            }
            Keyword::For => {
                self.consume(TokenKind::LeftParen)?;
                let initializer = self.optional_expr(TokenKind::Semicolon)?;
                let condition = self.optional_expr(TokenKind::Semicolon)?;
                let increment = self.optional_expr(TokenKind::RightParen)?;
                let block = Box::new(Statement::parse(self)?);
                StatementKind::For(For {
                    initializer,
                    condition,
                    increment,
                    block,
                })
            }
            Keyword::ForEach => {
                let var = Ident::parse(self)?;
                let array = self.parenthesized()?;
                let block = Box::new(Statement::parse(self)?);
                StatementKind::Foreach(Foreach { var, array, block })
            }
            Keyword::Repeat => {
                let block = Box::new(Statement::parse(self)?);
                self.consume(TokenKind::Keyword(Keyword::Until))?;
                let condition = Expr::parse(self)?;
                self.consume(TokenKind::Semicolon)?;
                StatementKind::Repeat(Repeat { block, condition })
            }
            Keyword::Function => {
                let name = Ident::parse(self)?;
                self.consume(TokenKind::LeftParen)?;
                let params = self.list(TokenKind::RightParen, Ident::parse)?;
                let block = self.block()?;
                StatementKind::FunctionDecl(FunctionDecl {
                    name,
                    params,
                    block,
                })
            }
            Keyword::LocalVar | Keyword::GlobalVar => {
                let scope = if keyword == Keyword::LocalVar {
                    VarScope::Local
                } else {
                    VarScope::Global
                };
                let mut idents = vec![];
                loop {
                    let ident = Ident::parse(self)?;
                    let init = if self.eat(TokenKind::Equal) {
                        Some(Expr::parse_with_binding_power(self, 2)?)
                    } else {
                        None
                    };
                    idents.push((ident, init));
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.consume(TokenKind::Semicolon)?;
                StatementKind::VarScopeDecl(VarScopeDecl { scope, idents })
            }
            Keyword::Return => {
                let expr = self.optional_expr(TokenKind::Semicolon)?;
                StatementKind::Return(expr)
            }
            Keyword::Break => {
                self.consume(TokenKind::Semicolon)?;
                StatementKind::Break
            }
            Keyword::Continue => {
                self.consume(TokenKind::Semicolon)?;
                StatementKind::Continue
            }
            Keyword::Include => {
                let expr = self.parenthesized()?;
                self.consume(TokenKind::Semicolon)?;
                StatementKind::Include(expr)
            }
            Keyword::Exit => {
                self.consume(TokenKind::LeftParen)?;
                let args = self.list(TokenKind::RightParen, Expr::parse)?;
                self.consume(TokenKind::Semicolon)?;
                StatementKind::Exit(args)
            }
            Keyword::Else | Keyword::Until => {
                return Err(ParseErrorKind::UnexpectedKeyword(keyword));
            }
        };
        Ok(kind)
    }

    /// Parses an optional expression followed by `end`, consuming `end`.
    fn optional_expr(&mut self, end: TokenKind) -> Result<Option<Expr>> {
        if self.eat(end.clone()) {
            return Ok(None);
        }
        let expr = Expr::parse(self)?;
        self.consume(end)?;
        Ok(Some(expr))
    }
}

impl Parse for Statement {
    fn parse(parser: &mut Parser) -> Result<Statement> {
        let start = parser.start();
        let kind = parser.statement_kind()?;
        Ok(Statement {
            kind,
            span: parser.span_from(start),
        })
    }
}

impl Parse for Expr {
    fn parse(parser: &mut Parser) -> Result<Expr> {
        pratt_parse_expr(parser, 0)
    }
}

impl Expr {
    fn parse_with_binding_power(parser: &mut Parser, min_bp: usize) -> Result<Expr> {
        pratt_parse_expr(parser, min_bp)
    }
}

fn parse_argument(parser: &mut Parser) -> Result<Argument> {
    if Ident::peek(parser) && parser.cursor.peek_next().kind == TokenKind::Colon {
        let name = Ident::parse(parser)?;
        parser.advance();
        Ok(Argument::Named(name, Expr::parse(parser)?))
    } else {
        Ok(Argument::Positional(Expr::parse(parser)?))
    }
}

fn parse_prefix(parser: &mut Parser) -> Result<ExprKind> {
    if let Some(op) = UnaryPrefixOperator::convert(parser.peek()) {
        parser.advance();
        let rhs = pratt_parse_expr(parser, op.right_binding_power())?;
        return Ok(ExprKind::Unary {
            op,
            rhs: Box::new(rhs),
        });
    }
    if let Some(op) = IncrementOperator::convert(parser.peek()) {
        parser.advance();
        let target = pratt_parse_expr(parser, IncrementOperator::binding_power())?;
        return Ok(ExprKind::Increment {
            op,
            prefix: true,
            target: Box::new(target),
        });
    }
    let token = parser.advance();
    let span = token.span();
    match token.kind {
        TokenKind::Literal(literal) => Ok(ExprKind::Literal(literal)),
        TokenKind::Ident(name) => {
            let callee = Ident::new(name, span);
            if parser.eat(TokenKind::LeftParen) {
                let args = parser.list(TokenKind::RightParen, parse_argument)?;
                Ok(ExprKind::Call(Call { callee, args }))
            } else {
                Ok(ExprKind::Ident(callee))
            }
        }
        TokenKind::LeftParen => {
            let expr = Expr::parse(parser)?;
            parser.consume(TokenKind::RightParen)?;
            Ok(expr.kind)
        }
        TokenKind::LeftBracket => Ok(ExprKind::Array(
            parser.list(TokenKind::RightBracket, Expr::parse)?,
        )),
        TokenKind::Keyword(keyword) => Err(ParseErrorKind::UnexpectedKeyword(keyword)),
        _ => Err(ParseErrorKind::ExpressionExpected),
    }
}

fn pratt_parse_expr(parser: &mut Parser, min_bp: usize) -> Result<Expr> {
    let start = parser.start();
    let kind = parse_prefix(parser)?;
    let mut lhs = Expr {
        kind,
        span: parser.span_from(start),
    };

    loop {
        let kind = parser.peek().clone();
        let new_kind = if let Some(op) = BinaryOperator::convert(&kind) {
            let (l_bp, r_bp) = op.binding_power();
            if l_bp < min_bp {
                break;
            }
            parser.advance();
            let rhs = pratt_parse_expr(parser, r_bp)?;
            ExprKind::Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            }
        } else if let Some(op) = AssignmentOperator::convert(&kind) {
            let (l_bp, r_bp) = AssignmentOperator::binding_power();
            if l_bp < min_bp {
                break;
            }
            parser.advance();
            let rhs = pratt_parse_expr(parser, r_bp)?;
            ExprKind::Assign {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            }
        } else if let Some(op) = IncrementOperator::convert(&kind) {
            if POSTFIX_BINDING_POWER < min_bp {
                break;
            }
            parser.advance();
            ExprKind::Increment {
                op,
                prefix: false,
                target: Box::new(lhs),
            }
        } else {
            match kind {
                TokenKind::LeftBracket => {
                    if POSTFIX_BINDING_POWER < min_bp {
                        break;
                    }
                    parser.advance();
                    let index = Expr::parse(parser)?;
                    parser.consume(TokenKind::RightBracket)?;
                    ExprKind::Index {
                        base: Box::new(lhs),
                        index: Box::new(index),
                    }
                }
                TokenKind::Dot => {
                    if POSTFIX_BINDING_POWER < min_bp {
                        break;
                    }
                    parser.advance();
                    let field = Ident::parse(parser)?;
                    ExprKind::Field {
                        base: Box::new(lhs),
                        field,
                    }
                }
                TokenKind::X => {
                    let (l_bp, r_bp) = REPEAT_BINDING_POWER;
                    if l_bp < min_bp {
                        break;
                    }
                    parser.advance();
                    let count = pratt_parse_expr(parser, r_bp)?;
                    ExprKind::Repeat {
                        expr: Box::new(lhs),
                        count: Box::new(count),
                    }
                }
                _ => break,
            }
        };
        lhs = Expr {
            kind: new_kind,
            span: parser.span_from(start),
        };
    }
    Ok(lhs)
}

impl Parse for Ident {
    fn parse(parser: &mut Parser) -> Result<Self> {
        let span = parser.cursor.peek().span();
        parser.consume_pat(
            |kind| match kind {
                TokenKind::Ident(name) => Some(Ident::new(name.clone(), span)),
                _ => None,
            },
            ParseErrorKind::IdentExpected,
        )
    }
}

impl Matches for Ident {
    fn matches(kind: &TokenKind) -> bool {
        matches!(kind, TokenKind::Ident(_))
    }
}
