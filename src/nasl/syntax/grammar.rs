// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! The abstract syntax tree handed from the parser to the compiler.

use std::vec;

use super::token::{Ident, LiteralKind, TokenKind};
use crate::nasl::error::Span;

#[derive(Clone, Debug, Default)]
pub struct Ast {
    stmts: Vec<Statement>,
}

impl IntoIterator for Ast {
    type Item = Statement;

    type IntoIter = vec::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.stmts.into_iter()
    }
}

impl Ast {
    pub fn new(stmts: Vec<Statement>) -> Self {
        Self { stmts }
    }

    pub fn stmts(&self) -> &[Statement] {
        &self.stmts
    }
}

#[derive(Clone, Debug)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum StatementKind {
    /// `;`
    NoOp,
    Expr(Expr),
    Block(Vec<Statement>),
    If(If),
    While(While),
    For(For),
    Repeat(Repeat),
    Foreach(Foreach),
    FunctionDecl(FunctionDecl),
    VarScopeDecl(VarScopeDecl),
    Return(Option<Expr>),
    Break,
    Continue,
    Include(Expr),
    Exit(Vec<Expr>),
}

#[derive(Clone, Debug)]
pub struct If {
    pub condition: Expr,
    pub if_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
}

#[derive(Clone, Debug)]
pub struct While {
    pub condition: Expr,
    pub block: Box<Statement>,
}

#[derive(Clone, Debug)]
pub struct For {
    pub initializer: Option<Expr>,
    pub condition: Option<Expr>,
    pub increment: Option<Expr>,
    pub block: Box<Statement>,
}

#[derive(Clone, Debug)]
pub struct Repeat {
    pub block: Box<Statement>,
    pub condition: Expr,
}

#[derive(Clone, Debug)]
pub struct Foreach {
    pub var: Ident,
    pub array: Expr,
    pub block: Box<Statement>,
}

#[derive(Clone, Debug)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub block: Vec<Statement>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarScope {
    Local,
    Global,
}

#[derive(Clone, Debug)]
pub struct VarScopeDecl {
    pub scope: VarScope,
    pub idents: Vec<(Ident, Option<Expr>)>,
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Literal(LiteralKind),
    Ident(Ident),
    /// `[a, b, c]`
    Array(Vec<Expr>),
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    /// `a.b`
    Field {
        base: Box<Expr>,
        field: Ident,
    },
    Call(Call),
    Unary {
        op: UnaryPrefixOperator,
        rhs: Box<Expr>,
    },
    Increment {
        op: IncrementOperator,
        prefix: bool,
        target: Box<Expr>,
    },
    Binary {
        lhs: Box<Expr>,
        op: BinaryOperator,
        rhs: Box<Expr>,
    },
    Assign {
        lhs: Box<Expr>,
        op: AssignmentOperator,
        rhs: Box<Expr>,
    },
    /// `expr x count`
    Repeat {
        expr: Box<Expr>,
        count: Box<Expr>,
    },
}

#[derive(Clone, Debug)]
pub struct Call {
    pub callee: Ident,
    pub args: Vec<Argument>,
}

#[derive(Clone, Debug)]
pub enum Argument {
    Positional(Expr),
    Named(Ident, Expr),
}

macro_rules! make_operator {
    ($ty: ident, ($($pat: ident$(,)?),*)) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $ty {
            $(
                $pat,
            )*
        }

        impl $ty {
            pub fn convert(kind: &TokenKind) -> Option<Self> {
                match kind {
                    $(
                        TokenKind::$pat => Some(Self::$pat),
                    )*
                    _ => None,
                }
            }
        }
    }
}

make_operator! {
    UnaryPrefixOperator,
    (
        Minus,
        Bang,
        Plus,
        Tilde,
    )
}

make_operator! {
    IncrementOperator,
    (
        PlusPlus,
        MinusMinus,
    )
}

make_operator! {
    AssignmentOperator,
    (
        Equal,
        MinusEqual,
        PlusEqual,
        SlashEqual,
        StarEqual,
        PercentEqual,
        LessLessEqual,
        GreaterGreaterEqual,
        LessLessLessEqual,
        GreaterGreaterGreaterEqual,
    )
}

make_operator! {
    BinaryOperator,
    (
        Plus,
        Minus,
        Star,
        Slash,
        Percent,
        BangEqual,
        EqualEqual,
        BangTilde,
        EqualTilde,
        Greater,
        GreaterGreater,
        GreaterLess,
        GreaterEqual,
        Less,
        LessLess,
        LessEqual,
        GreaterGreaterGreater,
        LessLessLess,
        GreaterBangLess,
        Ampersand,
        AmpersandAmpersand,
        Caret,
        Pipe,
        PipePipe,
        StarStar,
    )
}

impl BinaryOperator {
    pub fn binding_power(&self) -> (usize, usize) {
        use BinaryOperator::*;
        match self {
            StarStar => (22, 23),
            Star | Slash | Percent => (20, 21),
            Plus | Minus => (18, 19),
            LessLess | GreaterGreater | GreaterGreaterGreater | LessLessLess => (16, 17),
            Ampersand => (14, 15),
            Caret => (12, 13),
            Pipe => (10, 11),
            Less | LessEqual | Greater | GreaterEqual | EqualEqual | BangEqual | GreaterLess
            | GreaterBangLess | EqualTilde | BangTilde => (8, 9),
            AmpersandAmpersand => (6, 7),
            PipePipe => (4, 5),
        }
    }
}

impl AssignmentOperator {
    /// Assignments are right associative and bind weakest.
    pub fn binding_power() -> (usize, usize) {
        (2, 1)
    }
}

/// Binding power of the `x` operator.
pub const REPEAT_BINDING_POWER: (usize, usize) = (3, 4);

impl UnaryPrefixOperator {
    pub fn right_binding_power(&self) -> usize {
        21
    }
}

impl IncrementOperator {
    pub fn binding_power() -> usize {
        21
    }
}

/// Binding power of indexing, member access and postfix increments.
pub const POSTFIX_BINDING_POWER: usize = 24;

impl Expr {
    /// Whether this expression can be assigned to.
    pub fn is_place(&self) -> bool {
        match &self.kind {
            ExprKind::Ident(_) => true,
            ExprKind::Index { base, .. } | ExprKind::Field { base, .. } => base.is_place(),
            _ => false,
        }
    }
}
