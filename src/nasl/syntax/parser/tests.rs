// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use super::*;
use crate::nasl::syntax::{Tokenizer, token::LiteralKind};

fn parse_ok(code: &str) -> Vec<Statement> {
    let tokens = Tokenizer::tokenize(code).unwrap();
    Parser::new(tokens)
        .parse_program()
        .unwrap()
        .into_iter()
        .collect()
}

fn parse_err(code: &str) -> Vec<ParseErrorKind> {
    let tokens = Tokenizer::tokenize(code).unwrap();
    Parser::new(tokens)
        .parse_program()
        .unwrap_err()
        .into_iter()
        .map(|e| e.kind)
        .collect()
}

fn expr(code: &str) -> Expr {
    match parse_ok(code).remove(0).kind {
        StatementKind::Expr(expr) => expr,
        kind => panic!("expected expression statement, got {kind:?}"),
    }
}

fn number(expr: &Expr) -> i64 {
    match expr.kind {
        ExprKind::Literal(LiteralKind::Number(n)) => n,
        ref kind => panic!("expected number, got {kind:?}"),
    }
}

#[test]
fn precedence() {
    let ExprKind::Binary { lhs, op, rhs } = expr("1 + 2 * 3;").kind else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOperator::Plus);
    assert_eq!(number(&lhs), 1);
    assert!(matches!(
        rhs.kind,
        ExprKind::Binary {
            op: BinaryOperator::Star,
            ..
        }
    ));
}

#[test]
fn left_associative_binary() {
    let ExprKind::Binary { lhs, rhs, .. } = expr("1 - 2 - 3;").kind else {
        panic!("expected binary");
    };
    assert!(matches!(lhs.kind, ExprKind::Binary { .. }));
    assert_eq!(number(&rhs), 3);
}

#[test]
fn assignment_is_right_associative() {
    let ExprKind::Assign { lhs, rhs, .. } = expr("a = b = 1;").kind else {
        panic!("expected assignment");
    };
    assert!(matches!(lhs.kind, ExprKind::Ident(_)));
    assert!(matches!(rhs.kind, ExprKind::Assign { .. }));
}

#[test]
fn postfix_index_and_field() {
    let ExprKind::Assign { lhs, .. } = expr("a[1].b = 2;").kind else {
        panic!("expected assignment");
    };
    let ExprKind::Field { base, field } = lhs.kind else {
        panic!("expected field access");
    };
    assert_eq!(field.to_str(), "b");
    assert!(matches!(base.kind, ExprKind::Index { .. }));
}

#[test]
fn calls_with_named_arguments() {
    let ExprKind::Call(call) = expr("split(\"a.b\", sep: \".\", keep: FALSE);").kind else {
        panic!("expected call");
    };
    assert_eq!(call.callee.to_str(), "split");
    assert_eq!(call.args.len(), 3);
    assert!(matches!(call.args[0], Argument::Positional(_)));
    assert!(matches!(&call.args[1], Argument::Named(name, _) if name.to_str() == "sep"));
}

#[test]
fn increments() {
    assert!(matches!(
        expr("i++;").kind,
        ExprKind::Increment { prefix: false, .. }
    ));
    assert!(matches!(
        expr("--i;").kind,
        ExprKind::Increment { prefix: true, .. }
    ));
}

#[test]
fn repeat_operator() {
    assert!(matches!(expr("f() x 3;").kind, ExprKind::Repeat { .. }));
}

#[test]
fn statements() {
    let stmts = parse_ok(
        r#"
        function f(a, b) { return a + b; }
        if (1) x = 1; else { x = 2; }
        for (i = 0; i < 3; i++) ;
        for (;;) break;
        foreach item ([1, 2]) continue;
        while (0) {}
        repeat x++; until x > 3;
        local_var l, m = 2;
        include("a.inc");
        exit(0);
        "#,
    );
    let kinds: Vec<_> = stmts
        .iter()
        .map(|s| std::mem::discriminant(&s.kind))
        .collect();
    assert_eq!(kinds.len(), 10);
    let StatementKind::FunctionDecl(decl) = &stmts[0].kind else {
        panic!("expected function");
    };
    assert_eq!(decl.params.len(), 2);
    let StatementKind::For(empty_for) = &stmts[3].kind else {
        panic!("expected for");
    };
    assert!(empty_for.condition.is_none());
    let StatementKind::VarScopeDecl(decl) = &stmts[7].kind else {
        panic!("expected local_var");
    };
    assert_eq!(decl.scope, VarScope::Local);
    assert!(decl.idents[0].1.is_none());
    assert!(decl.idents[1].1.is_some());
}

#[test]
fn collects_multiple_errors() {
    let errs = parse_err("a = ; b = 1; c = (;");
    assert_eq!(errs.len(), 2);
    assert!(errs.iter().all(|e| *e == ParseErrorKind::ExpressionExpected));
}

#[test]
fn missing_semicolon() {
    assert_eq!(
        parse_err("5"),
        vec![ParseErrorKind::TokenExpected(TokenKind::Semicolon)]
    );
}

#[test]
fn statement_spans() {
    let stmts = parse_ok("a = 1;\nb = 22;");
    assert_eq!(stmts[1].span.start.line, 2);
    assert_eq!(stmts[1].span.range(), 7..14);
}
