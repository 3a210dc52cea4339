// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Collects the names a unit declares or assigns outside of functions.
//!
//! Function bodies are compiled before the rest of the unit, so these names
//! have to be known up front for a function body to bind them to the root
//! scope instead of creating a local.

use crate::nasl::syntax::grammar::{Argument, Expr, ExprKind, Statement, StatementKind, VarScope};

/// The names in first seen order, possibly repeated.
pub fn root_names<'a>(stmts: &[&'a Statement]) -> Vec<&'a str> {
    let mut names = vec![];
    for &stmt in stmts {
        statement(stmt, &mut names);
    }
    names
}

fn statement<'a>(stmt: &'a Statement, names: &mut Vec<&'a str>) {
    match &stmt.kind {
        StatementKind::NoOp
        | StatementKind::Break
        | StatementKind::Continue
        | StatementKind::FunctionDecl(_) => {}
        StatementKind::Expr(expr) | StatementKind::Include(expr) => expression(expr, names),
        StatementKind::Return(expr) => {
            if let Some(expr) = expr {
                expression(expr, names);
            }
        }
        StatementKind::Exit(args) => args.iter().for_each(|a| expression(a, names)),
        StatementKind::Block(stmts) => stmts.iter().for_each(|s| statement(s, names)),
        StatementKind::If(x) => {
            expression(&x.condition, names);
            statement(&x.if_branch, names);
            if let Some(else_branch) = &x.else_branch {
                statement(else_branch, names);
            }
        }
        StatementKind::While(x) => {
            expression(&x.condition, names);
            statement(&x.block, names);
        }
        StatementKind::For(x) => {
            for expr in [&x.initializer, &x.condition, &x.increment]
                .into_iter()
                .flatten()
            {
                expression(expr, names);
            }
            statement(&x.block, names);
        }
        StatementKind::Repeat(x) => {
            statement(&x.block, names);
            expression(&x.condition, names);
        }
        StatementKind::Foreach(x) => {
            names.push(x.var.to_str());
            expression(&x.array, names);
            statement(&x.block, names);
        }
        StatementKind::VarScopeDecl(x) => {
            for (ident, init) in &x.idents {
                if x.scope == VarScope::Global {
                    names.push(ident.to_str());
                }
                if let Some(init) = init {
                    expression(init, names);
                }
            }
        }
    }
}

/// The variable an assignment or increment writes to.
fn target_base(mut expr: &Expr) -> Option<&str> {
    loop {
        match &expr.kind {
            ExprKind::Ident(ident) => return Some(ident.to_str()),
            ExprKind::Index { base, .. } | ExprKind::Field { base, .. } => expr = &**base,
            _ => return None,
        }
    }
}

fn expression<'a>(expr: &'a Expr, names: &mut Vec<&'a str>) {
    match &expr.kind {
        ExprKind::Literal(_) | ExprKind::Ident(_) => {}
        ExprKind::Array(items) => items.iter().for_each(|e| expression(e, names)),
        ExprKind::Index { base, index } => {
            expression(base, names);
            expression(index, names);
        }
        ExprKind::Field { base, .. } => expression(base, names),
        ExprKind::Call(call) => {
            for arg in &call.args {
                match arg {
                    Argument::Positional(e) | Argument::Named(_, e) => expression(e, names),
                }
            }
        }
        ExprKind::Unary { rhs, .. } => expression(rhs, names),
        ExprKind::Increment { target, .. } => {
            names.extend(target_base(target));
            expression(target, names);
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            expression(lhs, names);
            expression(rhs, names);
        }
        ExprKind::Assign { lhs, rhs, .. } => {
            names.extend(target_base(lhs));
            expression(lhs, names);
            expression(rhs, names);
        }
        ExprKind::Repeat { expr, count } => {
            expression(expr, names);
            expression(count, names);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::root_names;
    use crate::nasl::syntax;

    fn names(code: &str) -> Vec<String> {
        let ast = syntax::parse(code).unwrap();
        let stmts: Vec<_> = ast.stmts().iter().collect();
        root_names(&stmts).into_iter().map(str::to_owned).collect()
    }

    #[test]
    fn assignments_and_declarations() {
        assert_eq!(
            names("global_var a, b = c; d[1] = 2; e[0]++; foreach g (h) i += 1;"),
            vec!["a", "b", "d", "e", "g", "i"]
        );
    }

    #[test]
    fn nested_statements() {
        assert_eq!(
            names("if (x) { for (i = 0; i < 2; i++) y = i; } else while ((z = f())) {}"),
            vec!["i", "i", "y", "z"]
        );
    }

    #[test]
    fn function_bodies_and_locals_are_skipped() {
        assert_eq!(
            names("function f() { a = 1; } local_var b; c = (d = 1);"),
            vec!["c", "d"]
        );
    }
}
