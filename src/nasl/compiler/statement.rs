// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::{mem, sync::Arc};

use tracing::warn;

use super::{CompileErrorKind, Compiler, JumpTag, PendingJump};
use crate::nasl::{
    code::{FunctionCode, OpCode},
    compiler::ScopeKind,
    error::{Span, Spanned},
    interpreter::NaslValue,
    utils::lookup_keys::{FC_ANON_ARGS, FUNCTION_PREFIX, NEW_ITERATOR},
    syntax::grammar::{
        Expr, ExprKind, For, Foreach, FunctionDecl, If, Repeat, Statement, StatementKind,
        VarScope, VarScopeDecl, While,
    },
};

impl Compiler<'_> {
    pub(super) fn statement(&mut self, stmt: &Statement) {
        let span = stmt.span;
        match &stmt.kind {
            StatementKind::NoOp => {}
            StatementKind::Expr(expr) => self.expression_statement(expr, false),
            StatementKind::Block(stmts) => self.block(stmts, span),
            StatementKind::If(x) => self.if_statement(x, span),
            StatementKind::While(x) => self.while_loop(x, span),
            StatementKind::For(x) => self.for_loop(x, span),
            StatementKind::Repeat(x) => self.repeat_loop(x, span),
            StatementKind::Foreach(x) => self.foreach_loop(x, span),
            StatementKind::FunctionDecl(x) => self.function_decl(x, span),
            StatementKind::VarScopeDecl(x) => self.var_scope_decl(x, span),
            StatementKind::Return(expr) => {
                match expr {
                    Some(expr) => self.expression(expr),
                    None => self.push_value(NaslValue::Null, span),
                }
                self.emit_op(OpCode::Return, span);
            }
            StatementKind::Break => self.loop_jump(JumpTag::Break, span),
            StatementKind::Continue => self.loop_jump(JumpTag::Continue, span),
            StatementKind::Include(expr) => {
                self.expression(expr);
                self.emit_op(OpCode::Include, span);
            }
            StatementKind::Exit(args) => {
                for arg in args {
                    self.expression(arg);
                }
                self.emit(OpCode::Exit, args.len(), NaslValue::Null, span);
            }
        }
    }

    /// Evaluates `expr` and discards its value unless `keep` is set.
    pub(super) fn expression_statement(&mut self, expr: &Expr, keep: bool) {
        if let ExprKind::Increment { .. } = &expr.kind {
            self.increment(expr, keep);
            return;
        }
        self.expression(expr);
        if !keep {
            self.emit_op(OpCode::Pop, expr.span);
        }
    }

    fn block(&mut self, stmts: &[Statement], span: Span) {
        self.symbols.push_scope(ScopeKind::Block);
        self.emit_op(OpCode::ScopeEnter, span);
        for stmt in stmts {
            self.statement(stmt);
        }
        let ids = self.symbols.pop_scope();
        if let Some(locals) = self.function_locals.last_mut() {
            locals.extend(ids.iter().copied());
        }
        let slots = ids.into_iter().map(|id| NaslValue::Number(id as i64)).collect();
        self.emit(OpCode::ScopeExit, 0, NaslValue::list(slots), span);
    }

    fn loop_jump(&mut self, tag: JumpTag, span: Span) {
        if self.loops.is_empty() {
            warn!(position = %self.position(span), "{tag:?} outside of a loop is ignored");
            return;
        }
        let index = self.emit_jump(OpCode::Jmp, span);
        if let Some(jumps) = self.loops.last_mut() {
            jumps.push(PendingJump { index, tag });
        }
    }

    fn if_statement(&mut self, x: &If, span: Span) {
        self.expression(&x.condition);
        let to_else = self.emit_jump(OpCode::JmpFop, span);
        self.statement(&x.if_branch);
        match &x.else_branch {
            Some(else_branch) => {
                let to_end = self.emit_jump(OpCode::Jmp, span);
                self.patch_here(to_else);
                self.statement(else_branch);
                self.patch_here(to_end);
            }
            None => self.patch_here(to_else),
        }
    }

    fn while_loop(&mut self, x: &While, span: Span) {
        self.begin_loop();
        let top = self.here();
        self.expression(&x.condition);
        let to_end = self.emit_jump(OpCode::JmpFop, span);
        self.statement(&x.block);
        let back = self.emit_jump(OpCode::Jmp, span);
        self.patch(back, top);
        self.patch_here(to_end);
        let end = self.here();
        self.end_loop(top, end);
    }

    fn for_loop(&mut self, x: &For, span: Span) {
        if let Some(init) = &x.initializer {
            self.expression_statement(init, false);
        }
        self.begin_loop();
        let top = self.here();
        let to_end = x.condition.as_ref().map(|condition| {
            self.expression(condition);
            self.emit_jump(OpCode::JmpFop, span)
        });
        self.statement(&x.block);
        let cont = self.here();
        if let Some(increment) = &x.increment {
            self.expression_statement(increment, false);
        }
        let back = self.emit_jump(OpCode::Jmp, span);
        self.patch(back, top);
        if let Some(to_end) = to_end {
            self.patch_here(to_end);
        }
        let end = self.here();
        self.end_loop(cont, end);
    }

    fn repeat_loop(&mut self, x: &Repeat, span: Span) {
        self.begin_loop();
        let top = self.here();
        self.statement(&x.block);
        self.expression(&x.condition);
        let back = self.emit_jump(OpCode::JmpFop, span);
        self.patch(back, top);
        let end = self.here();
        // `continue` restarts the body without checking the condition.
        self.end_loop(top, end);
    }

    /// The iterator lives in a hidden slot. Each round pushes the loop
    /// variable reference, the next value and whether there was one.
    fn foreach_loop(&mut self, x: &Foreach, span: Span) {
        let iter = self.symbols.new_hidden_symbol("iterator");
        let var = self.resolve_write(x.var.to_str());

        self.emit(OpCode::PushLeftRef, iter, NaslValue::Null, span);
        let new_iterator = self.symbols.label_id(NEW_ITERATOR);
        self.push_value(NaslValue::Number(new_iterator as i64), span);
        self.expression(&x.array);
        self.emit(OpCode::Call, 1, NaslValue::Boolean(true), span);
        self.emit_op(OpCode::Assign, span);
        self.emit_op(OpCode::Pop, span);

        self.begin_loop();
        let top = self.here();
        self.emit(OpCode::PushLeftRef, var, NaslValue::Null, span);
        self.emit(OpCode::PushLeftRef, iter, NaslValue::Null, span);
        self.emit(OpCode::IterableCall, 2, NaslValue::Null, span);
        let to_exit = self.emit_jump(OpCode::JmpFop, span);
        self.emit_op(OpCode::Assign, span);
        self.emit_op(OpCode::Pop, span);
        self.statement(&x.block);
        let back = self.emit_jump(OpCode::Jmp, span);
        self.patch(back, top);
        self.patch_here(to_exit);
        self.emit_op(OpCode::Pop, span);
        self.emit_op(OpCode::Pop, span);
        let end = self.here();
        self.end_loop(top, end);

        let reset = NaslValue::list(vec![NaslValue::Number(iter as i64)]);
        self.emit(OpCode::ScopeExit, 0, reset, span);
    }

    fn function_decl(&mut self, x: &FunctionDecl, span: Span) {
        let name = x.name.to_str().to_owned();
        let outer_code = mem::take(&mut self.code);
        let outer_loops = mem::take(&mut self.loops);
        self.symbols.push_scope(ScopeKind::Function);
        self.function_locals.push(vec![]);

        let mut params = Vec::with_capacity(x.params.len());
        for param in &x.params {
            match self.symbols.new_symbol(param.to_str()) {
                Ok(id) => {
                    self.symbols.set_id_is_inited(id);
                    params.push((param.to_str().to_owned(), id));
                }
                Err(e) => self.error(CompileErrorKind::Symbol(e), param.span()),
            }
        }
        let anon_args = match self.symbols.new_symbol(FC_ANON_ARGS) {
            Ok(id) => id,
            Err(_) => self.symbols.new_hidden_symbol(FC_ANON_ARGS),
        };
        self.symbols.set_id_is_inited(anon_args);

        for stmt in &x.block {
            self.statement(stmt);
        }
        self.push_value(NaslValue::Null, span);
        self.emit_op(OpCode::Return, span);

        let mut locals = self.function_locals.pop().unwrap_or_default();
        locals.extend(self.symbols.pop_scope());
        locals.sort_unstable();
        locals.dedup();
        let body = mem::replace(&mut self.code, outer_code);
        self.loops = outer_loops;

        let function = FunctionCode {
            name: name.clone(),
            params,
            anon_args,
            locals,
            code: body,
        };
        let slot = self.symbols.global_symbol(&format!("{FUNCTION_PREFIX}{name}"));
        self.symbols.set_id_is_inited(slot);
        self.emit(OpCode::PushLeftRef, slot, NaslValue::Null, span);
        self.push_value(NaslValue::Function(Arc::new(function)), span);
        self.emit_op(OpCode::Assign, span);
        self.emit_op(OpCode::Pop, span);
    }

    fn var_scope_decl(&mut self, x: &VarScopeDecl, span: Span) {
        for (ident, init) in &x.idents {
            let declared = match x.scope {
                VarScope::Local => self.symbols.new_symbol(ident.to_str()),
                VarScope::Global => self.symbols.new_global_symbol(ident.to_str()),
            };
            let id = match declared {
                Ok(id) => id,
                Err(e) => {
                    self.error(CompileErrorKind::Symbol(e), ident.span());
                    continue;
                }
            };
            if let Some(init) = init {
                self.symbols.set_id_is_inited(id);
                self.emit(OpCode::PushLeftRef, id, NaslValue::Null, span);
                self.expression(init);
                self.emit_op(OpCode::Assign, span);
                self.emit_op(OpCode::Pop, span);
            }
        }
    }
}
