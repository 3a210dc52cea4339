// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use super::{CompileErrorKind, Compiler, escape};
use crate::nasl::{
    code::OpCode,
    error::{Span, Spanned},
    interpreter::NaslValue,
    syntax::{
        grammar::{
            Argument, AssignmentOperator, BinaryOperator, Call, Expr, ExprKind,
            IncrementOperator, UnaryPrefixOperator,
        },
        token::{Ident, LiteralKind},
    },
    utils::lookup_keys::FUNCTION_PREFIX,
};

enum PlaceIndex<'e> {
    Expr(&'e Expr),
    Field(&'e Ident),
}

fn literal(kind: &LiteralKind) -> NaslValue {
    match kind {
        LiteralKind::String(raw) | LiteralKind::Data(raw) => NaslValue::String(escape::decode(raw)),
        LiteralKind::Number(n) => NaslValue::Number(*n),
        LiteralKind::Float(f) => NaslValue::Float(*f),
        LiteralKind::IPv4Address(ip) => NaslValue::String(ip.clone()),
        LiteralKind::Boolean(b) => NaslValue::Boolean(*b),
        LiteralKind::Null => NaslValue::Null,
    }
}

fn binary_opcode(op: BinaryOperator) -> Option<OpCode> {
    use BinaryOperator::*;
    Some(match op {
        Plus => OpCode::Add,
        Minus => OpCode::Sub,
        Star => OpCode::Mul,
        Slash => OpCode::Div,
        Percent => OpCode::Mod,
        BangEqual => OpCode::NotEq,
        EqualEqual => OpCode::Eq,
        Greater => OpCode::Gt,
        GreaterEqual => OpCode::GtEq,
        Less => OpCode::Lt,
        LessEqual => OpCode::LtEq,
        GreaterGreater => OpCode::Shr,
        LessLess => OpCode::Shl,
        Ampersand => OpCode::BitAnd,
        Caret => OpCode::BitXor,
        Pipe => OpCode::BitOr,
        _ => return None,
    })
}

fn compound_opcode(op: AssignmentOperator) -> Option<OpCode> {
    use AssignmentOperator::*;
    Some(match op {
        PlusEqual => OpCode::PlusEq,
        MinusEqual => OpCode::MinusEq,
        StarEqual => OpCode::MulEq,
        SlashEqual => OpCode::DivEq,
        PercentEqual => OpCode::ModEq,
        LessLessEqual => OpCode::ShlEq,
        GreaterGreaterEqual => OpCode::ShrEq,
        Equal | LessLessLessEqual | GreaterGreaterGreaterEqual => return None,
    })
}

impl Compiler<'_> {
    pub(super) fn expression(&mut self, expr: &Expr) {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Literal(kind) => self.push_value(literal(kind), span),
            ExprKind::Ident(ident) => {
                let id = self.resolve_read(ident.to_str(), span);
                self.emit(OpCode::PushRef, id, NaslValue::Null, span);
            }
            ExprKind::Array(items) => {
                for item in items {
                    self.expression(item);
                }
                self.emit(OpCode::PushList, items.len(), NaslValue::Null, span);
            }
            ExprKind::Index { base, index } => {
                self.builtin_call("get_array_elem", &[base.as_ref(), index.as_ref()], span)
            }
            ExprKind::Field { base, field } => {
                self.builtin_prologue("get_array_elem", span);
                self.expression(base);
                self.push_value(NaslValue::String(field.to_str().to_owned()), field.span());
                self.emit(OpCode::Call, 2, NaslValue::Boolean(true), span);
            }
            ExprKind::Call(call) => self.call(call, span),
            ExprKind::Unary { op, rhs } => {
                let opcode = match op {
                    UnaryPrefixOperator::Minus => OpCode::Neg,
                    UnaryPrefixOperator::Plus => OpCode::Plus,
                    UnaryPrefixOperator::Bang => OpCode::Not,
                    UnaryPrefixOperator::Tilde => {
                        self.builtin_call("BitNot", &[rhs.as_ref()], span);
                        return;
                    }
                };
                self.expression(rhs);
                self.emit_op(opcode, span);
            }
            ExprKind::Increment { .. } => self.increment(expr, true),
            ExprKind::Binary { lhs, op, rhs } => self.binary(lhs, *op, rhs, span),
            ExprKind::Assign { lhs, op, rhs } => self.assign(lhs, *op, rhs, span),
            ExprKind::Repeat { expr, count } => self.repeat(expr, count, span),
        }
    }

    fn builtin_prologue(&mut self, name: &str, span: Span) {
        let id = self.symbols.label_id(name);
        self.push_value(NaslValue::Number(id as i64), span);
    }

    /// Calls a builtin with positional arguments.
    fn builtin_call(&mut self, name: &str, args: &[&Expr], span: Span) {
        self.builtin_prologue(name, span);
        for arg in args {
            self.expression(arg);
        }
        self.emit(OpCode::Call, args.len(), NaslValue::Boolean(true), span);
    }

    fn call(&mut self, call: &Call, span: Span) {
        let name = call.callee.to_str();
        let symbol = format!("{FUNCTION_PREFIX}{name}");
        let user_defined = self.symbols.get_symbol_by_variable_name(&symbol).is_some()
            || !self.executor.contains(name);
        if user_defined {
            let slot = self.symbols.global_symbol(&symbol);
            self.emit(OpCode::PushRef, slot, NaslValue::Null, span);
        } else {
            self.builtin_prologue(name, span);
        }
        let mut entries = 0;
        for arg in &call.args {
            match arg {
                Argument::Positional(expr) => {
                    self.expression(expr);
                    entries += 1;
                }
                Argument::Named(param, expr) => {
                    let label = self.symbols.label_id(param.to_str());
                    self.emit(OpCode::PushLeftRef, label, NaslValue::Null, param.span());
                    self.expression(expr);
                    entries += 2;
                }
            }
        }
        let op1 = if user_defined {
            NaslValue::String(name.to_owned())
        } else {
            NaslValue::Boolean(true)
        };
        self.emit(OpCode::Call, entries, op1, span);
    }

    fn binary(&mut self, lhs: &Expr, op: BinaryOperator, rhs: &Expr, span: Span) {
        use BinaryOperator::*;
        if let Some(opcode) = binary_opcode(op) {
            self.expression(lhs);
            self.expression(rhs);
            self.emit_op(opcode, span);
            return;
        }
        match op {
            AmpersandAmpersand | PipePipe => {
                let jump = if op == AmpersandAmpersand {
                    OpCode::JmpFop
                } else {
                    OpCode::JmpTop
                };
                self.expression(lhs);
                self.emit_op(OpCode::Dup, span);
                let to_end = self.emit_jump(jump, span);
                self.emit_op(OpCode::Pop, span);
                self.expression(rhs);
                self.patch_here(to_end);
            }
            StarStar => self.builtin_call("__pow", &[lhs, rhs], span),
            GreaterGreaterGreater => self.builtin_call("RightShiftLogical", &[lhs, rhs], span),
            LessLessLess => self.builtin_call("LeftShiftLogical", &[lhs, rhs], span),
            EqualTilde => self.builtin_call("reEqual", &[lhs, rhs], span),
            BangTilde => {
                self.builtin_call("reEqual", &[lhs, rhs], span);
                self.emit_op(OpCode::Not, span);
            }
            GreaterLess => self.builtin_call("strIn", &[rhs, lhs], span),
            GreaterBangLess => {
                self.builtin_call("strIn", &[rhs, lhs], span);
                self.emit_op(OpCode::Not, span);
            }
            _ => {}
        }
    }

    fn assign(&mut self, lhs: &Expr, op: AssignmentOperator, rhs: &Expr, span: Span) {
        if !lhs.is_place() {
            self.error(CompileErrorKind::InvalidAssignmentTarget, lhs.span);
            self.push_value(NaslValue::Null, span);
            return;
        }
        match op {
            AssignmentOperator::Equal => {
                self.place(lhs);
                self.expression(rhs);
                self.emit_op(OpCode::Assign, span);
            }
            AssignmentOperator::GreaterGreaterGreaterEqual => {
                self.place(lhs);
                self.builtin_call("RightShiftLogical", &[lhs, rhs], span);
                self.emit_op(OpCode::Assign, span);
            }
            AssignmentOperator::LessLessLessEqual => {
                self.place(lhs);
                self.builtin_call("LeftShiftLogical", &[lhs, rhs], span);
                self.emit_op(OpCode::Assign, span);
            }
            op => {
                let Some(opcode) = compound_opcode(op) else {
                    return;
                };
                self.expression(rhs);
                self.place(lhs);
                self.emit_op(opcode, span);
            }
        }
    }

    /// Pushes an assignable reference to `expr`. Indexed targets push the
    /// base reference followed by the indices, packed by `PushGenList`.
    fn place(&mut self, expr: &Expr) {
        let mut indices = vec![];
        let mut current = expr;
        let base = loop {
            match &current.kind {
                ExprKind::Ident(ident) => break ident,
                ExprKind::Index { base, index } => {
                    indices.push(PlaceIndex::Expr(index));
                    current = base;
                }
                ExprKind::Field { base, field } => {
                    indices.push(PlaceIndex::Field(field));
                    current = base;
                }
                _ => return,
            }
        };
        let id = self.resolve_write(base.to_str());
        self.emit(OpCode::PushLeftRef, id, NaslValue::Null, current.span);
        if indices.is_empty() {
            return;
        }
        let count = indices.len();
        for index in indices.into_iter().rev() {
            match index {
                PlaceIndex::Expr(expr) => self.expression(expr),
                PlaceIndex::Field(field) => self.push_value(
                    NaslValue::String(field.to_str().to_owned()),
                    field.span(),
                ),
            }
        }
        self.emit(OpCode::PushGenList, count + 1, NaslValue::Null, expr.span);
    }

    /// Compiles `++`/`--`, pushing the result only when `push` is set.
    pub(super) fn increment(&mut self, expr: &Expr, push: bool) {
        let ExprKind::Increment { op, prefix, target } = &expr.kind else {
            return;
        };
        if !target.is_place() {
            self.error(CompileErrorKind::InvalidIncrementTarget, target.span);
            if push {
                self.push_value(NaslValue::Null, expr.span);
            }
            return;
        }
        self.place(target);
        let opcode = match op {
            IncrementOperator::PlusPlus => OpCode::PlusPlus,
            IncrementOperator::MinusMinus => OpCode::MinusMinus,
        };
        self.emit(opcode, push as usize, NaslValue::Boolean(*prefix), expr.span);
    }

    /// `expr x count` evaluates `expr` count times and yields undefined.
    fn repeat(&mut self, expr: &Expr, count: &Expr, span: Span) {
        let counter = self.symbols.new_hidden_symbol("repeat counter");
        let limit = self.symbols.new_hidden_symbol("repeat limit");
        self.emit(OpCode::PushLeftRef, limit, NaslValue::Null, span);
        self.expression(count);
        self.emit_op(OpCode::Assign, span);
        self.emit_op(OpCode::Pop, span);
        self.emit(OpCode::PushLeftRef, counter, NaslValue::Null, span);
        self.push_value(NaslValue::Number(0), span);
        self.emit_op(OpCode::Assign, span);
        self.emit_op(OpCode::Pop, span);

        let top = self.here();
        self.emit(OpCode::PushRef, counter, NaslValue::Null, span);
        self.emit(OpCode::PushRef, limit, NaslValue::Null, span);
        self.emit_op(OpCode::Lt, span);
        let to_end = self.emit_jump(OpCode::JmpFop, span);
        self.expression(expr);
        self.emit_op(OpCode::Pop, span);
        self.emit(OpCode::PushLeftRef, counter, NaslValue::Null, span);
        self.emit(OpCode::PlusPlus, 0, NaslValue::Boolean(false), span);
        let back = self.emit_jump(OpCode::Jmp, span);
        self.patch(back, top);
        self.patch_here(to_end);
        self.push_value(NaslValue::Null, span);
    }
}
