// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Lowers the syntax tree into [`CodeUnit`]s.
//!
//! Every expression leaves exactly one value on the operand stack. Jumps are
//! emitted with a placeholder target and patched once the target is known.

mod error;
mod escape;
mod expression;
mod globals;
mod statement;
pub mod symbol_table;

use std::{collections::HashSet, sync::Arc};

use tracing::debug;

pub use error::{CompileError, CompileErrorKind, Diagnostic};
pub use escape::decode as decode_escapes;
pub use symbol_table::{ScopeKind, SymbolError, SymbolTable};

use crate::nasl::{
    code::{CodeUnit, Instruction, OpCode, Position, SlotId},
    error::Span,
    interpreter::NaslValue,
    syntax::{self, Ast, grammar::StatementKind},
    utils::{Executor, lookup_keys::FUNCTION_PREFIX},
};

#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    /// Reject reads of variables that are never declared.
    pub strict_identifiers: bool,
    /// Names that are provided from outside and pass the strict check.
    pub ext_var_names: HashSet<String>,
    /// Reject declaring a variable or parameter twice in the same scope.
    pub strict_redeclaration: bool,
    /// Leave the value of a trailing expression statement on the stack, so
    /// that it becomes the result of the unit.
    pub keep_last_value: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum JumpTag {
    Break = 1,
    Continue = 2,
}

#[derive(Debug)]
struct PendingJump {
    index: usize,
    tag: JumpTag,
}

pub struct Compiler<'a> {
    symbols: &'a mut SymbolTable,
    executor: &'a Executor,
    options: &'a CompileOptions,
    source: Arc<str>,
    code: Vec<Instruction>,
    loops: Vec<Vec<PendingJump>>,
    function_locals: Vec<Vec<SlotId>>,
    errors: Vec<Diagnostic>,
}

impl<'a> Compiler<'a> {
    pub fn new(
        symbols: &'a mut SymbolTable,
        executor: &'a Executor,
        options: &'a CompileOptions,
    ) -> Self {
        Self {
            symbols,
            executor,
            options,
            source: Arc::from(""),
            code: vec![],
            loops: vec![],
            function_locals: vec![],
            errors: vec![],
        }
    }

    /// Parses and compiles the file `name`.
    pub fn compile(mut self, name: &str, code: &str) -> Result<CodeUnit, CompileError> {
        let ast = syntax::parse(code).map_err(|errs| {
            CompileError::new(name, code, errs.into_iter().map(Diagnostic::from).collect())
        })?;
        self.source = Arc::from(name);
        self.symbols
            .set_strict_redeclaration(self.options.strict_redeclaration);
        self.unit(&ast);
        if !self.errors.is_empty() {
            return Err(CompileError::new(name, code, self.errors));
        }
        debug!(
            source = name,
            instructions = self.code.len(),
            slots = self.symbols.slot_count(),
            "compiled"
        );
        Ok(CodeUnit {
            name: self.source,
            code: self.code,
        })
    }

    /// Function declarations are hoisted to the start of the unit.
    fn unit(&mut self, ast: &Ast) {
        let (functions, rest): (Vec<_>, Vec<_>) = ast
            .stmts()
            .iter()
            .partition(|s| matches!(s.kind, StatementKind::FunctionDecl(_)));
        // Declared up front so that hoisted functions can call each other and
        // write to globals of this unit.
        for function in &functions {
            if let StatementKind::FunctionDecl(decl) = &function.kind {
                self.symbols
                    .global_symbol(&format!("{FUNCTION_PREFIX}{}", decl.name.to_str()));
            }
        }
        for name in globals::root_names(&rest) {
            self.symbols.global_symbol(name);
        }
        for function in functions {
            self.statement(function);
        }
        let last = rest.len().saturating_sub(1);
        for (i, stmt) in rest.into_iter().enumerate() {
            match &stmt.kind {
                StatementKind::Expr(expr) if i == last && self.options.keep_last_value => {
                    self.expression_statement(expr, true)
                }
                _ => self.statement(stmt),
            }
        }
    }

    fn position(&self, span: Span) -> Position {
        Position {
            start_line: span.start.line,
            start_column: span.start.column,
            end_line: span.end.line,
            end_column: span.end.column,
            source: self.source.clone(),
        }
    }

    fn emit(&mut self, op: OpCode, unary: usize, op1: NaslValue, span: Span) -> usize {
        let position = self.position(span);
        self.code.push(Instruction::new(op, unary, op1, position));
        self.code.len() - 1
    }

    fn emit_op(&mut self, op: OpCode, span: Span) -> usize {
        self.emit(op, 0, NaslValue::Null, span)
    }

    fn push_value(&mut self, value: NaslValue, span: Span) {
        self.emit(OpCode::PushValue, 0, value, span);
    }

    /// Emits a jump with a placeholder target.
    fn emit_jump(&mut self, op: OpCode, span: Span) -> usize {
        self.emit(op, usize::MAX, NaslValue::Null, span)
    }

    fn here(&self) -> usize {
        self.code.len()
    }

    fn patch(&mut self, jump: usize, target: usize) {
        debug_assert!(self.code[jump].op.is_jump());
        self.code[jump].unary = target;
    }

    fn patch_here(&mut self, jump: usize) {
        let target = self.here();
        self.patch(jump, target);
    }

    fn error(&mut self, kind: CompileErrorKind, span: Span) {
        self.errors.push(Diagnostic { kind, span });
    }

    fn begin_loop(&mut self) {
        self.loops.push(vec![]);
    }

    fn end_loop(&mut self, continue_target: usize, break_target: usize) {
        for jump in self.loops.pop().unwrap_or_default() {
            let target = match jump.tag {
                JumpTag::Break => break_target,
                JumpTag::Continue => continue_target,
            };
            self.patch(jump.index, target);
        }
    }

    /// Resolves a name that is read. Unknown names bind to the root scope, so
    /// functions can read globals that are assigned after their declaration.
    fn resolve_read(&mut self, name: &str, span: Span) -> SlotId {
        if let Some(id) = self.symbols.get_symbol_by_variable_name(name) {
            return id;
        }
        if self.options.strict_identifiers && !self.options.ext_var_names.contains(name) {
            self.error(CompileErrorKind::UndefinedVariable(name.to_owned()), span);
        }
        self.symbols.global_symbol(name)
    }

    /// Resolves a name that is assigned to.
    fn resolve_write(&mut self, name: &str) -> SlotId {
        let id = match self.symbols.get_symbol_by_variable_name(name) {
            Some(id) => id,
            None => self.symbols.new_implicit_symbol(name),
        };
        self.symbols.set_id_is_inited(id);
        id
    }
}
