// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! The stack based virtual machine executing compiled NASL code.
//!
//! An [`Interpreter`] owns the symbol table of its compilation session and a
//! flat vector of variable slots indexed by slot id. Every unit it compiles,
//! the main script as well as its includes, shares both.

mod assign;
mod call;
mod error;
mod include;
mod iterator;
mod nasl_array;
mod nasl_value;
pub mod operator;

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use tracing::debug;

pub use error::{ExitSignal, FunctionCallError, InterpretError, InterpretErrorKind, Interrupt};
pub use iterator::NaslIterator;
pub use nasl_array::{ArrayError, ArrayKey, NaslArray};
pub use nasl_value::{MAX_STRING_LEN, NaslValue, NativeHandle, atoi, bytes_to_str, str_to_bytes};

use crate::nasl::{
    code::{CodeUnit, Instruction, OpCode, SlotId},
    compiler::{CompileError, CompileOptions, Compiler, SymbolTable},
    syntax::Loader,
    utils::{Executor, ScriptCtx},
};

pub type Result<T = NaslValue, E = Interrupt> = std::result::Result<T, E>;

#[derive(Clone, Debug)]
pub struct InterpreterOptions {
    pub compile: CompileOptions,
    /// Nesting limit of user defined function calls.
    pub max_call_depth: usize,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self {
            compile: CompileOptions::default(),
            max_call_depth: 256,
        }
    }
}

/// A position on the operand stack.
#[derive(Clone, Debug)]
enum Operand {
    Value(NaslValue),
    Ref(Place),
}

/// An assignable location: a slot and the array indices below it.
#[derive(Clone, Debug)]
struct Place {
    slot: SlotId,
    path: Vec<NaslValue>,
}

impl Place {
    fn slot(slot: SlotId) -> Self {
        Self { slot, path: vec![] }
    }
}

enum Flow {
    Next,
    Jump(usize),
    Return(NaslValue),
}

pub struct Interpreter<'a> {
    executor: &'a Executor,
    script: &'a ScriptCtx,
    loader: &'a Loader,
    options: InterpreterOptions,
    symbols: SymbolTable,
    slots: Vec<NaslValue>,
    stack: Vec<Operand>,
    included: HashSet<String>,
    depth: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        executor: &'a Executor,
        script: &'a ScriptCtx,
        loader: &'a Loader,
        options: InterpreterOptions,
    ) -> Self {
        Self {
            executor,
            script,
            loader,
            options,
            symbols: SymbolTable::new(),
            slots: vec![],
            stack: vec![],
            included: HashSet::new(),
            depth: 0,
        }
    }

    /// Defines a global variable before any code runs.
    pub fn define(&mut self, name: &str, value: impl Into<NaslValue>) {
        let id = self.symbols.global_symbol(name);
        self.symbols.set_id_is_inited(id);
        *self.slot_mut(id) = value.into();
    }

    /// The current value of a global variable.
    pub fn variable(&self, name: &str) -> Option<&NaslValue> {
        self.symbols
            .get_symbol_by_variable_name(name)
            .and_then(|id| self.slots.get(id))
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn script(&self) -> &ScriptCtx {
        self.script
    }

    /// Compiles `code` into this session.
    pub fn compile(&mut self, name: &str, code: &str) -> Result<CodeUnit, CompileError> {
        let options = self.options.compile.clone();
        self.compile_with(name, code, &options)
    }

    fn compile_with(
        &mut self,
        name: &str,
        code: &str,
        options: &CompileOptions,
    ) -> Result<CodeUnit, CompileError> {
        let unit = Compiler::new(&mut self.symbols, self.executor, options).compile(name, code)?;
        let count = self.symbols.slot_count();
        if self.slots.len() < count {
            self.slots.resize(count, NaslValue::Null);
        }
        Ok(unit)
    }

    /// Runs a compiled unit. Returns the value left on the stack, or
    /// undefined.
    pub fn run(&mut self, unit: &CodeUnit) -> Result {
        let base = self.stack.len();
        let result = self.execute(&unit.code);
        self.stack.truncate(base);
        result
    }

    /// Compiles and runs `code`.
    pub fn run_code(&mut self, name: &str, code: &str) -> Result {
        let unit = self
            .compile(name, code)
            .map_err(InterpretErrorKind::Compile)?;
        self.run(&unit)
    }

    fn slot_mut(&mut self, id: SlotId) -> &mut NaslValue {
        if id >= self.slots.len() {
            self.slots.resize(id + 1, NaslValue::Null);
        }
        &mut self.slots[id]
    }

    fn slot(&self, id: SlotId) -> NaslValue {
        self.slots.get(id).cloned().unwrap_or_default()
    }

    fn push(&mut self, value: NaslValue) {
        self.stack.push(Operand::Value(value));
    }

    fn pop(&mut self) -> Result<Operand, InterpretErrorKind> {
        self.stack.pop().ok_or(InterpretErrorKind::StackUnderflow)
    }

    fn pop_value(&mut self) -> Result<NaslValue, InterpretErrorKind> {
        match self.pop()? {
            Operand::Value(value) => Ok(value),
            Operand::Ref(place) => self.read(&place),
        }
    }

    fn pop_place(&mut self) -> Result<Place, InterpretErrorKind> {
        match self.pop()? {
            Operand::Ref(place) => Ok(place),
            Operand::Value(_) => Err(InterpretErrorKind::ExpectedReference),
        }
    }

    fn pop_many(&mut self, n: usize) -> Result<Vec<Operand>, InterpretErrorKind> {
        let at = self
            .stack
            .len()
            .checked_sub(n)
            .ok_or(InterpretErrorKind::StackUnderflow)?;
        Ok(self.stack.split_off(at))
    }

    fn pop_values(&mut self, n: usize) -> Result<Vec<NaslValue>, InterpretErrorKind> {
        self.pop_many(n)?
            .into_iter()
            .map(|operand| match operand {
                Operand::Value(value) => Ok(value),
                Operand::Ref(place) => self.read(&place),
            })
            .collect()
    }

    /// The fetch decode execute loop. Leaves the stack as it found it.
    fn execute(&mut self, code: &[Instruction]) -> Result {
        let base = self.stack.len();
        let mut pc = 0;
        while let Some(instruction) = code.get(pc) {
            pc += 1;
            match self.step(instruction) {
                Ok(Flow::Next) => {}
                Ok(Flow::Jump(target)) => pc = target,
                Ok(Flow::Return(value)) => {
                    self.stack.truncate(base);
                    return Ok(value);
                }
                Err(Interrupt::Fault(mut e)) => {
                    if e.position.is_none() {
                        e.position = Some(instruction.position.clone());
                    }
                    self.stack.truncate(base);
                    return Err(Interrupt::Fault(e));
                }
                Err(e) => {
                    self.stack.truncate(base);
                    return Err(e);
                }
            }
        }
        let result = if self.stack.len() > base {
            self.pop_value()?
        } else {
            NaslValue::Null
        };
        self.stack.truncate(base);
        Ok(result)
    }

    fn step(&mut self, instruction: &Instruction) -> Result<Flow> {
        use OpCode::*;
        let Instruction {
            op, unary, op1, ..
        } = instruction;
        match op {
            Nop | ScopeEnter => {}
            PushValue => self.push(op1.clone()),
            PushRef => {
                let value = self.slot(*unary);
                self.push(value);
            }
            PushLeftRef => self.stack.push(Operand::Ref(Place::slot(*unary))),
            PushList => {
                let values = self.pop_values(*unary)?;
                self.push(NaslValue::list(values));
            }
            PushGenList => {
                let path = self.pop_values(unary.saturating_sub(1))?;
                let mut place = self.pop_place()?;
                place.path.extend(path);
                self.stack.push(Operand::Ref(place));
            }
            Pop => {
                self.pop()?;
            }
            Dup => {
                let top = self
                    .stack
                    .last()
                    .cloned()
                    .ok_or(InterpretErrorKind::StackUnderflow)?;
                self.stack.push(top);
            }
            Assign => {
                let value = self.pop_value()?;
                let place = self.pop_place()?;
                self.write(&place, value.clone())?;
                self.push(value);
            }
            PlusEq | MinusEq | MulEq | DivEq | ModEq | ShlEq | ShrEq => {
                let place = self.pop_place()?;
                let rhs = self.pop_value()?;
                let current = self.read(&place)?;
                let value = operator::binary(*op, &current, &rhs)?;
                self.write(&place, value.clone())?;
                self.push(value);
            }
            PlusPlus | MinusMinus => {
                let delta = if *op == PlusPlus { 1 } else { -1 };
                let place = self.pop_place()?;
                let current = self.read(&place)?;
                let value = operator::step(&current, delta)?;
                self.write(&place, value.clone())?;
                if *unary != 0 {
                    let prefix = op1.to_bool();
                    self.push(if prefix {
                        value
                    } else if current.is_null() {
                        NaslValue::Number(0)
                    } else {
                        current
                    });
                }
            }
            Add | Sub | Mul | Div | Mod | Shl | Shr | BitAnd | BitOr | BitXor | Eq | NotEq
            | Lt | LtEq | Gt | GtEq => {
                let rhs = self.pop_value()?;
                let lhs = self.pop_value()?;
                let value = operator::binary(*op, &lhs, &rhs)?;
                self.push(value);
            }
            Not => {
                let value = self.pop_value()?;
                self.push(operator::not(&value));
            }
            Neg => {
                let value = self.pop_value()?;
                self.push(operator::neg(&value)?);
            }
            Plus => {
                let value = self.pop_value()?;
                self.push(operator::plus(&value)?);
            }
            Jmp => return Ok(Flow::Jump(*unary)),
            JmpFop | JmpTop => {
                let condition = self.pop_value()?.to_bool();
                if condition == (*op == JmpTop) {
                    return Ok(Flow::Jump(*unary));
                }
            }
            Call => {
                let value = self.call(instruction)?;
                self.push(value);
            }
            IterableCall => self.advance_iterator(*unary)?,
            ScopeExit => {
                if let NaslValue::Array(ids) = op1 {
                    for id in ids.values() {
                        if let NaslValue::Number(id) = id {
                            *self.slot_mut(*id as SlotId) = NaslValue::Null;
                        }
                    }
                }
            }
            Include => {
                let name = self.pop_value()?;
                self.include(&name)?;
            }
            Return => {
                let value = self.pop_value()?;
                return Ok(Flow::Return(value));
            }
            Exit => {
                let mut args = self.pop_values(*unary)?.into_iter();
                let code = args.next().map(|v| v.to_number()).unwrap_or_default();
                let message = args.next().filter(|v| !v.is_null()).map(|v| v.to_string());
                debug!(code, ?message, "exit");
                return Err(Interrupt::Exit(ExitSignal { code, message }));
            }
        }
        Ok(Flow::Next)
    }

    /// Pops the iterator reference, advances the iterator stored in its slot
    /// and pushes the next value and whether there was one. The loop
    /// variable reference below stays in place.
    fn advance_iterator(&mut self, entries: usize) -> Result<(), InterpretErrorKind> {
        debug_assert_eq!(entries, 2);
        let place = self.pop_place()?;
        let (value, ok) = match self.slot_mut(place.slot) {
            NaslValue::Iterator(it) => it.next_value(),
            NaslValue::Null => (NaslValue::Null, false),
            x => return Err(InterpretErrorKind::ExpectedIterator(x.type_name())),
        };
        self.push(value);
        self.push(NaslValue::Boolean(ok));
        Ok(())
    }
}
