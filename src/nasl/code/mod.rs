// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! The bytecode produced by the compiler and executed by the interpreter.

use std::{fmt::Display, sync::Arc};

use crate::nasl::interpreter::NaslValue;

/// Index of a variable slot. Slot ids are handed out by the symbol table.
pub type SlotId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpCode {
    Nop,
    /// Pushes `op1`.
    PushValue,
    /// Pushes the value of slot `unary`.
    PushRef,
    /// Pushes a reference to slot `unary`, used as an assignment target or
    /// a keyword argument name.
    PushLeftRef,
    /// Packs the top `unary` values into a list.
    PushList,
    /// Packs a reference and `unary - 1` indices into an indexed reference.
    PushGenList,
    Pop,
    Dup,
    Assign,
    PlusEq,
    MinusEq,
    MulEq,
    DivEq,
    ModEq,
    ShlEq,
    ShrEq,
    PlusPlus,
    MinusMinus,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Not,
    Neg,
    Plus,
    /// Jumps to instruction `unary`.
    Jmp,
    /// Pops the condition and jumps to `unary` when it is false.
    JmpFop,
    /// Pops the condition and jumps to `unary` when it is true.
    JmpTop,
    /// Calls with `unary` stack entries as arguments. `op1` is true for
    /// builtins.
    Call,
    /// Advances the iterator below the target reference and pushes the next
    /// value and whether there was one.
    IterableCall,
    ScopeEnter,
    /// Resets the slots listed in `op1`.
    ScopeExit,
    Include,
    Return,
    Exit,
}

impl OpCode {
    pub fn is_jump(self) -> bool {
        matches!(self, OpCode::Jmp | OpCode::JmpFop | OpCode::JmpTop)
    }

    /// Maps a compound assignment to the binary operator it applies.
    pub fn compound_binary(self) -> Option<OpCode> {
        use OpCode::*;
        Some(match self {
            PlusEq => Add,
            MinusEq => Sub,
            MulEq => Mul,
            DivEq => Div,
            ModEq => Mod,
            ShlEq => Shl,
            ShrEq => Shr,
            _ => return None,
        })
    }
}

/// The source range an instruction was compiled from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub source: Arc<str>,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.start_line, self.start_column)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub op: OpCode,
    pub unary: usize,
    pub op1: NaslValue,
    pub position: Position,
}

impl Instruction {
    pub fn new(op: OpCode, unary: usize, op1: NaslValue, position: Position) -> Self {
        Self {
            op,
            unary,
            op1,
            position,
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<12} {:>4}", format!("{:?}", self.op), self.unary)?;
        match &self.op1 {
            NaslValue::Null => Ok(()),
            NaslValue::String(s) => write!(f, " {s:?}"),
            x => write!(f, " {x}"),
        }
    }
}

/// A compiled user defined function.
#[derive(Debug, PartialEq)]
pub struct FunctionCode {
    pub name: String,
    /// Parameter names and the slots they are bound to.
    pub params: Vec<(String, SlotId)>,
    /// The slot receiving the positional arguments.
    pub anon_args: SlotId,
    /// The slots owned by a call of this function, including parameters;
    /// saved and restored around each call.
    pub locals: Vec<SlotId>,
    pub code: Vec<Instruction>,
}

impl FunctionCode {
    pub fn param_slot(&self, name: &str) -> Option<SlotId> {
        self.params
            .iter()
            .find_map(|(param, slot)| (param == name).then_some(*slot))
    }
}

/// One compiled source file.
#[derive(Clone, Debug, PartialEq)]
pub struct CodeUnit {
    pub name: Arc<str>,
    pub code: Vec<Instruction>,
}

fn disassemble(
    f: &mut std::fmt::Formatter<'_>,
    code: &[Instruction],
    functions: &mut Vec<Arc<FunctionCode>>,
) -> std::fmt::Result {
    for (idx, instruction) in code.iter().enumerate() {
        writeln!(f, "{idx:>5}  {instruction}")?;
        if let NaslValue::Function(func) = &instruction.op1 {
            functions.push(func.clone());
        }
    }
    Ok(())
}

impl Display for CodeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "; {}", self.name)?;
        let mut functions = vec![];
        disassemble(f, &self.code, &mut functions)?;
        while let Some(func) = functions.pop() {
            let params = func.params.iter().map(|(name, _)| name.as_str());
            writeln!(
                f,
                "\n; function {}({})",
                func.name,
                itertools::join(params, ", ")
            )?;
            disassemble(f, &func.code, &mut functions)?;
        }
        Ok(())
    }
}
