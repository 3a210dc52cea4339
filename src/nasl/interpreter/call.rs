// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::sync::Arc;

use indexmap::IndexMap;
use itertools::Itertools;
use tracing::{debug, warn};

use super::{
    FunctionCallError, InterpretErrorKind, Interpreter, NaslValue, Operand, Result,
};
use crate::nasl::{
    code::{FunctionCode, Instruction, Position, SlotId},
    utils::{Context, Params, lookup_keys::FUNCTION_PREFIX},
};

/// Call arguments as they were pushed: keyword arguments are identified by
/// the label id of their name.
struct Arguments {
    positional: Vec<NaslValue>,
    named: Vec<(SlotId, NaslValue)>,
}

impl Interpreter<'_> {
    /// Executes a `Call` instruction. The callee entry sits below the
    /// `unary` argument entries.
    pub(super) fn call(&mut self, instruction: &Instruction) -> Result {
        let entries = self.pop_many(instruction.unary)?;
        let callee = self.pop_value()?;
        let args = self.arguments(entries)?;
        match &instruction.op1 {
            NaslValue::Boolean(true) => {
                let label = callee.to_number() as SlotId;
                self.call_builtin(label, args, &instruction.position)
            }
            NaslValue::String(name) => self.call_user(name, callee, args),
            _ => Err(InterpretErrorKind::NotCallable(callee.type_name()).into()),
        }
    }

    fn arguments(&self, entries: Vec<Operand>) -> Result<Arguments, InterpretErrorKind> {
        let mut args = Arguments {
            positional: vec![],
            named: vec![],
        };
        let mut entries = entries.into_iter();
        while let Some(entry) = entries.next() {
            match entry {
                Operand::Value(value) => args.positional.push(value),
                Operand::Ref(label) => {
                    let value = match entries.next() {
                        Some(Operand::Value(value)) => value,
                        Some(Operand::Ref(place)) => self.read(&place)?,
                        None => return Err(InterpretErrorKind::StackUnderflow),
                    };
                    args.named.push((label.slot, value));
                }
            }
        }
        Ok(args)
    }

    fn label(&self, id: SlotId) -> &str {
        self.symbols.get_name_by_variable_id(id).unwrap_or_default()
    }

    fn is_user_function(&self, name: &str) -> bool {
        self.symbols
            .get_symbol_by_variable_name(&format!("{FUNCTION_PREFIX}{name}"))
            .and_then(|id| self.slots.get(id))
            .is_some_and(|value| matches!(value, NaslValue::Function(_)))
    }

    fn call_builtin(&mut self, label: SlotId, args: Arguments, position: &Position) -> Result {
        let name = self.label(label).to_owned();
        let named: IndexMap<String, NaslValue> = args
            .named
            .into_iter()
            .map(|(id, value)| (self.label(id).to_owned(), value))
            .collect();
        let params = Params::new(args.positional, named);
        let user_functions = |name: &str| self.is_user_function(name);
        let context = Context::new(
            self.script,
            self.executor,
            &name,
            Some(position),
            &user_functions,
        );
        match self.executor.exec(&name, &params, &context) {
            None => Err(InterpretErrorKind::UndefinedFunction(name).into()),
            Some(Ok(value)) => Ok(value),
            Some(Err(e)) if e.is_fatal() => {
                Err(InterpretErrorKind::FunctionCall(FunctionCallError::new(&name, e.kind)).into())
            }
            Some(Err(e)) => {
                let args = params
                    .positionals()
                    .iter()
                    .map(ToString::to_string)
                    .chain(params.named().map(|(k, v)| format!("{k}: {v}")))
                    .join(", ");
                warn!(
                    "call build in function `{name}({args})` error in script `{}`: {e}",
                    self.script.filename()
                );
                Ok(e.return_value().clone().unwrap_or_default())
            }
        }
    }

    /// Calls a user defined function. The slots of its locals are saved and
    /// reset before the call and restored afterwards.
    fn call_user(&mut self, name: &str, callee: NaslValue, args: Arguments) -> Result {
        let function: Arc<FunctionCode> = match callee {
            NaslValue::Function(function) => function,
            NaslValue::Null => {
                return Err(InterpretErrorKind::UndefinedFunction(name.to_owned()).into());
            }
            x => return Err(InterpretErrorKind::NotCallable(x.type_name()).into()),
        };
        if self.depth >= self.options.max_call_depth {
            return Err(InterpretErrorKind::CallDepthExceeded(self.options.max_call_depth).into());
        }
        let named: Vec<(SlotId, NaslValue)> = args
            .named
            .into_iter()
            .filter_map(|(label, value)| {
                let param = self.label(label);
                let slot = function.param_slot(param);
                if slot.is_none() {
                    debug!(function = name, param, "ignoring unknown keyword argument");
                }
                slot.map(|slot| (slot, value))
            })
            .collect();
        let saved: Vec<(SlotId, NaslValue)> = function
            .locals
            .iter()
            .map(|&slot| (slot, std::mem::take(self.slot_mut(slot))))
            .collect();
        for (slot, value) in named {
            *self.slot_mut(slot) = value;
        }
        *self.slot_mut(function.anon_args) = NaslValue::list(args.positional);

        self.depth += 1;
        let result = self.execute(&function.code);
        self.depth -= 1;

        for (slot, value) in saved {
            *self.slot_mut(slot) = value;
        }
        result
    }
}
