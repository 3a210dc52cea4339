// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::nasl::code::SlotId;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("variable {0} is already declared in this scope")]
    Redeclared(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Root,
    Function,
    Block,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    names: HashMap<String, SlotId>,
    declared: Vec<SlotId>,
}

impl Scope {
    fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            names: HashMap::new(),
            declared: vec![],
        }
    }
}

/// Maps variable names to slots.
///
/// Slot ids come from a single counter and are never reused, so a shadowing
/// declaration in an inner scope never shares storage with the outer one.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    names_by_id: Vec<String>,
    labels: HashMap<String, SlotId>,
    inited: HashSet<SlotId>,
    /// Ids created by a declaration, as opposed to a first use.
    explicit: HashSet<SlotId>,
    strict_redeclaration: bool,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeKind::Root)],
            names_by_id: vec![],
            labels: HashMap::new(),
            inited: HashSet::new(),
            explicit: HashSet::new(),
            strict_redeclaration: false,
        }
    }

    /// Rejects declaring a name twice within the same scope. A name that was
    /// only used before may still be declared once.
    pub fn set_strict_redeclaration(&mut self, strict: bool) {
        self.strict_redeclaration = strict;
    }

    fn allocate(&mut self, name: &str) -> SlotId {
        self.names_by_id.push(name.to_owned());
        self.names_by_id.len() - 1
    }

    fn declare_at(&mut self, scope: usize, name: &str) -> Result<SlotId, SymbolError> {
        if let Some(&id) = self.scopes[scope].names.get(name) {
            if !self.explicit.insert(id) && self.strict_redeclaration {
                return Err(SymbolError::Redeclared(name.to_owned()));
            }
            return Ok(id);
        }
        let id = self.allocate(name);
        self.explicit.insert(id);
        let scope = &mut self.scopes[scope];
        scope.names.insert(name.to_owned(), id);
        scope.declared.push(id);
        Ok(id)
    }

    /// Declares `name` in the innermost scope.
    pub fn new_symbol(&mut self, name: &str) -> Result<SlotId, SymbolError> {
        self.declare_at(self.scopes.len() - 1, name)
    }

    /// Declares `name` in the root scope.
    pub fn new_global_symbol(&mut self, name: &str) -> Result<SlotId, SymbolError> {
        self.declare_at(0, name)
    }

    /// Declares `name` in the innermost function scope, or the root scope
    /// outside of functions.
    pub fn new_implicit_symbol(&mut self, name: &str) -> SlotId {
        let scope = self
            .scopes
            .iter()
            .rposition(|s| s.kind != ScopeKind::Block)
            .unwrap_or(0);
        if let Some(id) = self.scopes[scope].names.get(name) {
            return *id;
        }
        let id = self.allocate(name);
        let scope = &mut self.scopes[scope];
        scope.names.insert(name.to_owned(), id);
        scope.declared.push(id);
        id
    }

    /// Resolves `name` in the root scope only, declaring it when missing.
    pub fn global_symbol(&mut self, name: &str) -> SlotId {
        if let Some(id) = self.scopes[0].names.get(name) {
            return *id;
        }
        let id = self.allocate(name);
        self.scopes[0].names.insert(name.to_owned(), id);
        self.scopes[0].declared.push(id);
        id
    }

    /// Allocates a slot in the innermost scope that can not be found by
    /// name.
    pub fn new_hidden_symbol(&mut self, purpose: &str) -> SlotId {
        let id = self.allocate(&format!("<{purpose}>"));
        if let Some(scope) = self.scopes.last_mut() {
            scope.declared.push(id);
        }
        id
    }

    /// Returns the id of a name that is only used as an identifier, such as
    /// a keyword argument or a builtin name.
    pub fn label_id(&mut self, name: &str) -> SlotId {
        if let Some(id) = self.labels.get(name) {
            return *id;
        }
        let id = self.allocate(name);
        self.labels.insert(name.to_owned(), id);
        id
    }

    /// Resolves through nested scopes, innermost first.
    pub fn get_symbol_by_variable_name(&self, name: &str) -> Option<SlotId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.names.get(name).copied())
    }

    pub fn get_name_by_variable_id(&self, id: SlotId) -> Option<&str> {
        self.names_by_id.get(id).map(String::as_str)
    }

    pub fn set_id_is_inited(&mut self, id: SlotId) {
        self.inited.insert(id);
    }

    pub fn id_is_inited(&self, id: SlotId) -> bool {
        self.inited.contains(&id)
    }

    pub fn push_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope::new(kind));
    }

    /// Pops the innermost scope and returns the ids declared in it. The
    /// root scope is never popped.
    pub fn pop_scope(&mut self) -> Vec<SlotId> {
        if self.scopes.len() == 1 {
            return vec![];
        }
        self.scopes
            .pop()
            .map(|scope| scope.declared)
            .unwrap_or_default()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// The number of slots handed out so far.
    pub fn slot_count(&self) -> usize {
        self.names_by_id.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_scope_shadows_outer() {
        let mut table = SymbolTable::new();
        let outer = table.new_symbol("a").unwrap();
        table.push_scope(ScopeKind::Block);
        let inner = table.new_symbol("a").unwrap();
        assert_ne!(outer, inner);
        assert_eq!(table.get_symbol_by_variable_name("a"), Some(inner));
        assert_eq!(table.pop_scope(), vec![inner]);
        assert_eq!(table.get_symbol_by_variable_name("a"), Some(outer));
    }

    #[test]
    fn ids_are_never_reused() {
        let mut table = SymbolTable::new();
        table.push_scope(ScopeKind::Block);
        let first = table.new_symbol("a").unwrap();
        table.pop_scope();
        table.push_scope(ScopeKind::Block);
        let second = table.new_symbol("a").unwrap();
        assert!(second > first);
    }

    #[test]
    fn strict_redeclaration() {
        let mut table = SymbolTable::new();
        table.set_strict_redeclaration(true);
        table.new_symbol("a").unwrap();
        assert_eq!(
            table.new_symbol("a"),
            Err(SymbolError::Redeclared("a".into()))
        );
        let used = table.global_symbol("b");
        assert_eq!(table.new_global_symbol("b"), Ok(used));
        assert!(table.new_global_symbol("b").is_err());
        let mut lenient = SymbolTable::new();
        let id = lenient.new_symbol("a").unwrap();
        assert_eq!(lenient.new_symbol("a"), Ok(id));
    }

    #[test]
    fn implicit_symbols_skip_blocks() {
        let mut table = SymbolTable::new();
        table.push_scope(ScopeKind::Function);
        table.push_scope(ScopeKind::Block);
        let id = table.new_implicit_symbol("x");
        assert!(table.pop_scope().is_empty());
        assert_eq!(table.pop_scope(), vec![id]);
        assert_eq!(table.get_symbol_by_variable_name("x"), None);
    }

    #[test]
    fn global_symbols_outlive_functions() {
        let mut table = SymbolTable::new();
        table.push_scope(ScopeKind::Function);
        let id = table.new_global_symbol("g").unwrap();
        table.pop_scope();
        assert_eq!(table.get_symbol_by_variable_name("g"), Some(id));
    }

    #[test]
    fn labels_are_not_variables() {
        let mut table = SymbolTable::new();
        let label = table.label_id("sep");
        assert_eq!(table.label_id("sep"), label);
        assert_eq!(table.get_name_by_variable_id(label), Some("sep"));
        assert_eq!(table.get_symbol_by_variable_name("sep"), None);
        let hidden = table.new_hidden_symbol("iterator");
        assert_ne!(hidden, label);
        assert_eq!(table.slot_count(), 2);
    }

    #[test]
    fn inited_ids() {
        let mut table = SymbolTable::new();
        let id = table.new_symbol("a").unwrap();
        assert!(!table.id_is_inited(id));
        table.set_id_is_inited(id);
        assert!(table.id_is_inited(id));
    }
}
