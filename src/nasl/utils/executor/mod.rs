// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! This module contains the `Executor` type, as well as utility functions and macros
//! to conveniently build sets of functions for a particular purpose.
//!
//! NASL functions are either stateless, taking the call parameters and the
//! `Context`, or stateful, additionally taking a reference to the state of
//! the set they belong to.
//!
//! In order to create new sets of NASL functions, the `function_set!` macro is provided.

use std::collections::HashMap;

use super::{Context, NaslResult, Params};

pub type StatelessFn = fn(&Params, &Context) -> NaslResult;

pub enum NaslFunction<State> {
    Stateless(StatelessFn),
    Stateful(fn(&State, &Params, &Context) -> NaslResult),
}

#[derive(Default)]
/// The executor. This is the main outward facing type of this module
/// and fulfills two main roles:
/// 1. Keeping track of all the registered, builtin NASL functions.
/// 2. Storing the state required to call those functions, if necessary.
///
/// It is built once and shared read only between script runs.
pub struct Executor {
    sets: Vec<Box<dyn FunctionSet + Send + Sync>>,
}

impl Executor {
    /// Construct an executor for a single function set.
    pub fn single<S: IntoFunctionSet + 'static>(s: S) -> Self
    where
        <S as IntoFunctionSet>::State: Send + Sync,
    {
        let mut exec = Self::default();
        exec.add_set(s);
        exec
    }

    pub fn add_set<S: IntoFunctionSet + 'static>(&mut self, s: S) -> &mut Self
    where
        <S as IntoFunctionSet>::State: Send + Sync,
    {
        self.sets.push(Box::new(S::into_function_set(s)));
        self
    }

    /// Calls the function `k`. Returns `None` when no set provides it.
    pub fn exec(&self, k: &str, params: &Params, context: &Context) -> Option<NaslResult> {
        self.sets.iter().find_map(|set| set.exec(k, params, context))
    }

    pub fn contains(&self, k: &str) -> bool {
        self.sets.iter().any(|set| set.contains(k))
    }

    /// Names of all registered functions, sorted.
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sets.iter().flat_map(|set| set.names()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

pub struct StoredFunctionSet<State> {
    state: State,
    fns: HashMap<String, NaslFunction<State>>,
}

impl<State> StoredFunctionSet<State> {
    pub fn new(state: State) -> Self {
        Self {
            state,
            fns: HashMap::new(),
        }
    }

    pub fn sync_stateful(&mut self, k: &str, v: fn(&State, &Params, &Context) -> NaslResult) {
        self.fns.insert(k.to_string(), NaslFunction::Stateful(v));
    }

    pub fn sync_stateless(&mut self, k: &str, v: StatelessFn) {
        self.fns.insert(k.to_string(), NaslFunction::Stateless(v));
    }

    /// Add the functions of a stateless set to this set. This is useful in
    /// order to combine multiple smaller sets into one large set which can
    /// then be exported. Stateful functions of `other` are skipped, since
    /// their state would be lost.
    pub fn add_set<State2>(&mut self, other: impl IntoFunctionSet<State = State2>) {
        let set = other.into_function_set();
        self.fns
            .extend(set.fns.into_iter().filter_map(|(name, f)| match f {
                NaslFunction::Stateless(f) => Some((name, NaslFunction::Stateless(f))),
                NaslFunction::Stateful(_) => None,
            }));
    }
}

/// A set of functions together with their name.
///
/// There should only be a single type that implements `FunctionSet`
/// (namely `StoredFunctionSet`), but this trait is nevertheless
/// useful in order to store `StoredFunctionSet`s of different type
/// within the `Executor`.
pub trait FunctionSet {
    fn exec(&self, k: &str, params: &Params, context: &Context) -> Option<NaslResult>;

    fn contains(&self, k: &str) -> bool;

    fn names(&self) -> Vec<&str>;
}

impl<State> FunctionSet for StoredFunctionSet<State> {
    fn exec(&self, k: &str, params: &Params, context: &Context) -> Option<NaslResult> {
        let f = self.fns.get(k)?;
        Some(match f {
            NaslFunction::Stateful(f) => f(&self.state, params, context),
            NaslFunction::Stateless(f) => f(params, context),
        })
    }

    fn contains(&self, k: &str) -> bool {
        self.fns.contains_key(k)
    }

    fn names(&self) -> Vec<&str> {
        self.fns.keys().map(String::as_str).collect()
    }
}

/// Anything that can be converted into a `StoredFunctionSet`.
pub trait IntoFunctionSet {
    /// The state associated with the function set.
    /// Can be a ZST/marker type for stateless functions.
    type State;
    fn into_function_set(self) -> StoredFunctionSet<Self::State>;
}

#[macro_export]
macro_rules! internal_call_expr {
    ($method_name: ident, $set_name: ident $(,)?) => {
    };
    ($method_name: ident, $set_name: ident, ($fn_name: path, $name: literal) $(, $($tt: tt)*)?) => {
        $set_name.$method_name($name, $fn_name);
        $(
            $crate::internal_call_expr!($method_name, $set_name, $($tt)*);
        )?
    };
    ($method_name: ident, $set_name: ident, $fn_name: path $(, $($tt: tt)*)?) => {
        $set_name.$method_name(stringify!($fn_name), $fn_name);
        $(
            $crate::internal_call_expr!($method_name, $set_name, $($tt)*);
        )?
    };
}

/// Convenience macro to define a set of functions.
/// Example:
/// ```rust ignore
/// # use crate::nasl::prelude::*;
/// struct Foo;
///
/// fn foo(_: &Params, _: &Context) -> NaslResult {
///     Ok(NaslValue::Null)
/// }
///
/// function_set! {
///    Foo,
///    sync_stateless,
///    (
///        foo,
///        (foo, "bar"),
///    )
/// }
/// ```
///
/// This will implement `IntoFunctionSet` for `Foo`, so that it can be
/// used within the executor. A `(path, "name")` pair registers a function
/// under a name that is not a valid Rust identifier or differs from it.
///
/// The second argument is either `sync_stateless` (for
/// `fn(&Params, &Context)`) or `sync_stateful` (for
/// `fn(&S, &Params, &Context)`).
#[macro_export]
macro_rules! function_set {
    ($ty: ty, $method_name: ident, ($($tt: tt)*)) => {
        impl $crate::nasl::utils::IntoFunctionSet for $ty {
            type State = $ty;

            #[allow(unused_mut)]
            fn into_function_set(self) -> $crate::nasl::utils::StoredFunctionSet<Self::State> {
                let mut set = $crate::nasl::utils::StoredFunctionSet::new(self);
                $crate::internal_call_expr!($method_name, set, $($tt)*);
                set
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nasl::{interpreter::NaslValue, utils::ScriptCtx};

    struct Numbers;

    fn one(_: &Params, _: &Context) -> NaslResult {
        Ok(NaslValue::Number(1))
    }

    function_set! {
        Numbers,
        sync_stateless,
        (
            one,
            (one, "uno"),
        )
    }

    struct Counter(i64);

    impl Counter {
        fn value(&self, _: &Params, _: &Context) -> NaslResult {
            Ok(NaslValue::Number(self.0))
        }
    }

    function_set! {
        Counter,
        sync_stateful,
        (
            (Counter::value, "counter"),
        )
    }

    #[test]
    fn dispatch_by_name() {
        let mut executor = Executor::single(Numbers);
        executor.add_set(Counter(7));
        let script = ScriptCtx::new("test.nasl");
        let none = |_: &str| false;
        let ctx = Context::new(&script, &executor, "uno", None, &none);
        let params = Params::default();
        assert_eq!(
            executor.exec("uno", &params, &ctx).map(|r| r.ok()),
            Some(Some(NaslValue::Number(1)))
        );
        assert_eq!(
            executor.exec("counter", &params, &ctx).map(|r| r.ok()),
            Some(Some(NaslValue::Number(7)))
        );
        assert!(executor.exec("missing", &params, &ctx).is_none());
        assert_eq!(executor.function_names(), vec!["counter", "one", "uno"]);
    }
}
