// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Utilities to test the outcome of NASL code

use std::{
    fmt::{self, Display, Formatter},
    panic::Location,
};

use super::{
    builtin::{nasl_std_functions, nasl_std_variables},
    prelude::*,
    utils::{Executor, ScanResult},
};

/// The outcome of one line of NASL code.
pub type LineResult = Result<NaslValue, Interrupt>;

#[derive(Clone)]
struct CodeLocation {
    file: String,
    line: u32,
    col: u32,
}

impl CodeLocation {
    fn new(location: &Location) -> Self {
        Self {
            file: location.file().to_string(),
            line: location.line(),
            col: location.column(),
        }
    }
}

impl Display for CodeLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

/// Contains the desired result of a line of
/// NASL code.
enum TestResult {
    /// Expect the Result to be `Ok(val)` and compare `val` against a
    /// given `NaslValue`
    Ok(NaslValue),
    /// Performs a check described by the closure. To still provide
    /// decent error messages, the second argument may contain a
    /// String describing the expected result.
    GenericCheck(Box<dyn Fn(&LineResult) -> bool>, Option<String>),
    /// Do not perform any check.
    None,
}

struct Line {
    code: String,
    expected: TestResult,
    location: CodeLocation,
}

/// A helper struct for quickly building tests of NASL code.
/// Lines of NASL code can be added to the `TestBuilder` one by one. All
/// lines run in order within one interpreter, so later lines see the
/// variables and functions of earlier ones.
/// If the `TestBuilder` is dropped, it will automatically verify that
/// the given code fulfill the requirements (such as producing the right
/// values or the right errors).
pub struct TestBuilder {
    lines: Vec<Line>,
    executor: Executor,
    loader: Loader,
    options: InterpreterOptions,
    script: Box<dyn Fn() -> ScriptCtx>,
    last_run: Option<ScriptCtx>,
    should_verify: bool,
}

impl Default for TestBuilder {
    fn default() -> Self {
        let mut options = InterpreterOptions::default();
        options.compile.keep_last_value = true;
        Self {
            lines: vec![],
            executor: nasl_std_functions(),
            loader: Loader::empty(),
            options,
            script: Box::new(|| ScriptCtx::new("test.nasl")),
            last_run: None,
            should_verify: true,
        }
    }
}

impl TestBuilder {
    /// Construct a `TestBuilder`, immediately run the
    /// given code on it and return it.
    pub fn from_code(code: impl AsRef<str>) -> Self {
        let mut t = Self::default();
        t.run_all(code.as_ref());
        t
    }

    #[track_caller]
    fn add_line(&mut self, code: impl Into<String>, expected: TestResult) -> &mut Self {
        self.lines.push(Line {
            code: code.into(),
            expected,
            location: CodeLocation::new(Location::caller()),
        });
        self
    }

    /// Check that a `line` of NASL code results in `val`.
    #[track_caller]
    pub fn ok(&mut self, line: impl Into<String>, val: impl Into<NaslValue>) -> &mut Self {
        self.add_line(line, TestResult::Ok(val.into()))
    }

    /// Perform a check on a `line` of code using the given function `f`.
    #[track_caller]
    pub fn check(
        &mut self,
        line: impl Into<String>,
        f: impl Fn(&LineResult) -> bool + 'static,
        expected: Option<impl Into<String>>,
    ) -> &mut Self {
        self.add_line(
            line,
            TestResult::GenericCheck(Box::new(f), expected.map(|s| s.into())),
        )
    }

    /// Run a `line` of NASL code without checking its result.
    #[track_caller]
    pub fn run(&mut self, line: impl Into<String>) -> &mut Self {
        self.add_line(line, TestResult::None)
    }

    /// Runs a whole script as a single line.
    #[track_caller]
    pub fn run_all(&mut self, code: impl Into<String>) {
        self.add_line(code, TestResult::None);
    }

    pub fn with_loader(mut self, loader: Loader) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_options(mut self, f: impl FnOnce(&mut InterpreterOptions)) -> Self {
        f(&mut self.options);
        self
    }

    /// Every run gets a fresh script context created by `f`.
    pub fn with_script(mut self, f: impl Fn() -> ScriptCtx + 'static) -> Self {
        self.script = Box::new(f);
        self
    }

    /// Runs all lines in a fresh interpreter.
    pub fn results(&mut self) -> Vec<LineResult> {
        let script = (self.script)();
        let mut interpreter =
            Interpreter::new(&self.executor, &script, &self.loader, self.options.clone());
        for (name, value) in nasl_std_variables(&script) {
            interpreter.define(name, value);
        }
        let results = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| interpreter.run_code(&format!("line {}", i + 1), &line.code))
            .collect();
        drop(interpreter);
        self.last_run = Some(script);
        results
    }

    /// The script info the last run declared.
    pub fn script_info(&mut self) -> ScriptInfo {
        self.last_script().script_info()
    }

    /// The results the last run reported.
    pub fn scan_results(&mut self) -> Vec<ScanResult> {
        self.last_script().results()
    }

    fn last_script(&mut self) -> &ScriptCtx {
        if self.last_run.is_none() {
            self.results();
        }
        self.last_run.get_or_insert_with(|| ScriptCtx::new("test.nasl"))
    }

    /// Check that no line of code results in an error.
    pub fn check_no_errors(&mut self) {
        let results = self.results();
        for (line, result) in self.lines.iter().zip(results) {
            if let Err(e) = result {
                panic!(
                    "Expected no errors, found {e}. Code:\n{}\nAt {}",
                    line.code, line.location
                );
            }
        }
        self.should_verify = false;
    }

    fn verify(&mut self) -> Result<(), String> {
        let results = self.results();
        for (line, result) in self.lines.iter().zip(results) {
            let ok = match &line.expected {
                TestResult::Ok(expected) => matches!(&result, Ok(v) if v == expected),
                TestResult::GenericCheck(f, _) => f(&result),
                TestResult::None => true,
            };
            if !ok {
                let expected = match &line.expected {
                    TestResult::Ok(v) => format!("Ok({v:?})"),
                    TestResult::GenericCheck(_, Some(desc)) => desc.clone(),
                    TestResult::GenericCheck(_, None) => "<check>".to_owned(),
                    TestResult::None => unreachable!(),
                };
                return Err(format!(
                    "Mismatch at {}.\n\tIn code \"{}\":\n\tExpected: {expected}\n\tFound:    {result:?}",
                    line.location, line.code
                ));
            }
        }
        Ok(())
    }
}

impl Drop for TestBuilder {
    fn drop(&mut self) {
        if !self.should_verify || std::thread::panicking() {
            return;
        }
        if let Err(err) = self.verify() {
            panic!("{}", err)
        }
    }
}

/// Check that the value returned from a line of NASL code is
/// Ok(...) and that the inner value is equal to the expected
/// value. This is a convenience function to check single lines
/// of code that require no state.
#[track_caller]
pub fn check_code_result(code: &str, expected: impl Into<NaslValue>) {
    let mut test_builder = TestBuilder::default();
    test_builder.ok(code, expected);
}

/// Check that the line of NASL code faults and that the kind of the fault
/// matches a pattern of `InterpretErrorKind`.
/// If the first argument is a `TestBuilder`
/// the line is executed in the given builder.
/// Otherwise (that is, if only two arguments are given),
/// perform a check on the line of code using a new `TestBuilder`.
#[macro_export]
macro_rules! check_err_matches {
    ($t: ident, $code: expr, $pat: pat $(,)?) => {
        $t.check(
            $code,
            |result| match result {
                Err($crate::nasl::interpreter::Interrupt::Fault(e)) => matches!(&e.kind, $pat),
                _ => false,
            },
            Some(stringify!($pat)),
        );
    };
    ($code: expr, $pat: pat $(,)?) => {
        let mut t = $crate::nasl::test_utils::TestBuilder::default();
        check_err_matches!(t, $code, $pat);
    };
}

/// Check that the line of NASL code returns an Ok variant
/// and that the inner value matches a pattern.
#[macro_export]
macro_rules! check_code_result_matches {
    ($code: expr, $pat: pat $(if $guard: expr)? $(,)?) => {
        let mut t = $crate::nasl::test_utils::TestBuilder::default();
        t.check(
            $code,
            |val| matches!(val, Ok($pat) $(if $guard)?),
            Some(stringify!($pat)),
        );
    };
}
