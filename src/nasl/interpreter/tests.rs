// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use crate::nasl::test_prelude::*;

#[test]
fn integer_addition() {
    check_code_result("x = 1 + 2; x;", 3);
    check_code_result("x = -5 + 2; x;", -3);
    check_code_result("x = 0x10 + 010; x;", 24);
}

#[test]
fn integers_widen_without_losing_their_value() {
    let mut t = TestBuilder::default();
    t.ok("x = 2147483647 + 1; x;", 2147483648_i64);
    t.ok("typeof(x);", "int64");
    t.ok("typeof(2147483647);", "int");
    t.ok("y = x - 1; typeof(y);", "int");
}

#[test]
fn logical_operators_yield_their_operands() {
    check_code_result("0 || 5;", 5);
    check_code_result("3 && 4;", 4);
    check_code_result("0 && 4;", 0);
}

#[test]
fn coercion_errors_fault() {
    check_err_matches!(
        "make_list(1) - 1;",
        InterpretErrorKind::UnsupportedOperation { op: "-", .. }
    );
}

#[test]
fn huge_string_repetition_faults() {
    check_err_matches!(
        r#"x = "ab" * 9223372036854775807;"#,
        InterpretErrorKind::StringTooLong(_)
    );
    check_err_matches!(
        r#"x = 134217729 * "ab";"#,
        InterpretErrorKind::StringTooLong(_)
    );
}

#[test]
fn division_by_zero() {
    check_err_matches!("1 / 0;", InterpretErrorKind::DivisionByZero);
    check_err_matches!("1 % 0;", InterpretErrorKind::DivisionByZero);
}

#[test]
fn faults_carry_the_position() {
    let mut t = TestBuilder::default();
    t.check(
        "x = 1;\ny = x / 0;",
        |result| match result {
            Err(Interrupt::Fault(e)) => e.position.as_ref().is_some_and(|p| p.start_line == 2),
            _ => false,
        },
        Some("fault on line 2"),
    );
}

#[test]
fn foreach_sums_a_list() {
    check_code_result(
        r#"a = 0; foreach item([1,2,3]) { a += item; } assert(a == 6, "a != 6"); a;"#,
        6,
    );
}

#[test]
fn foreach_over_arrays_and_undefined() {
    let mut t = TestBuilder::default();
    t.run(r#"h = make_array("a", 1, "b", 2);"#);
    t.ok("s = 0; foreach v (h) s += v; s;", 3);
    t.ok("n = 0; foreach v (undefined_list) n++; n;", 0);
    t.ok(r#"r = ""; foreach c ("abc") r = c + r; r;"#, "abc");
}

#[test]
fn nested_foreach_loops_keep_their_iterators() {
    check_code_result(
        "n = 0; foreach a ([1,2]) foreach b ([1,2,3]) n += a * b; n;",
        18,
    );
}

#[test]
fn for_with_break_and_continue() {
    check_code_result(
        "sum = 0; for (i = 0; i < 5; i++) { if (i == 1) { continue; } if (i == 3) { break; } sum += i; } assert(sum == 2); sum;",
        2,
    );
}

#[test]
fn while_and_repeat() {
    check_code_result("i = 0; while (i < 10) i++; i;", 10);
    check_code_result("i = 0; repeat i++; until i > 3; i;", 4);
}

#[test]
fn continue_restarts_repeat_without_the_condition() {
    check_code_result(
        "i = 0; repeat { i++; if (i < 5) continue; } until 1; i;",
        5,
    );
    check_code_result("i = 0; repeat { i++; if (i == 2) break; } until i > 9; i;", 2);
}

#[test]
fn repeat_operator_runs_the_expression() {
    check_code_result("n = 0; n++ x 3; n;", 3);
}

#[test]
fn break_outside_of_loops_is_ignored() {
    check_code_result("x = 1; break; x;", 1);
}

#[test]
fn increments() {
    let mut t = TestBuilder::default();
    t.ok("a = 1; a++;", 1);
    t.ok("a;", 2);
    t.ok("++a;", 3);
    t.ok("a--;", 3);
    t.ok("--a;", 1);
    t.ok("b++;", 0);
    t.ok("b;", 1);
}

#[test]
fn arrays_are_copied_on_assignment() {
    let mut t = TestBuilder::default();
    t.run("a = make_list(1, 2);");
    t.run("b = a;");
    t.run("b[0] = 5;");
    t.ok("a[0];", 1);
    t.ok("b[0];", 5);
    t.run("c[2][\"x\"] = 3;");
    t.ok("c[2][\"x\"];", 3);
    t.ok("max_index(c);", 3);
}

#[test]
fn recursion() {
    check_code_result(
        "function fib(n) { if (n < 2) return n; return fib(n: n - 1) + fib(n: n - 2); } fib(n: 10);",
        55,
    );
}

#[test]
fn locals_survive_recursive_calls() {
    check_code_result(
        "function f(n) { local = n; if (n > 0) f(n: n - 1); return local; } f(n: 3);",
        3,
    );
}

#[test]
fn functions_read_globals() {
    check_code_result("function get() { return g; } g = 10; get();", 10);
}

#[test]
fn functions_write_declared_globals() {
    check_code_result(
        "global_var counter; counter = 0; function bump() { counter++; } bump(); bump(); counter;",
        2,
    );
}

#[test]
fn functions_write_assigned_globals() {
    check_code_result("g = 1; function f() { g = 5; } f(); g;", 5);
    check_code_result(
        "function add(x) { seen[x] = 1; } seen = make_array(); add(x: \"a\"); add(x: \"b\"); max_index(keys(seen));",
        2,
    );
}

#[test]
fn function_locals_stay_local() {
    check_code_result("g = 1; function f() { local_var g; g = 5; } f(); g;", 1);
    check_code_result("function f() { h = 5; } f(); h;", NaslValue::Null);
}

#[test]
fn anonymous_arguments() {
    check_code_result(
        "function sum() { s = 0; foreach x (_FCT_ANON_ARGS) s += x; return s; } sum(1, 2, 3);",
        6,
    );
}

#[test]
fn unknown_keyword_arguments_are_ignored() {
    check_code_result("function id(a) { return a; } id(a: 1, b: 2);", 1);
}

#[test]
fn functions_without_return_yield_undefined() {
    check_code_result("function f() { x = 1; } f();", NaslValue::Null);
}

#[test]
fn undefined_function() {
    let mut t = TestBuilder::default();
    t.check(
        "not_a_function(1);",
        |result| match result {
            Err(Interrupt::Fault(e)) => matches!(
                &e.kind,
                InterpretErrorKind::UndefinedFunction(name) if name == "not_a_function"
            ),
            _ => false,
        },
        Some("UndefinedFunction"),
    );
}

#[test]
fn call_depth_is_limited() {
    let mut t = TestBuilder::default().with_options(|o| o.max_call_depth = 16);
    check_err_matches!(
        t,
        "function f(n) { return f(n: n + 1); } f(n: 0);",
        InterpretErrorKind::CallDepthExceeded(16),
    );
}

#[test]
fn exit_is_a_signal() {
    let mut t = TestBuilder::default();
    t.check(
        r#"x = 1; exit(3, "done"); x = 2;"#,
        |result| {
            matches!(
                result,
                Err(Interrupt::Exit(ExitSignal { code: 3, message: Some(m) })) if m == "done"
            )
        },
        Some("exit(3)"),
    );
    t.ok("x;", 1);
}

#[test]
fn exit_without_arguments() {
    let mut t = TestBuilder::default();
    t.check(
        "exit();",
        |result| {
            matches!(
                result,
                Err(Interrupt::Exit(ExitSignal {
                    code: 0,
                    message: None
                }))
            )
        },
        Some("exit(0)"),
    );
}

fn include_loader() -> Loader {
    Loader::embedded()
        .with_file(
            "lib.inc",
            "function double(x) { return x * 2; } loaded++; LIB_VERSION = 2;",
        )
        .with_file("broken.inc", "x = ;")
        .build()
}

#[test]
fn include() {
    let mut t = TestBuilder::default().with_loader(include_loader());
    t.run(r#"include("lib.inc");"#);
    t.ok("double(x: 21);", 42);
    t.ok("LIB_VERSION;", 2);
}

#[test]
fn files_are_included_once() {
    let mut t = TestBuilder::default().with_loader(include_loader());
    t.run(r#"include("lib.inc"); include("lib.inc");"#);
    t.ok("loaded;", 1);
}

#[test]
fn include_errors() {
    let mut t = TestBuilder::default().with_loader(include_loader());
    check_err_matches!(
        t,
        r#"include("lib.nasl");"#,
        InterpretErrorKind::InvalidIncludeName(_),
    );
    check_err_matches!(
        t,
        r#"include("missing.inc");"#,
        InterpretErrorKind::Load(_),
    );
    check_err_matches!(
        t,
        r#"include("broken.inc");"#,
        InterpretErrorKind::Compile(_),
    );
}

#[test]
fn compile_errors_are_reported_before_running() {
    let mut t = TestBuilder::default();
    check_err_matches!(t, "x = 1; y = ;", InterpretErrorKind::Compile(_));
    t.ok("isnull(x);", true);
}

#[test]
fn predefined_variables() {
    let mut t = TestBuilder::default();
    t.ok("ACT_GATHER_INFO;", 3);
    t.ok("ACT_END;", 10);
    t.ok("description;", false);
}

#[test]
fn interpreter_api() {
    let executor = crate::nasl::nasl_std_functions();
    let script = ScriptCtx::new("api.nasl");
    let loader = Loader::empty();
    let mut interpreter =
        Interpreter::new(&executor, &script, &loader, InterpreterOptions::default());
    interpreter.define("seed", 4);
    let unit = interpreter.compile("api.nasl", "result = seed * 2;").unwrap();
    assert_eq!(interpreter.run(&unit).unwrap(), NaslValue::Null);
    assert_eq!(interpreter.variable("result"), Some(&NaslValue::Number(8)));
    assert_eq!(interpreter.variable("unknown"), None);
}
