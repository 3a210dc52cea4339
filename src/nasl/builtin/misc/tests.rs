// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::{collections::HashMap, time::Instant};

use crate::nasl::{
    builtin::BuiltinError,
    interpreter::FunctionCallError,
    test_prelude::*,
    utils::FnErrorKind,
};

#[test]
fn nasl_typeof() {
    check_code_result(r#"typeof("hello");"#, "string");
    check_code_result("typeof(1);", "int");
    check_code_result("typeof(TRUE);", "int");
    check_code_result("typeof(5000000000);", "int64");
    check_code_result("typeof(make_list(1));", "array");
    check_code_result("typeof(NULL);", "undef");
    check_code_result("typeof(undefined_variable);", "undef");
}

#[test]
fn isnull() {
    check_code_result("isnull(42);", false);
    check_code_result("isnull(NULL);", true);
    check_code_result("isnull(never_assigned);", true);
    check_code_result(r#"isnull("");"#, false);
}

#[test]
fn defined_func() {
    let mut t = TestBuilder::default();
    t.run("function foo() { return 1; }");
    t.ok(r#"defined_func("foo");"#, true);
    t.ok(r#"defined_func("make_list");"#, true);
    t.ok(r#"defined_func("bar");"#, false);
}

#[test]
fn unixtime() {
    check_code_result_matches!("unixtime();", NaslValue::Number(secs) if *secs > 1_600_000_000);
}

#[test]
fn rand() {
    check_code_result_matches!("rand();", NaslValue::Number(n) if *n >= 0);
}

#[test]
fn usleep() {
    let start = Instant::now();
    check_code_result("usleep(1000);", NaslValue::Null);
    assert!(start.elapsed().as_micros() >= 1000);
}

#[test]
fn display_returns_null() {
    check_code_result(r#"display("hello ", 1);"#, NaslValue::Null);
    check_code_result(r#"dump(1, "a", make_list(1));"#, NaslValue::Null);
}

#[test]
fn assert_passes_on_true() {
    check_code_result("assert(1 == 1);", NaslValue::Null);
}

#[test]
fn failed_assertion_is_fatal() {
    let mut t = TestBuilder::default();
    t.check(
        r#"assert(1 == 2, "numbers differ"); x = 1;"#,
        |result| match result {
            Err(Interrupt::Fault(e)) => matches!(
                &e.kind,
                InterpretErrorKind::FunctionCall(FunctionCallError {
                    function,
                    kind: FnErrorKind::Builtin(BuiltinError::Assertion(msg)),
                }) if function == "assert" && msg == "numbers differ"
            ),
            _ => false,
        },
        Some("assertion fault"),
    );
    t.ok("isnull(x);", true);
}

#[test]
fn scanner_preferences() {
    let mut t = TestBuilder::default().with_script(|| {
        ScriptCtx::new("test.nasl").with_scanner_preferences(HashMap::from([
            ("safe_checks".to_owned(), "yes".to_owned()),
            ("vendor_version".to_owned(), "Example 23.1".to_owned()),
        ]))
    });
    t.ok(r#"get_preference("safe_checks");"#, "yes");
    t.ok(r#"get_preference("unknown");"#, NaslValue::Null);
    t.ok("safe_checks();", true);
    t.ok("vendor_version();", "Example 23.1");
}

#[test]
fn scanner_preferences_default_to_unset() {
    let mut t = TestBuilder::default();
    t.ok("safe_checks();", false);
    t.ok("vendor_version();", "");
    t.ok("get_preference();", NaslValue::Null);
}
