// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use crate::nasl::test_prelude::*;

#[test]
fn pow() {
    check_code_result("2 ** 10;", 1024);
    check_code_result("(-2) ** 3;", -8);
    check_code_result("5 ** 0;", 1);
    check_code_result("2 ** 40;", 1_099_511_627_776_i64);
}

#[test]
fn pow_with_negative_exponent() {
    check_code_result("2 ** -1;", 0);
    check_code_result("1 ** -5;", 1);
    check_code_result("(-1) ** -2;", 1);
    check_code_result("(-1) ** -3;", -1);
}

#[test]
fn logical_right_shift() {
    check_code_result("16 >>> 2;", 4);
    check_code_result("-1 >>> 28;", 15);
    check_code_result("a = 32; a >>>= 3; a;", 4);
}

#[test]
fn logical_left_shift() {
    check_code_result("1 <<< 4;", 16);
    check_code_result("a = 3; a <<<= 1; a;", 6);
}

#[test]
fn bit_not() {
    check_code_result("~0;", -1);
    check_code_result("~5;", -6);
    check_code_result("~~7;", 7);
}

#[test]
fn regex_match() {
    check_code_result(r#""OpenSSH_8.9" =~ "^OpenSSH_[0-9]";"#, 1);
    check_code_result(r#""Apache" =~ "^nginx";"#, 0);
    check_code_result(r#""Apache" !~ "^nginx";"#, 1);
}

#[test]
fn substring_containment() {
    check_code_result(r#""bc" >< "abcd";"#, 1);
    check_code_result(r#""xy" >< "abcd";"#, 0);
    check_code_result(r#""xy" >!< "abcd";"#, 1);
}

#[test]
fn array_element_access() {
    let mut t = TestBuilder::default();
    t.run("a = make_list(1, 2, 3);");
    t.ok("a[1];", 2);
    t.ok("a[7];", NaslValue::Null);
    t.run(r#"h = make_array("name", "nasl");"#);
    t.ok(r#"h["name"];"#, "nasl");
    t.ok(r#"h.name;"#, "nasl");
    t.ok(r#"h["other"];"#, NaslValue::Null);
}

#[test]
fn strings_are_indexed_by_char() {
    let mut t = TestBuilder::default();
    t.run(r#"s = "hello";"#);
    t.ok("s[0];", "h");
    t.ok("s[4];", "o");
    t.ok("s[5];", NaslValue::Null);
}

#[test]
fn indexing_other_values_is_undefined() {
    check_code_result("x = 5; x[0];", NaslValue::Null);
}
