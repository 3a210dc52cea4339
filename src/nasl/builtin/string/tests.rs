// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use crate::nasl::test_prelude::*;

#[test]
fn string() {
    check_code_result(r#"string("hello", " ", 42);"#, "hello 42");
    check_code_result(r#"string("a", NULL, "b");"#, "ab");
    check_code_result("string();", "");
}

#[test]
fn strcat() {
    check_code_result(r#"strcat("a", 1, "b");"#, "a1b");
    check_code_result("strcat();", "");
}

#[test]
fn raw_string() {
    check_code_result("raw_string(0x41, 0x42);", "AB");
    check_code_result(r#"raw_string(0x41, "bc", make_list(0x43));"#, "AbcC");
    check_code_result("strlen(raw_string(0x00, 0xff));", 2);
    check_code_result("ord(raw_string(0xff));", 255);
}

#[test]
fn escapes_decode_to_chars() {
    check_code_result(r#""\x41";"#, "A");
    check_code_result(r#"strlen("a\nb\tc");"#, 5);
    check_code_result(r#"ord("\n");"#, 10);
}

#[test]
fn string_minus_removes_first_occurrence() {
    check_code_result(r#""aaa<b>aaa" - "<b>";"#, "aaaaaa");
    check_code_result(r#""abab" - "b";"#, "aab");
    check_code_result(r#""abc" - "x";"#, "abc");
}

#[test]
fn ord() {
    check_code_result(r#"ord("a");"#, 97);
    check_code_result(r#"ord("abc");"#, 97);
    check_code_result(r#"ord("");"#, NaslValue::Null);
    check_code_result("ord(1);", 49);
}

#[test]
fn hex() {
    check_code_result("hex(0);", "0x00");
    check_code_result("hex(10);", "0x0a");
    check_code_result("hex(255);", "0xff");
    check_code_result("hex(256);", "0x00");
}

#[test]
fn hexstr() {
    check_code_result(r#"hexstr("foo");"#, "666f6f");
    check_code_result(r#"hexstr(raw_string(0x00, 0xff));"#, "00ff");
    check_code_result("hexstr();", NaslValue::Null);
}

#[test]
fn strstr() {
    check_code_result(r#"strstr("abc", "b");"#, "bc");
    check_code_result(r#"strstr("abc", "x");"#, NaslValue::Null);
}

#[test]
fn substr() {
    check_code_result(r#"substr("hello", 1);"#, "ello");
    check_code_result(r#"substr("hello", 0, 4);"#, "hell");
    check_code_result(r#"substr("hello", 1, 99);"#, "ello");
    check_code_result(r#"substr("hello", 9);"#, "");
    check_code_result(r#"substr("hello", 3, 1);"#, NaslValue::Null);
}

#[test]
fn insstr() {
    check_code_result(r#"insstr("foo bar", "rab", 4);"#, "foo rab");
    check_code_result(r#"insstr("foo bar", "baz", 0, 2);"#, "baz bar");
    check_code_result(r#"insstr("abc", "X", 1, 1);"#, "aXc");
}

#[test]
fn case() {
    check_code_result(r#"tolower("HeLLo");"#, "hello");
    check_code_result(r#"toupper("HeLLo");"#, "HELLO");
    check_code_result("tolower();", NaslValue::Null);
}

#[test]
fn crap() {
    check_code_result("crap(5);", "XXXXX");
    check_code_result("crap(length: 3);", "XXX");
    check_code_result(r#"crap(length: 5, data: "ab");"#, "ababa");
    check_code_result("crap(0);", "");
    check_code_result("crap();", NaslValue::Null);
    check_code_result("crap(9223372036854775807);", NaslValue::Null);
    check_code_result(r#"crap(length: 268435457, data: "ab");"#, NaslValue::Null);
}

#[test]
fn strlen() {
    check_code_result(r#"strlen("hello");"#, 5);
    check_code_result(r#"strlen("");"#, 0);
    check_code_result("strlen(12345);", 5);
    check_code_result("strlen();", 0);
}

#[test]
fn split() {
    let mut t = TestBuilder::default();
    t.run(r#"parts = split("a.b.c.d", sep: ".");"#);
    t.ok("max_index(parts);", 4);
    t.ok(r#"parts[0] + parts[1] + parts[2] + parts[3];"#, "abcd");
    t.ok(
        r#"split("a.b.c.", sep: ".", keep: TRUE);"#,
        vec!["a.", "b.", "c."],
    );
    t.ok(r#"split("a\nb");"#, vec!["a", "b"]);
    t.ok(r#"split("a,,b", sep: ",");"#, vec!["a", "b"]);
}

#[test]
fn chomp() {
    check_code_result(r#"chomp("abc\n\t ");"#, "abc");
    check_code_result(r#"chomp("  abc");"#, "  abc");
}

#[test]
fn int() {
    check_code_result(r#"int("42");"#, 42);
    check_code_result(r#"int("12abc");"#, 12);
    check_code_result(r#"int("abc");"#, 0);
    check_code_result("int(TRUE);", 1);
    check_code_result("int();", 0);
}

#[test]
fn stridx() {
    check_code_result(r#"stridx("abcabc", "c");"#, 2);
    check_code_result(r#"stridx("abcabc", "x");"#, -1);
    check_code_result(r#"stridx("abcabc", "a", 1);"#, 2);
    check_code_result(r#"stridx("abc", "");"#, 0);
}

#[test]
fn str_replace() {
    check_code_result(
        r#"str_replace(string: "a-b-c", find: "-", replace: "+");"#,
        "a+b+c",
    );
    check_code_result(
        r#"str_replace(string: "a-b-c", find: "-", replace: "+", count: 1);"#,
        "a+b-c",
    );
    check_code_result(r#"str_replace(string: "a-b-c", find: "-");"#, "abc");
}
