// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use tracing_test::traced_test;

use crate::nasl::{
    test_prelude::*,
    utils::{ResultKind, ScanResult},
};

fn verify(function: &str, kind: ResultKind) {
    let mut t = TestBuilder::default();
    t.run_all(format!(
        r###"
        script_oid("1.3.6.1.4.1.25623.1.0.100001");
        {function}(data: "test0", port: 12, proto: "udp");
        {function}(data: "test1", port: 12, proto: "tcp");
        {function}(data: "test2", port: 12, proto: "nonsense");
        {function}(data: "test3");
        "###
    ));
    let results = t.scan_results();
    t.check_no_errors();
    assert_eq!(
        results.len(),
        4,
        "expected the same results as {function} calls"
    );
    let expected = |id: usize, port, protocol: &str| ScanResult {
        kind,
        script: "test.nasl".to_owned(),
        oid: "1.3.6.1.4.1.25623.1.0.100001".to_owned(),
        host: "127.0.0.1".to_owned(),
        port,
        protocol: protocol.to_owned(),
        message: format!("test{id}"),
    };
    assert_eq!(results[0], expected(0, Some(12), "udp"));
    assert_eq!(results[1], expected(1, Some(12), "tcp"));
    assert_eq!(results[2], expected(2, Some(12), "tcp"));
    assert_eq!(results[3], expected(3, None, "tcp"));
}

#[test]
fn log_message() {
    verify("log_message", ResultKind::Log);
}

#[test]
fn security_message() {
    verify("security_message", ResultKind::Alarm);
}

#[test]
fn error_message() {
    verify("error_message", ResultKind::Error);
}

#[test]
fn security_message_defaults_to_success() {
    let mut t = TestBuilder::default();
    t.run("security_message(port: 80);");
    let results = t.scan_results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].message, "Success");
    assert_eq!(results[0].port, Some(80));
}

#[test]
#[traced_test]
fn reports_are_logged_on_their_target() {
    let mut t = TestBuilder::default();
    t.run(r#"security_message(data: "vulnerable");"#);
    t.run(r#"log_message(data: "detected");"#);
    t.check_no_errors();
    assert!(logs_contain("nasl::security"));
    assert!(logs_contain("vulnerable"));
    assert!(logs_contain("detected"));
}
