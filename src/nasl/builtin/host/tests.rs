// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use crate::nasl::{test_prelude::*, utils::Target};

fn builder(target: &'static str) -> TestBuilder {
    TestBuilder::default()
        .with_script(move || ScriptCtx::new("test.nasl").with_target(Target::new(target)))
}

#[test]
fn get_host_ip() {
    let mut t = builder("192.168.0.10");
    t.ok("get_host_ip();", "192.168.0.10");
    t.ok("get_host_name();", "192.168.0.10");
    t.ok("TARGET_IS_IPV6();", false);
}

#[test]
fn ipv6_target() {
    let mut t = builder("::1");
    t.ok("get_host_ip();", "::1");
    t.ok("TARGET_IS_IPV6();", true);
}

#[test]
fn default_target_is_localhost() {
    let mut t = TestBuilder::default();
    t.ok("get_host_ip();", "127.0.0.1");
    t.ok("get_host_name();", "localhost");
}

#[test]
fn port_state_follows_the_knowledge_base() {
    let mut t = TestBuilder::default();
    t.run(r#"set_kb_item(name: "Ports/tcp/22", value: 1);"#);
    t.run(r#"set_kb_item(name: "Ports/tcp/23", value: 0);"#);
    t.run(r#"set_kb_item(name: "Ports/udp/53", value: 1);"#);
    t.ok("get_port_state(22);", true);
    t.ok("get_tcp_port_state(22);", true);
    t.ok("get_port_state(23);", false);
    t.ok("get_port_state(80);", false);
    t.ok("get_port_state(53);", false);
    t.ok("get_udp_port_state(53);", true);
    t.ok("get_udp_port_state(22);", false);
}

#[test]
fn open_port_is_the_lowest_known_one() {
    let mut t = TestBuilder::default();
    t.ok("get_host_open_port();", 0);
    t.run(r#"set_kb_item(name: "Ports/tcp/8080", value: 1);"#);
    t.run(r#"set_kb_item(name: "Ports/tcp/21", value: 0);"#);
    t.run(r#"set_kb_item(name: "Ports/tcp/443", value: 1);"#);
    t.run(r#"set_kb_item(name: "Ports/udp/53", value: 1);"#);
    t.ok("get_host_open_port();", 443);
}
