// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::collections::HashMap;

use crate::nasl::test_prelude::*;

const DESCRIPTION: &str = r#"
if (description) {
  script_oid("1.3.6.1.4.1.25623.1.0.99");
  script_version("2023-02-23T13:33:44+0000");
  script_name("that is a very long and descriptive name");
  script_category(ACT_GATHER_INFO);
  script_family("Product detection");
  script_copyright("Copyright (C) 2023 Greenbone AG");
  script_timeout(6*60);
  script_dependencies("toolcheck.nasl", "gb_ssh_authorization.nasl", "toolcheck.nasl");
  script_require_keys("Secret/SSH/login");
  script_mandatory_keys("ssh/login/uname", re:"ssh/login/uname=Linux");
  script_exclude_keys("keys/islocalhost");
  script_require_ports("Services/ssh", 22);
  script_require_udp_ports("Services/udp/snmp", 161);
  script_cve_id("CVE-2022-0001", "CVE-2022-0002");
  script_bugtraq_id(1, 2);
  script_xref(name:"URL", value:"https://example.com");
  script_tag(name:"cvss_base", value:"5.0");
  script_add_preference(name:"Timeout", type:"entry", value:"5");
  exit(0);
}
"#;

fn description_run() -> TestBuilder {
    TestBuilder::default().with_script(|| ScriptCtx::new("test.nasl").with_description_mode(true))
}

#[test]
fn description_block_fills_script_info() {
    let mut t = description_run();
    t.run_all(DESCRIPTION);
    let info = t.script_info();
    assert_eq!(info.oid, "1.3.6.1.4.1.25623.1.0.99");
    assert_eq!(info.name, "that is a very long and descriptive name");
    assert_eq!(info.category, 3);
    assert_eq!(info.timeout, 360);
    assert_eq!(
        info.dependencies,
        vec!["toolcheck.nasl", "gb_ssh_authorization.nasl"]
    );
    assert_eq!(info.mandatory_keys, vec!["ssh/login/uname=Linux"]);
    assert_eq!(info.required_ports, vec!["Services/ssh", "22"]);
    assert_eq!(info.required_udp_ports, vec!["Services/udp/snmp", "161"]);
    assert_eq!(info.cve, vec!["CVE-2022-0001", "CVE-2022-0002"]);
    assert_eq!(info.bugtraq, vec![1, 2]);
    assert_eq!(info.xrefs.get("URL").map(String::as_str), Some("https://example.com"));
    assert_eq!(info.tags.get("cvss_base").map(String::as_str), Some("5.0"));
    assert_eq!(info.preferences[0].name, "Timeout");
}

#[test]
fn description_is_false_outside_of_description_mode() {
    let mut t = TestBuilder::default();
    t.run_all(DESCRIPTION);
    assert_eq!(t.script_info().oid, "");
}

#[test]
fn preferences_fall_back_to_their_default() {
    let mut t = TestBuilder::default();
    t.run(r#"script_add_preference(name:"Timeout", type:"entry", value:"5");"#);
    t.ok(r#"script_get_preference("Timeout");"#, "5");
    t.ok(r#"script_get_preference("Unknown");"#, NaslValue::Null);

    let mut t = TestBuilder::default().with_script(|| {
        ScriptCtx::new("test.nasl")
            .with_preferences(HashMap::from([("Timeout".to_owned(), "10".to_owned())]))
    });
    t.run(r#"script_add_preference(name:"Timeout", type:"entry", value:"5");"#);
    t.ok(r#"script_get_preference("Timeout");"#, "10");
}

#[test]
fn invalid_category_is_tolerated() {
    let mut t = TestBuilder::default();
    t.ok("script_category(42);", NaslValue::Null);
    t.ok("script_oid(\"1.2.3\");", NaslValue::Null);
    t.ok("get_script_oid();", "1.2.3");
}

#[test]
fn legacy_declarations() {
    let mut t = description_run();
    t.run_all(
        r#"
script_id(10330);
script_summary("Detects the service");
script_set_attribute(attribute: "risk_factor", value: "None");
script_set_attribute("plugin_type", "remote");
script_end_attributes();
"#,
    );
    let info = t.script_info();
    assert_eq!(info.id, 10330);
    assert_eq!(info.summary, "Detects the service");
    assert_eq!(
        info.attributes.get("risk_factor").map(String::as_str),
        Some("None")
    );
    assert_eq!(
        info.attributes.get("plugin_type").map(String::as_str),
        Some("remote")
    );
}

#[test]
fn file_preferences() {
    let mut t = TestBuilder::default().with_script(|| {
        ScriptCtx::new("test.nasl").with_preferences(HashMap::from([(
            "Key file".to_owned(),
            "-----BEGIN KEY-----".to_owned(),
        )]))
    });
    t.run(r#"script_add_preference(name:"Key file", type:"file", value:"");"#);
    t.run(r#"script_add_preference(name:"User", type:"entry", value:"admin");"#);
    t.ok(
        r#"script_get_preference_file_content("Key file");"#,
        "-----BEGIN KEY-----",
    );
    t.ok(r#"script_get_preference_file_content("User");"#, NaslValue::Null);
    t.ok(r#"script_get_preference_file_content("Unknown");"#, NaslValue::Null);
}
