// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A preference declared by `script_add_preference`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPreference {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub class: String,
    pub default: String,
}

/// The metadata a script declares in its description block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptInfo {
    pub filename: String,
    pub name: String,
    pub oid: String,
    /// The legacy numeric id set by `script_id`.
    pub id: i64,
    pub version: String,
    pub summary: String,
    /// One of the `ACT_*` categories.
    pub category: i64,
    pub family: String,
    pub copyright: String,
    pub timeout: i64,
    pub cve: Vec<String>,
    pub bugtraq: Vec<i64>,
    pub dependencies: Vec<String>,
    pub required_keys: Vec<String>,
    /// Keys that must exist, optionally as `key=regex`.
    pub mandatory_keys: Vec<String>,
    pub excluded_keys: Vec<String>,
    pub required_ports: Vec<String>,
    pub required_udp_ports: Vec<String>,
    pub preferences: Vec<ScriptPreference>,
    pub xrefs: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
    /// Set by `script_set_attribute`.
    pub attributes: BTreeMap<String, String>,
}

impl ScriptInfo {
    pub fn new(filename: &str) -> Self {
        Self {
            filename: filename.to_owned(),
            ..Default::default()
        }
    }

    pub fn add_dependency(&mut self, dependency: &str) {
        if !self.dependencies.iter().any(|d| d == dependency) {
            self.dependencies.push(dependency.to_owned());
        }
    }

    /// Adds a preference, replacing one with the same name.
    pub fn add_preference(&mut self, name: &str, class: &str, default: &str) {
        let id = self.preferences.len() as i64 + 1;
        let preference = ScriptPreference {
            id,
            name: name.to_owned(),
            class: class.to_owned(),
            default: default.to_owned(),
        };
        match self.preferences.iter_mut().find(|p| p.name == name) {
            Some(existing) => {
                existing.class = preference.class;
                existing.default = preference.default;
            }
            None => self.preferences.push(preference),
        }
    }

    pub fn preference(&self, name: &str) -> Option<&ScriptPreference> {
        self.preferences.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_are_deduplicated() {
        let mut info = ScriptInfo::new("a.nasl");
        info.add_dependency("b.nasl");
        info.add_dependency("c.nasl");
        info.add_dependency("b.nasl");
        assert_eq!(info.dependencies, vec!["b.nasl", "c.nasl"]);
    }

    #[test]
    fn serializes_preferences() {
        let mut info = ScriptInfo::new("a.nasl");
        info.add_preference("Timeout", "entry", "5");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["preferences"][0]["type"], "entry");
        assert_eq!(json["filename"], "a.nasl");
    }
}
