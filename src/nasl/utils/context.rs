// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Defines the context used within the interpreter and utilized by the builtin functions

use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use super::{executor::Executor, hosts::resolve, script_info::ScriptInfo};
use crate::{nasl::code::Position, storage::InMemoryKb};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    /// The original target. IP or hostname
    target: String,
    /// The IP address. It defaults to 127.0.0.1 if the target can not be resolved.
    ip_addr: IpAddr,
}

impl Target {
    pub fn new(target: &str) -> Self {
        let ip_addr = resolve(target)
            .first()
            .copied()
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        Self {
            target: target.to_owned(),
            ip_addr,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn ip_addr(&self) -> IpAddr {
        self.ip_addr
    }
}

impl Default for Target {
    fn default() -> Self {
        Self {
            target: "localhost".to_owned(),
            ip_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// Vulnerability
    Alarm,
    Log,
    Error,
}

/// A finding reported by `security_message`, `log_message` or `error_message`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScanResult {
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub script: String,
    pub oid: String,
    pub host: String,
    pub port: Option<i64>,
    pub protocol: String,
    pub message: String,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The state of one script run that builtins may read and change.
///
/// The knowledge base is shared with the other scripts run against the same
/// host, everything else belongs to this run.
#[derive(Debug)]
pub struct ScriptCtx {
    filename: String,
    target: Target,
    kb: Arc<InMemoryKb>,
    /// Configured values of script preferences, by preference name.
    preferences: HashMap<String, String>,
    /// Preferences of the scanner itself, such as `safe_checks`.
    scanner_preferences: HashMap<String, String>,
    description: bool,
    info: Mutex<ScriptInfo>,
    results: Mutex<Vec<ScanResult>>,
}

impl ScriptCtx {
    pub fn new(filename: &str) -> Self {
        Self {
            filename: filename.to_owned(),
            target: Target::default(),
            kb: Arc::new(InMemoryKb::new()),
            preferences: HashMap::new(),
            scanner_preferences: HashMap::new(),
            description: false,
            info: Mutex::new(ScriptInfo::new(filename)),
            results: Mutex::new(vec![]),
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_kb(mut self, kb: Arc<InMemoryKb>) -> Self {
        self.kb = kb;
        self
    }

    pub fn with_preferences(mut self, preferences: HashMap<String, String>) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_scanner_preferences(mut self, preferences: HashMap<String, String>) -> Self {
        self.scanner_preferences = preferences;
        self
    }

    /// In description mode scripts only declare their metadata.
    pub fn with_description_mode(mut self, description: bool) -> Self {
        self.description = description;
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn kb(&self) -> &InMemoryKb {
        &self.kb
    }

    pub fn is_description_mode(&self) -> bool {
        self.description
    }

    /// The configured value of a preference, falling back to its declared
    /// default.
    pub fn preference(&self, name: &str) -> Option<String> {
        self.preferences
            .get(name)
            .cloned()
            .or_else(|| lock(&self.info).preference(name).map(|p| p.default.clone()))
    }

    pub fn scanner_preference(&self, name: &str) -> Option<&str> {
        self.scanner_preferences.get(name).map(String::as_str)
    }

    pub fn with_info<R>(&self, f: impl FnOnce(&mut ScriptInfo) -> R) -> R {
        f(&mut lock(&self.info))
    }

    pub fn script_info(&self) -> ScriptInfo {
        lock(&self.info).clone()
    }

    pub fn add_result(&self, result: ScanResult) {
        lock(&self.results).push(result);
    }

    pub fn results(&self) -> Vec<ScanResult> {
        lock(&self.results).clone()
    }

    pub fn take_results(&self) -> Vec<ScanResult> {
        std::mem::take(&mut *lock(&self.results))
    }
}

/// What a builtin sees of the interpreter during a call.
pub struct Context<'a> {
    script: &'a ScriptCtx,
    executor: &'a Executor,
    function: &'a str,
    position: Option<&'a Position>,
    user_functions: &'a dyn Fn(&str) -> bool,
}

impl<'a> Context<'a> {
    pub fn new(
        script: &'a ScriptCtx,
        executor: &'a Executor,
        function: &'a str,
        position: Option<&'a Position>,
        user_functions: &'a dyn Fn(&str) -> bool,
    ) -> Self {
        Self {
            script,
            executor,
            function,
            position,
            user_functions,
        }
    }

    pub fn script(&self) -> &'a ScriptCtx {
        self.script
    }

    pub fn executor(&self) -> &'a Executor {
        self.executor
    }

    /// The name of the builtin being called.
    pub fn function(&self) -> &str {
        self.function
    }

    pub fn position(&self) -> Option<&Position> {
        self.position
    }

    pub fn kb(&self) -> &InMemoryKb {
        self.script.kb()
    }

    pub fn target(&self) -> &Target {
        self.script.target()
    }

    /// Checks if a function is defined, either as builtin or within the
    /// running script.
    pub fn nasl_fn_defined(&self, name: &str) -> bool {
        self.executor.contains(name) || (self.user_functions)(name)
    }
}
