// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::{
    collections::BTreeMap,
    fmt::Display,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nasl::{compiler::CompileOptions, interpreter::InterpreterOptions};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unable to read {path}: {reason}")]
    Read { path: String, reason: String },
    #[error("invalid configuration in {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// The value of a script preference as written in the configuration.
///
/// Checkboxes are given as booleans and passed to scripts as `yes`/`no`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl Display for PreferenceValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferenceValue::Bool(true) => write!(f, "yes"),
            PreferenceValue::Bool(false) => write!(f, "no"),
            PreferenceValue::Number(n) => write!(f, "{n}"),
            PreferenceValue::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory scripts and include files are loaded from.
    pub plugin_root: Option<PathBuf>,
    /// Number of hosts scanned at the same time.
    pub max_workers: usize,
    /// Reject reads of variables that are never assigned nor declared.
    pub strict_identifiers: bool,
    /// Reject declaring a variable or parameter twice in the same scope.
    pub strict_redeclaration: bool,
    /// Load the dependencies a script declares together with it.
    pub auto_load_dependencies: bool,
    /// Treat scripts skipped by their requirements as a normal outcome.
    pub ignore_requirements_error: bool,
    pub max_call_depth: usize,
    /// Preference values by preference name. Applied to every script that
    /// declares a preference of that name.
    pub preferences: BTreeMap<String, PreferenceValue>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            plugin_root: None,
            max_workers: 10,
            strict_identifiers: false,
            strict_redeclaration: false,
            auto_load_dependencies: true,
            ignore_requirements_error: true,
            max_call_depth: InterpreterOptions::default().max_call_depth,
            preferences: BTreeMap::new(),
        }
    }
}

impl Display for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", toml::to_string_pretty(self).unwrap_or_default())
    }
}

impl EngineConfig {
    pub fn from_toml(path: &str, toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            reason: e.message().to_owned(),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        tracing::debug!(path = %name, "loading config");
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: name.clone(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&name, &content)
    }

    pub fn interpreter_options(&self) -> InterpreterOptions {
        InterpreterOptions {
            compile: CompileOptions {
                strict_identifiers: self.strict_identifiers,
                strict_redeclaration: self.strict_redeclaration,
                ..Default::default()
            },
            max_call_depth: self.max_call_depth,
        }
    }
}
