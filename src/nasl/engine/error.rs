// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use thiserror::Error;

use super::{config::ConfigError, requirements::RequirementError};
use crate::{
    nasl::{compiler::CompileError, interpreter::InterpretError, syntax::LoadError},
    storage::StorageError,
};

#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("unable to load: {0}")]
    Load(#[from] LoadError),
    #[error("{0}")]
    Compile(#[from] CompileError),
    #[error("{0}")]
    Fault(#[from] InterpretError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("storage error occurred: {0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Requirement(#[from] RequirementError),
    #[error("script {0} is not loaded")]
    UnknownScript(String),
    #[error("script {script} depends on {dependency}, which is not loaded")]
    MissingDependency { script: String, dependency: String },
    #[error("script {0} is excluded")]
    Excluded(String),
    #[error("invalid script pattern {pattern}: {reason}")]
    Pattern { pattern: String, reason: String },
    #[error("invalid port list {0}")]
    InvalidPorts(String),
    #[error("no scripts to scan")]
    NoScripts,
    #[error("scan of {host} failed: {reason}")]
    Task { host: String, reason: String },
}
