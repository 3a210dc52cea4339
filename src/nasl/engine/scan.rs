// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::{collections::HashSet, sync::Arc};

use tokio::sync::Semaphore;
use tracing::{debug, error, info, info_span, warn};

use super::{EngineError, RequirementError, Script, ScriptEngine, requirements};
use crate::{
    nasl::utils::{ResultKind, ScanResult, ScriptCtx, Target},
    storage::InMemoryKb,
};

#[derive(Debug)]
/// Contains the result of a executed script
pub enum ScriptResultKind {
    /// Contains the code provided by exit call or 0 when script finished successful without exit
    /// call
    ReturnCode(i64),
    /// The script did not run because a requirement was not met.
    NotRun(RequirementError),
    /// Contains the error the script returned
    Error(EngineError),
}

#[derive(Debug)]
/// Contains meta data of the script and its result
pub struct ScriptResult {
    pub filename: String,
    /// Object identifier of the script
    pub oid: String,
    pub kind: ScriptResultKind,
    /// The messages the script reported.
    pub results: Vec<ScanResult>,
}

impl ScriptResult {
    /// Returns true when the return code of the script is 0.
    pub fn has_succeeded(&self) -> bool {
        matches!(&self.kind, ScriptResultKind::ReturnCode(0))
    }

    /// Returns true when the script didn't run
    pub fn has_not_run(&self) -> bool {
        matches!(self.kind, ScriptResultKind::NotRun(_))
    }
}

/// Everything a scan found out about one host.
#[derive(Debug)]
pub struct HostReport {
    pub host: String,
    /// One entry per executed script, dependencies before their dependents.
    pub scripts: Vec<ScriptResult>,
    pub kb: Arc<InMemoryKb>,
}

impl HostReport {
    pub fn script(&self, filename: &str) -> Option<&ScriptResult> {
        self.scripts.iter().find(|s| s.filename == filename)
    }

    pub fn results(&self) -> impl Iterator<Item = &ScanResult> {
        self.scripts.iter().flat_map(|s| s.results.iter())
    }

    /// Findings reported by `security_message`.
    pub fn alarms(&self) -> impl Iterator<Item = &ScanResult> {
        self.results().filter(|r| r.kind == ResultKind::Alarm)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ScriptResult> {
        self.scripts
            .iter()
            .filter(|s| matches!(s.kind, ScriptResultKind::Error(_)))
    }
}

/// Parses a comma separated list of ports and port ranges such as
/// `22,80,8000-8010`.
pub fn parse_ports(ports: &str) -> Result<Vec<u16>, EngineError> {
    let invalid = || EngineError::InvalidPorts(ports.to_owned());
    let mut result = vec![];
    for part in ports.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start: u16 = start.trim().parse().map_err(|_| invalid())?;
                let end: u16 = end.trim().parse().map_err(|_| invalid())?;
                if start > end {
                    return Err(invalid());
                }
                result.extend(start..=end);
            }
            None => result.push(part.parse().map_err(|_| invalid())?),
        }
    }
    result.sort_unstable();
    result.dedup();
    Ok(result)
}

/// Splits a comma or whitespace separated list of hosts.
pub fn parse_hosts(hosts: &str) -> Vec<String> {
    hosts
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|h| !h.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// The state of scanning one host.
struct HostRun<'a> {
    engine: &'a ScriptEngine,
    target: Target,
    kb: Arc<InMemoryKb>,
    executed: HashSet<&'a str>,
    scripts: Vec<ScriptResult>,
}

impl<'a> HostRun<'a> {
    fn push(&mut self, script: &Script, kind: ScriptResultKind, results: Vec<ScanResult>) {
        debug!(script = script.filename(), result = ?kind, "finished");
        self.scripts.push(ScriptResult {
            filename: script.filename().to_owned(),
            oid: script.info.oid.clone(),
            kind,
            results,
        });
    }

    /// Runs the dependencies of `script` and then the script itself. Every
    /// script runs at most once per host.
    fn run_with_dependencies(&mut self, script: &'a Script) {
        if !self.executed.insert(script.filename()) {
            return;
        }
        let engine = self.engine;
        for dependency in script.dependencies() {
            match engine.script(dependency) {
                Some(dep) => self.run_with_dependencies(dep),
                None => {
                    let e = EngineError::MissingDependency {
                        script: script.filename().to_owned(),
                        dependency: dependency.to_owned(),
                    };
                    error!(error = %e, "run script met error");
                    self.push(script, ScriptResultKind::Error(e), vec![]);
                    return;
                }
            }
        }
        let (kind, results) = self.run(script);
        self.push(script, kind, results);
    }

    fn run(&self, script: &Script) -> (ScriptResultKind, Vec<ScanResult>) {
        let filename = script.filename();
        if self.engine.is_excluded(&script.info) {
            return (
                ScriptResultKind::Error(EngineError::Excluded(filename.to_owned())),
                vec![],
            );
        }
        if let Err(e) = requirements::check(&script.info, &self.kb) {
            if self.engine.config.ignore_requirements_error {
                debug!(script = filename, reason = %e, "not running");
                return (ScriptResultKind::NotRun(e), vec![]);
            }
            warn!(script = filename, reason = %e, "requirements not met");
            return (ScriptResultKind::Error(e.into()), vec![]);
        }
        let ctx = ScriptCtx::new(filename)
            .with_target(self.target.clone())
            .with_kb(self.kb.clone())
            .with_preferences(self.engine.preferences_for(script))
            .with_scanner_preferences(self.engine.scanner_preferences());
        ctx.with_info(|info| *info = script.info.clone());
        let kind = match self.engine.execute(filename, &script.code, &ctx) {
            Ok(outcome) => ScriptResultKind::ReturnCode(outcome.code()),
            Err(e) => {
                error!(script = filename, error = %e, "run script met error");
                ScriptResultKind::Error(e)
            }
        };
        (kind, ctx.take_results())
    }
}

impl ScriptEngine {
    /// Runs the root scripts, each after its dependencies, against `host`
    /// with a fresh knowledge base. The given TCP ports are recorded as open
    /// before any script runs.
    pub fn scan_host(&self, host: &str, ports: &[u16]) -> Result<HostReport, EngineError> {
        let roots = self.root_scripts();
        if roots.is_empty() {
            return Err(EngineError::NoScripts);
        }
        let _span = info_span!("scan", host).entered();
        let kb = Arc::new(InMemoryKb::new());
        for port in ports {
            kb.add(&format!("Ports/tcp/{port}"), 1.into(), None)?;
        }
        let mut run = HostRun {
            engine: self,
            target: Target::new(host),
            kb: kb.clone(),
            executed: HashSet::new(),
            scripts: vec![],
        };
        for root in roots {
            run.run_with_dependencies(root);
        }
        info!(scripts = run.scripts.len(), "host scanned");
        Ok(HostReport {
            host: host.to_owned(),
            scripts: run.scripts,
            kb,
        })
    }

    /// Scans all `hosts`, at most `max_workers` at the same time. Each host
    /// runs its scripts sequentially on a blocking thread. Reports are
    /// returned in the order of `hosts`.
    pub async fn scan(
        self: Arc<Self>,
        hosts: Vec<String>,
        ports: Vec<u16>,
    ) -> Vec<Result<HostReport, EngineError>> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_workers.max(1)));
        let ports: Arc<[u16]> = ports.into();
        let mut tasks = Vec::with_capacity(hosts.len());
        for host in hosts {
            let sem = semaphore.clone();
            let engine = self.clone();
            let ports = ports.clone();
            let target = host.clone();
            let task = tokio::spawn(async move {
                let _permit = sem.acquire().await.ok();
                tokio::task::spawn_blocking(move || engine.scan_host(&target, &ports)).await
            });
            tasks.push((host, task));
        }
        let mut reports = Vec::with_capacity(tasks.len());
        for (host, task) in tasks {
            let report = match task.await {
                Ok(Ok(report)) => report,
                Ok(Err(e)) | Err(e) => Err(EngineError::Task {
                    host: host.clone(),
                    reason: e.to_string(),
                }),
            };
            if let Err(e) = &report {
                error!(%host, error = %e, "scan host met error");
            }
            reports.push(report);
        }
        reports
    }
}
