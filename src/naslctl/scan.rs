// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::{process::ExitCode, sync::Arc};

use nasl_vm::nasl::engine::{HostReport, ScriptResultKind, parse_hosts, parse_ports};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::Globals;

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Hosts to scan, separated by comma or whitespace.
    #[arg(short = 't', long)]
    hosts: String,
    /// TCP ports known to be open, such as 22,80,8000-8080.
    #[arg(short, long, default_value = "")]
    ports: String,
    /// Scripts or glob patterns, relative to the plugin root.
    #[arg(required = true)]
    scripts: Vec<String>,
    /// Scripts to skip, by filename or OID.
    #[arg(short, long)]
    exclude: Vec<String>,
    /// Print the loaded scripts with their dependencies instead of scanning.
    #[arg(long)]
    tree: bool,
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

fn status(kind: &ScriptResultKind) -> Value {
    match kind {
        ScriptResultKind::ReturnCode(0) => json!({ "status": "success" }),
        ScriptResultKind::ReturnCode(code) => json!({ "status": "exit", "code": code }),
        ScriptResultKind::NotRun(reason) => {
            json!({ "status": "not_run", "reason": reason.to_string() })
        }
        ScriptResultKind::Error(e) => json!({ "status": "error", "reason": e.to_string() }),
    }
}

fn report(report: &HostReport) -> Value {
    let scripts: Vec<Value> = report
        .scripts
        .iter()
        .map(|s| {
            let mut entry = status(&s.kind);
            entry["filename"] = json!(s.filename);
            entry["oid"] = json!(s.oid);
            entry
        })
        .collect();
    let results: Vec<_> = report.results().collect();
    json!({
        "host": report.host,
        "scripts": scripts,
        "results": results,
    })
}

pub async fn run(globals: &Globals, args: ScanArgs) -> anyhow::Result<ExitCode> {
    let hosts = parse_hosts(&args.hosts);
    let ports = parse_ports(&args.ports)?;
    let mut engine = globals.engine()?;
    for excluded in &args.exclude {
        engine.exclude(excluded);
    }
    for script in &args.scripts {
        let loaded = if is_glob(script) {
            engine.load_glob(script)?
        } else {
            engine.load_script(script)?
        };
        info!(%script, loaded = loaded.len(), "loaded scripts");
    }
    if args.tree {
        print!("{}", engine.script_tree());
        return Ok(ExitCode::SUCCESS);
    }
    let mut failed = false;
    for result in Arc::new(engine).scan(hosts, ports).await {
        match result {
            Ok(host) => println!("{}", serde_json::to_string_pretty(&report(&host))?),
            Err(e) => {
                warn!(error = %e, "host not scanned");
                failed = true;
            }
        }
    }
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
