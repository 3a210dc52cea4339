// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use nasl_vm::{
    nasl::{ExecutionOutcome, Loader, ScriptCtx, ScriptEngine, utils::Target},
    storage::{InMemoryKb, KbItem},
};
use tracing::info;

use crate::{Globals, split_path};

fn key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {s}"))
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// The script to run. Includes are looked up below the plugin root and
    /// next to the script.
    script: PathBuf,
    /// Host the script runs against.
    #[arg(short, long, default_value = "127.0.0.1")]
    target: String,
    /// Knowledge base items set before the run. Values that are integers are
    /// stored as numbers.
    #[arg(short, long = "kb", value_name = "KEY=VALUE", value_parser = key_value)]
    kb: Vec<(String, String)>,
    /// Values of script preferences.
    #[arg(long = "preference", value_name = "NAME=VALUE", value_parser = key_value)]
    preferences: Vec<(String, String)>,
}

#[derive(clap::Args)]
pub struct DescribeArgs {
    script: PathBuf,
}

#[derive(clap::Args)]
pub struct DumpArgs {
    script: PathBuf,
}

/// Loads the script with an engine that also resolves files next to it.
fn load(globals: &Globals, script: &Path) -> anyhow::Result<(ScriptEngine, String, String)> {
    let (dir, name) = split_path(script)?;
    let engine = globals.engine()?.with_bundle(Loader::from_feed_path(&dir));
    let code = Loader::from_feed_path(&dir).load(&name)?;
    Ok((engine, name, code))
}

fn exit_code(code: i64) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

pub fn run(globals: &Globals, args: RunArgs) -> anyhow::Result<ExitCode> {
    let (engine, name, code) = load(globals, &args.script)?;
    let info = engine.description_exec(&name, &code)?;
    let kb = Arc::new(InMemoryKb::new());
    for (key, value) in args.kb {
        let item = match value.parse::<i64>() {
            Ok(n) => KbItem::Number(n),
            Err(_) => KbItem::String(value),
        };
        kb.add(&key, item, None)?;
    }
    let preferences: HashMap<String, String> = args.preferences.into_iter().collect();
    let ctx = ScriptCtx::new(&name)
        .with_target(Target::new(&args.target))
        .with_kb(kb)
        .with_preferences(preferences)
        .with_scanner_preferences(engine.scanner_preferences());
    ctx.with_info(|i| *i = info);
    let outcome = engine.execute(&name, &code, &ctx)?;
    for result in ctx.take_results() {
        println!("{}", serde_json::to_string(&result)?);
    }
    match &outcome {
        ExecutionOutcome::Exit(signal) => {
            info!(code = signal.code, message = ?signal.message, "script exited")
        }
        ExecutionOutcome::Finished(_) => info!("script finished"),
    }
    Ok(exit_code(outcome.code()))
}

pub fn describe(globals: &Globals, args: DescribeArgs) -> anyhow::Result<ExitCode> {
    let (engine, name, code) = load(globals, &args.script)?;
    let info = engine.description_exec(&name, &code)?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(ExitCode::SUCCESS)
}

pub fn dump(globals: &Globals, args: DumpArgs) -> anyhow::Result<ExitCode> {
    let (engine, name, code) = load(globals, &args.script)?;
    print!("{}", engine.compile(&name, &code)?);
    Ok(ExitCode::SUCCESS)
}
