// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

mod execute;
mod scan;

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{ArgAction, Parser, Subcommand};
use nasl_vm::nasl::{EngineConfig, EngineError, ScriptEngine};
use tracing::{debug, error, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use execute::{DescribeArgs, DumpArgs, RunArgs};
use scan::ScanArgs;

/// Compiles, inspects and runs NASL scripts.
#[derive(Parser)]
#[command(name = "naslctl", version)]
struct Cli {
    /// Engine configuration in TOML.
    #[arg(short, long, env = "NASLCTL_CONFIG", global = true)]
    config: Option<PathBuf>,
    /// Directory scripts and include files are loaded from. Overrides the
    /// configured plugin root.
    #[arg(short, long, env = "NASLCTL_PLUGIN_ROOT", global = true)]
    plugin_root: Option<PathBuf>,
    /// Print more details while running. RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Runs a single script and prints its results as JSON lines.
    Run(RunArgs),
    /// Prints the metadata declared in the description block of a script.
    Describe(DescribeArgs),
    /// Prints the compiled instructions of a script.
    Dump(DumpArgs),
    /// Runs scripts and their dependencies against hosts.
    Scan(ScanArgs),
    /// Prints the effective configuration.
    Config,
}

fn set_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Shared by all subcommands that need an engine.
pub struct Globals {
    config: Option<PathBuf>,
    plugin_root: Option<PathBuf>,
}

impl Globals {
    pub fn config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };
        if let Some(root) = &self.plugin_root {
            config.plugin_root = Some(root.clone());
        }
        Ok(config)
    }

    pub fn engine(&self) -> anyhow::Result<ScriptEngine> {
        let config = self.config()?;
        debug!("configuration:\n{config}");
        Ok(ScriptEngine::new(config))
    }
}

/// The directory of `script` and its filename.
pub fn split_path(script: &Path) -> anyhow::Result<(PathBuf, String)> {
    let name = script
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("{} is not a script file", script.display()))?;
    let dir = script
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok((dir.to_path_buf(), name.to_owned()))
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let globals = Globals {
        config: cli.config,
        plugin_root: cli.plugin_root,
    };
    match cli.command {
        Command::Run(args) => execute::run(&globals, args),
        Command::Describe(args) => execute::describe(&globals, args),
        Command::Dump(args) => execute::dump(&globals, args),
        Command::Scan(args) => scan::run(&globals, args).await,
        Command::Config => {
            print!("{}", globals.config()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    set_logging(cli.verbose);
    match run(cli).await {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<EngineError>() {
            Some(EngineError::Compile(err)) => {
                err.emit();
                ExitCode::from(2)
            }
            _ => {
                error!("{e:#}");
                ExitCode::FAILURE
            }
        },
    }
}
