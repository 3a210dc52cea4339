// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Ties compiler, interpreter and builtins together.
//!
//! Running a script goes through four steps: the code is compiled, the run
//! is bound to its host, knowledge base and preferences, the compiled unit is
//! executed and finally, in description mode, the declared [`ScriptInfo`] is
//! returned. The engine also keeps the registry of loaded scripts and their
//! dependencies, which [`ScriptEngine::scan_host`] and [`ScriptEngine::scan`]
//! work through.

mod config;
mod error;
pub mod requirements;
mod scan;

use std::{
    collections::{HashMap, HashSet},
    fmt::{Display, Write},
    path::Path,
    sync::Arc,
};

use indexmap::IndexMap;
use tracing::{debug, info, warn};

pub use config::{ConfigError, EngineConfig, PreferenceValue};
pub use error::EngineError;
pub use requirements::{Protocol, RequirementError};
pub use scan::{HostReport, ScriptResult, ScriptResultKind, parse_hosts, parse_ports};

use super::{
    builtin::{nasl_std_functions, nasl_std_variables},
    code::CodeUnit,
    interpreter::{ExitSignal, Interpreter, InterpreterOptions, Interrupt, NaslValue},
    syntax::Loader,
    utils::{Executor, ScriptCtx, ScriptInfo},
};

/// Scripts never loaded as dependency, since their checks are not supported.
const SKIPPED_DEPENDENCIES: &[&str] = &["toolcheck.nasl"];

type Patch = Box<dyn Fn(&str) -> String + Send + Sync>;

/// How a script run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// The script ran to its end. Holds the value of the trailing expression
    /// statement when evaluating snippets and undefined otherwise.
    Finished(NaslValue),
    Exit(ExitSignal),
}

impl ExecutionOutcome {
    /// The code given to `exit`, 0 when the script ran to its end.
    pub fn code(&self) -> i64 {
        match self {
            ExecutionOutcome::Finished(_) => 0,
            ExecutionOutcome::Exit(signal) => signal.code,
        }
    }
}

/// A loaded script with the metadata its description block declares.
#[derive(Debug, Clone)]
pub struct Script {
    pub info: ScriptInfo,
    pub code: String,
}

impl Script {
    pub fn filename(&self) -> &str {
        &self.info.filename
    }

    fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.info
            .dependencies
            .iter()
            .map(String::as_str)
            .filter(|d| !SKIPPED_DEPENDENCIES.contains(d))
    }
}

fn basename(filename: &str) -> &str {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename)
}

pub struct ScriptEngine {
    config: EngineConfig,
    executor: Arc<Executor>,
    loader: Loader,
    scripts: IndexMap<String, Script>,
    /// Scripts that were loaded because another script depends on them.
    dependency_scripts: HashSet<String>,
    /// Filenames and OIDs.
    excluded: HashSet<String>,
    /// Source rewrites by basename.
    patches: HashMap<String, Patch>,
    /// Preference values by script filename or OID.
    preferences: HashMap<String, HashMap<String, String>>,
}

impl std::fmt::Debug for ScriptEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptEngine")
            .field("config", &self.config)
            .field("loader", &self.loader)
            .field("scripts", &self.scripts.len())
            .finish()
    }
}

impl ScriptEngine {
    pub fn new(config: EngineConfig) -> Self {
        let loader = match &config.plugin_root {
            Some(root) => Loader::from_feed_path(root),
            None => Loader::empty(),
        };
        Self {
            config,
            executor: Arc::new(nasl_std_functions()),
            loader,
            scripts: IndexMap::new(),
            dependency_scripts: HashSet::new(),
            excluded: HashSet::new(),
            patches: HashMap::new(),
            preferences: HashMap::new(),
        }
    }

    /// Files missing below the plugin root are looked up in `bundle`.
    pub fn with_bundle(mut self, bundle: Loader) -> Self {
        self.loader = self.loader.chain(bundle);
        self
    }

    pub fn with_executor(mut self, executor: Arc<Executor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Rewrites the code of every script with the given basename before it
    /// is compiled.
    pub fn add_patch(
        &mut self,
        filename: &str,
        patch: impl Fn(&str) -> String + Send + Sync + 'static,
    ) {
        self.patches
            .insert(basename(filename).to_owned(), Box::new(patch));
    }

    /// Excludes scripts by filename or OID from loading and running.
    pub fn exclude(&mut self, name: &str) {
        self.excluded.insert(name.to_owned());
    }

    fn is_excluded(&self, info: &ScriptInfo) -> bool {
        self.excluded.contains(&info.filename) || self.excluded.contains(&info.oid)
    }

    /// Sets a preference for the script with the given filename or OID.
    pub fn set_preference(&mut self, script: &str, name: &str, value: impl Display) {
        self.preferences
            .entry(script.to_owned())
            .or_default()
            .insert(name.to_owned(), value.to_string());
    }

    /// The preferences of one run: configured values for the preferences the
    /// script declares, overridden by values set for this script.
    fn preferences_for(&self, script: &Script) -> HashMap<String, String> {
        let mut values: HashMap<String, String> = script
            .info
            .preferences
            .iter()
            .filter_map(|p| {
                self.config
                    .preferences
                    .get(&p.name)
                    .map(|v| (p.name.clone(), v.to_string()))
            })
            .collect();
        for key in [&script.info.filename, &script.info.oid] {
            if let Some(overrides) = self.preferences.get(key) {
                values.extend(overrides.clone());
            }
        }
        values
    }

    /// The configured preferences as scanner preferences, readable by every
    /// script through `get_preference`.
    pub fn scanner_preferences(&self) -> HashMap<String, String> {
        self.config
            .preferences
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect()
    }

    /// Loads `filename` and applies its patch.
    pub fn source(&self, filename: &str) -> Result<String, EngineError> {
        let code = self.loader.load(filename)?;
        Ok(match self.patches.get(basename(filename)) {
            Some(patch) => {
                debug!(script = filename, "patching");
                patch(&code)
            }
            None => code,
        })
    }

    fn interpreter<'a>(
        &'a self,
        script: &'a ScriptCtx,
        options: InterpreterOptions,
    ) -> Interpreter<'a> {
        let mut interpreter = Interpreter::new(&self.executor, script, &self.loader, options);
        for (name, value) in nasl_std_variables(script) {
            interpreter.define(name, value);
        }
        interpreter
    }

    /// Compiles `code` with the predefined variables of a script run,
    /// without running it.
    pub fn compile(&self, name: &str, code: &str) -> Result<CodeUnit, EngineError> {
        let script = ScriptCtx::new(name);
        let mut interpreter = self.interpreter(&script, self.config.interpreter_options());
        Ok(interpreter.compile(name, code)?)
    }

    fn execute_with(
        &self,
        name: &str,
        code: &str,
        script: &ScriptCtx,
        options: InterpreterOptions,
    ) -> Result<ExecutionOutcome, EngineError> {
        let mut interpreter = self.interpreter(script, options);
        let unit = interpreter.compile(name, code)?;
        match interpreter.run(&unit) {
            Ok(value) => Ok(ExecutionOutcome::Finished(value)),
            Err(Interrupt::Exit(signal)) => {
                info!(script = name, code = signal.code, message = ?signal.message, "script exit");
                Ok(ExecutionOutcome::Exit(signal))
            }
            Err(Interrupt::Fault(e)) => Err(e.into()),
        }
    }

    /// Compiles `code` and runs it bound to `script`. An exit signal is a
    /// normal outcome, faults are errors.
    pub fn execute(
        &self,
        name: &str,
        code: &str,
        script: &ScriptCtx,
    ) -> Result<ExecutionOutcome, EngineError> {
        self.execute_with(name, code, script, self.config.interpreter_options())
    }

    /// Evaluates a snippet in a fresh context and returns the value of its
    /// trailing expression statement.
    pub fn safe_eval(&self, code: &str) -> Result<ExecutionOutcome, EngineError> {
        let name = "eval.nasl";
        let script = ScriptCtx::new(name).with_scanner_preferences(self.scanner_preferences());
        let mut options = self.config.interpreter_options();
        options.compile.keep_last_value = true;
        self.execute_with(name, code, &script, options)
    }

    /// Loads `filename` through the loader and runs it bound to `script`.
    pub fn safe_run_file(
        &self,
        filename: &str,
        script: &ScriptCtx,
    ) -> Result<ExecutionOutcome, EngineError> {
        let code = self.source(filename)?;
        self.execute(filename, &code, script)
    }

    /// Runs `code` in description mode and returns the metadata it declares.
    pub fn description_exec(&self, filename: &str, code: &str) -> Result<ScriptInfo, EngineError> {
        let script = ScriptCtx::new(filename).with_description_mode(true);
        self.execute(filename, code, &script)?;
        Ok(script.script_info())
    }

    /// Loads a script and, when `auto_load_dependencies` is set, everything
    /// it depends on. Returns the filenames of the newly loaded scripts.
    pub fn load_script(&mut self, filename: &str) -> Result<Vec<String>, EngineError> {
        let mut loaded = vec![];
        self.load_with_dependencies(filename, &mut loaded)?;
        Ok(loaded)
    }

    fn load_with_dependencies(
        &mut self,
        filename: &str,
        loaded: &mut Vec<String>,
    ) -> Result<(), EngineError> {
        if self.scripts.contains_key(filename) {
            return Ok(());
        }
        let code = self.source(filename)?;
        let info = self.description_exec(filename, &code)?;
        if self.is_excluded(&info) {
            return Err(EngineError::Excluded(filename.to_owned()));
        }
        debug!(script = filename, oid = %info.oid, "loaded script");
        let script = Script { info, code };
        let dependencies: Vec<String> = script.dependencies().map(ToOwned::to_owned).collect();
        // registered before its dependencies so that cycles terminate
        self.scripts.insert(filename.to_owned(), script);
        loaded.push(filename.to_owned());
        if !self.config.auto_load_dependencies {
            return Ok(());
        }
        for dependency in dependencies {
            if let Err(e) = self.load_with_dependencies(&dependency, loaded) {
                warn!(script = filename, %dependency, error = %e, "unable to load dependency");
                self.scripts.shift_remove(filename);
                loaded.retain(|l| l != filename);
                return Err(e);
            }
            self.dependency_scripts.insert(dependency);
        }
        Ok(())
    }

    /// Loads every script below the plugin root matching the glob
    /// `pattern`. Scripts that fail to load are skipped with a warning.
    pub fn load_glob(&mut self, pattern: &str) -> Result<Vec<String>, EngineError> {
        let pattern_error = |reason: &str| EngineError::Pattern {
            pattern: pattern.to_owned(),
            reason: reason.to_owned(),
        };
        let root = self
            .loader
            .root_path()
            .map(Path::to_path_buf)
            .ok_or_else(|| pattern_error("no plugin root configured"))?;
        let full = root.join(pattern);
        let paths = glob::glob(&full.to_string_lossy()).map_err(|e| pattern_error(e.msg))?;
        let mut loaded = vec![];
        for path in paths.flatten() {
            let Ok(relative) = path.strip_prefix(&root) else {
                continue;
            };
            let name = relative.to_string_lossy().into_owned();
            if let Err(e) = self.load_with_dependencies(&name, &mut loaded) {
                warn!(script = %name, error = %e, "skipping script");
            }
        }
        Ok(loaded)
    }

    pub fn scripts(&self) -> impl Iterator<Item = &Script> {
        self.scripts.values()
    }

    pub fn script(&self, filename: &str) -> Option<&Script> {
        self.scripts.get(filename)
    }

    /// Whether `filename` was loaded as a dependency of another script.
    pub fn is_dependency(&self, filename: &str) -> bool {
        self.dependency_scripts.contains(filename)
    }

    /// The scripts no other loaded script depends on, in load order.
    pub fn root_scripts(&self) -> Vec<&Script> {
        let depended: HashSet<&str> = self.scripts().flat_map(Script::dependencies).collect();
        self.scripts()
            .filter(|s| !depended.contains(s.filename()))
            .collect()
    }

    /// Renders the root scripts with their dependencies below them.
    pub fn script_tree(&self) -> String {
        fn walk<'a>(
            engine: &'a ScriptEngine,
            script: &'a Script,
            depth: usize,
            path: &mut Vec<&'a str>,
            out: &mut String,
        ) {
            let _ = writeln!(out, "{}- {}", "  ".repeat(depth), script.filename());
            path.push(script.filename());
            for dependency in script.dependencies() {
                if path.contains(&dependency) {
                    continue;
                }
                if let Some(dep) = engine.script(dependency) {
                    walk(engine, dep, depth + 1, path, out);
                }
            }
            path.pop();
        }
        let mut out = String::new();
        for root in self.root_scripts() {
            walk(self, root, 0, &mut vec![], &mut out);
        }
        out
    }
}
