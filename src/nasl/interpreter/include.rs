// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use tracing::debug;

use super::{InterpretErrorKind, Interpreter, NaslValue, Result};
use crate::nasl::compiler::CompileOptions;

impl Interpreter<'_> {
    /// Loads, compiles and runs an include file within this session. Files
    /// that were included before are skipped.
    pub(super) fn include(&mut self, name: &NaslValue) -> Result<()> {
        let file = name.to_string();
        if !file.ends_with(".inc") {
            return Err(InterpretErrorKind::InvalidIncludeName(file).into());
        }
        if !self.included.insert(file.clone()) {
            debug!(file, "already included");
            return Ok(());
        }
        let code = self.loader.load(&file).map_err(InterpretErrorKind::Load)?;
        let options = CompileOptions {
            keep_last_value: false,
            ..self.options.compile.clone()
        };
        let unit = self
            .compile_with(&file, &code, &options)
            .map_err(InterpretErrorKind::Compile)?;
        debug!(file, instructions = unit.code.len(), "including");
        self.execute(&unit.code)?;
        Ok(())
    }
}
