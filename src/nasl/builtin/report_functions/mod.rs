// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use tracing::{error, info, warn};

use crate::nasl::{
    prelude::*,
    utils::{ResultKind, ScanResult},
};

#[cfg(test)]
mod tests;

/// Log target of `security_message`.
pub const REPORT_SECURITY: &str = "nasl::security";
/// Log target of `log_message`.
pub const REPORT_COMMON: &str = "nasl::common";
/// Log target of `error_message`.
pub const REPORT_ERROR: &str = "nasl::error";

#[derive(Debug, Clone, Default)]
/// The report builtin functions
pub struct Reporting;

impl Reporting {
    fn store_result(kind: ResultKind, params: &Params, context: &Context) -> ScanResult {
        let message = params.str_by_name("data").unwrap_or_else(|| match kind {
            ResultKind::Alarm => "Success".to_owned(),
            _ => String::new(),
        });
        let protocol = params
            .get_param_by_name("proto")
            .or_else(|| params.get_param_by_name("protocol"))
            .map(ToString::to_string)
            .filter(|p| p == "udp")
            .unwrap_or_else(|| "tcp".to_owned());
        let script = context.script();
        let result = ScanResult {
            kind,
            script: script.filename().to_owned(),
            oid: script.with_info(|info| info.oid.clone()),
            host: context.target().ip_addr().to_string(),
            port: params.int_by_name("port").filter(|p| *p >= 0),
            protocol,
            message,
        };
        script.add_result(result.clone());
        result
    }

    /// *void* **log_message**(data: *string*, port:*int* , proto: *string*);
    ///
    /// Creates a log result based on the given arguments
    /// - data, is the text report
    /// - port, optional TCP or UDP port number of the service
    /// - proto is the protocol ("tcp" by default; "udp" is the other value).
    fn log_message(params: &Params, context: &Context) -> NaslResult {
        let r = Self::store_result(ResultKind::Log, params, context);
        info!(target: REPORT_COMMON, oid = %r.oid, port = r.port, "{}", r.message);
        Ok(NaslValue::Null)
    }

    /// *void* **security_message**(data: *string*, port:*int* , proto: *string*);
    ///
    /// Creates a alarm result based on the given arguments. Without data the
    /// message is `Success`.
    fn security_message(params: &Params, context: &Context) -> NaslResult {
        let r = Self::store_result(ResultKind::Alarm, params, context);
        warn!(
            target: REPORT_SECURITY,
            oid = %r.oid,
            port = r.port,
            protocol = %r.protocol,
            "{}",
            r.message
        );
        Ok(NaslValue::Null)
    }

    /// *void* **error_message**(data: *string*, port:*int* , proto: *string*);
    ///
    /// Creates a error result based on the given arguments
    fn error_message(params: &Params, context: &Context) -> NaslResult {
        let r = Self::store_result(ResultKind::Error, params, context);
        error!(target: REPORT_ERROR, oid = %r.oid, port = r.port, "{}", r.message);
        Ok(NaslValue::Null)
    }
}

function_set! {
    Reporting,
    sync_stateless,
    (
        (Reporting::log_message, "log_message"),
        (Reporting::security_message, "security_message"),
        (Reporting::error_message, "error_message"),
    )
}
