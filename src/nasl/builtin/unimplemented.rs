// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Functions that scripts may call but that have no implementation, mostly
//! socket I/O, packet forging and cryptography. They are registered so that
//! calls compile as builtin calls, and fail with a fatal error when reached.

use super::BuiltinError;
use crate::nasl::prelude::*;

fn not_implemented(_: &Params, context: &Context) -> NaslResult {
    Err(BuiltinError::NotImplemented(context.function().to_owned()).into())
}

pub struct Unimplemented;

function_set! {
    Unimplemented,
    sync_stateless,
    (
        (not_implemented, "open_sock_tcp"),
        (not_implemented, "open_sock_udp"),
        (not_implemented, "open_priv_sock_tcp"),
        (not_implemented, "open_priv_sock_udp"),
        (not_implemented, "open_sock_kdc"),
        (not_implemented, "close"),
        (not_implemented, "send"),
        (not_implemented, "recv"),
        (not_implemented, "recv_line"),
        (not_implemented, "socket_negotiate_ssl"),
        (not_implemented, "get_source_port"),
        (not_implemented, "telnet_init"),
        (not_implemented, "ftp_log_in"),
        (not_implemented, "ftp_get_pasv_port"),
        (not_implemented, "start_denial"),
        (not_implemented, "end_denial"),
        (not_implemented, "forge_ip_packet"),
        (not_implemented, "get_ip_element"),
        (not_implemented, "set_ip_elements"),
        (not_implemented, "forge_tcp_packet"),
        (not_implemented, "get_tcp_element"),
        (not_implemented, "set_tcp_elements"),
        (not_implemented, "forge_udp_packet"),
        (not_implemented, "forge_icmp_packet"),
        (not_implemented, "send_packet"),
        (not_implemented, "pcap_next"),
        (not_implemented, "send_capture"),
        (not_implemented, "MD5"),
        (not_implemented, "SHA1"),
        (not_implemented, "SHA256"),
        (not_implemented, "HMAC_MD5"),
        (not_implemented, "HMAC_SHA1"),
        (not_implemented, "HMAC_SHA256"),
        (not_implemented, "ssh_connect"),
        (not_implemented, "ssh_login_interactive"),
        (not_implemented, "http_get"),
        (not_implemented, "http_post"),
        (not_implemented, "gettimeofday"),
        (not_implemented, "localtime"),
        (not_implemented, "mktime"),
        (not_implemented, "dump_ctxt"),
        (not_implemented, "same_host"),
        (not_implemented, "this_host"),
        (not_implemented, "this_host_name"),
        (not_implemented, "script_get_preference_file_location"),
    )
}

#[cfg(test)]
mod tests {
    use crate::nasl::{
        builtin::BuiltinError, interpreter::FunctionCallError, test_prelude::*,
        utils::FnErrorKind,
    };

    #[test]
    fn calls_fail_with_the_function_name() {
        let mut t = TestBuilder::default();
        t.check(
            "open_sock_tcp(80);",
            |result| match result {
                Err(Interrupt::Fault(e)) => {
                    e.to_string().contains("method `open_sock_tcp` is not implement")
                        && matches!(
                            &e.kind,
                            InterpretErrorKind::FunctionCall(FunctionCallError {
                                kind: FnErrorKind::Builtin(BuiltinError::NotImplemented(name)),
                                ..
                            }) if name == "open_sock_tcp"
                        )
                }
                _ => false,
            },
            Some("not implemented fault"),
        );
    }

    #[test]
    fn source_address_is_not_implemented() {
        let mut t = TestBuilder::default();
        check_err_matches!(
            t,
            "this_host();",
            InterpretErrorKind::FunctionCall(FunctionCallError {
                kind: FnErrorKind::Builtin(BuiltinError::NotImplemented(_)),
                ..
            })
        );
    }
}
