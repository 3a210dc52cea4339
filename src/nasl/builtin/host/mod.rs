// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

#[cfg(test)]
mod tests;

use crate::nasl::{interpreter::atoi, prelude::*};
use crate::storage::KbItem;

/// Return the target's IP address as a string.
fn get_host_ip(_: &Params, context: &Context) -> NaslResult {
    Ok(context.target().ip_addr().to_string().into())
}

/// Get the host name of the currently scanned target, which is the target
/// as it was given to the scan.
fn get_host_name(_: &Params, context: &Context) -> NaslResult {
    Ok(context.target().target().into())
}

fn target_is_ipv6(_: &Params, context: &Context) -> NaslResult {
    Ok(context.target().ip_addr().is_ipv6().into())
}

fn is_true(item: &KbItem) -> bool {
    match item {
        KbItem::Number(n) => *n != 0,
        KbItem::String(s) => atoi(s) != 0,
    }
}

/// A port counts as open when the knowledge base holds a true value under
/// `Ports/<protocol>/<port>`.
fn port_state(params: &Params, context: &Context, protocol: &str) -> NaslResult {
    let port = params.required_positional(0)?.to_number();
    let open = context
        .kb()
        .get(&format!("Ports/{protocol}/{port}"))?
        .first()
        .is_some_and(is_true);
    Ok(open.into())
}

/// Returns the lowest open TCP port of the target, or 0 when none is known.
fn get_host_open_port(_: &Params, context: &Context) -> NaslResult {
    let port = context
        .kb()
        .get_matching("Ports/tcp/*")?
        .iter()
        .filter(|(_, item)| is_true(item))
        .filter_map(|(key, _)| key.strip_prefix("Ports/tcp/")?.parse::<u16>().ok())
        .min()
        .unwrap_or_default();
    Ok(NaslValue::Number(port.into()))
}

/// Returns whether the given TCP port is open on the target.
fn get_port_state(params: &Params, context: &Context) -> NaslResult {
    port_state(params, context, "tcp")
}

/// Returns whether the given UDP port is open on the target.
fn get_udp_port_state(params: &Params, context: &Context) -> NaslResult {
    port_state(params, context, "udp")
}

pub struct Host;

function_set! {
    Host,
    sync_stateless,
    (
        get_host_ip,
        get_host_name,
        (target_is_ipv6, "TARGET_IS_IPV6"),
        get_port_state,
        (get_port_state, "get_tcp_port_state"),
        get_udp_port_state,
        get_host_open_port,
    )
}
