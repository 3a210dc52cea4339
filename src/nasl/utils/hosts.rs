// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::net::{IpAddr, ToSocketAddrs};

/// Resolves a hostname or address to its IP addresses.
pub fn resolve(hostname: &str) -> Vec<IpAddr> {
    if let Ok(ip) = hostname.parse::<IpAddr>() {
        return vec![ip];
    }
    //std::net to_socket_addrs() requires a port. Therefore, using a dummy port
    match (hostname, 5000).to_socket_addrs() {
        Ok(addrs) => addrs.map(|a| a.ip()).collect(),
        Err(_) => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_addresses_resolve_to_themselves() {
        assert_eq!(resolve("127.0.0.1"), vec![IpAddr::from([127, 0, 0, 1])]);
        assert_eq!(resolve("::1"), vec!["::1".parse::<IpAddr>().unwrap()]);
    }
}
