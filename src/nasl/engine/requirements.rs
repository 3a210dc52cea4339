// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Decides whether a script should run, based on the knowledge base of the
//! host.

use std::fmt::Display;

use regex::Regex;
use thiserror::Error;
use tracing::{error_span, trace, warn};

use crate::{
    nasl::{interpreter::atoi, utils::ScriptInfo},
    storage::{InMemoryKb, KbItem},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
        }
    }
}

/// The first requirement of a script that is not met.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequirementError {
    #[error("the mandatory key {0} is missing")]
    MissingMandatoryKey(String),
    #[error("the value of {key} does not match {pattern}")]
    MismatchedKey { key: String, pattern: String },
    #[error("the required key {0} is missing")]
    MissingRequiredKey(String),
    #[error("none of the required {0} ports are open")]
    MissingPort(Protocol),
    #[error("the excluded key {0} is present")]
    ContainsExcludedKey(String),
}

fn values(kb: &InMemoryKb, key: &str) -> Vec<KbItem> {
    let _span = error_span!("kb_item", %key).entered();
    match kb.get(key) {
        Ok(items) => {
            if items.is_empty() {
                trace!("not found");
            }
            items
        }
        Err(e) => {
            warn!(error = %e, "storage error");
            vec![]
        }
    }
}

fn is_true(item: &KbItem) -> bool {
    match item {
        KbItem::Number(n) => *n != 0,
        KbItem::String(s) => atoi(s) != 0,
    }
}

fn check_mandatory_key(kb: &InMemoryKb, entry: &str) -> Result<(), RequirementError> {
    let (key, pattern) = match entry.split_once('=') {
        Some((key, pattern)) => (key, Some(pattern)),
        None => (entry, None),
    };
    let found = values(kb, key);
    let Some(first) = found.first() else {
        return Err(RequirementError::MissingMandatoryKey(key.to_owned()));
    };
    if let Some(pattern) = pattern {
        let mismatch = || RequirementError::MismatchedKey {
            key: key.to_owned(),
            pattern: pattern.to_owned(),
        };
        let re = Regex::new(pattern).map_err(|_| mismatch())?;
        if !re.is_match(&first.to_string()) {
            return Err(mismatch());
        }
    }
    Ok(())
}

/// A port is either a number or a KB key listing port numbers, such as
/// `Services/www`.
fn port_is_open(kb: &InMemoryKb, protocol: Protocol, port: &str) -> bool {
    let port = port.trim();
    if port.parse::<u16>().is_ok() {
        return values(kb, &format!("Ports/{protocol}/{port}"))
            .first()
            .is_some_and(is_true);
    }
    values(kb, port).iter().any(|item| {
        let number = match item {
            KbItem::Number(n) => *n,
            KbItem::String(s) => atoi(s),
        };
        values(kb, &format!("Ports/{protocol}/{number}"))
            .first()
            .is_some_and(is_true)
    })
}

fn check_ports(
    kb: &InMemoryKb,
    protocol: Protocol,
    ports: &[String],
) -> Result<(), RequirementError> {
    if ports.is_empty() || ports.iter().any(|p| port_is_open(kb, protocol, p)) {
        Ok(())
    } else {
        Err(RequirementError::MissingPort(protocol))
    }
}

/// Checks mandatory keys, required keys, ports and excluded keys, in that
/// order.
pub fn check(info: &ScriptInfo, kb: &InMemoryKb) -> Result<(), RequirementError> {
    for entry in &info.mandatory_keys {
        check_mandatory_key(kb, entry)?;
    }
    for key in &info.required_keys {
        if values(kb, key).is_empty() {
            return Err(RequirementError::MissingRequiredKey(key.clone()));
        }
    }
    check_ports(kb, Protocol::Tcp, &info.required_ports)?;
    check_ports(kb, Protocol::Udp, &info.required_udp_ports)?;
    for key in &info.excluded_keys {
        if !values(kb, key).is_empty() {
            return Err(RequirementError::ContainsExcludedKey(key.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(f: impl FnOnce(&mut ScriptInfo)) -> ScriptInfo {
        let mut info = ScriptInfo::new("test.nasl");
        f(&mut info);
        info
    }

    #[test]
    fn no_requirements() {
        assert_eq!(check(&ScriptInfo::new("test.nasl"), &InMemoryKb::new()), Ok(()));
    }

    #[test]
    fn mandatory_keys() {
        let kb = InMemoryKb::new();
        let script = info(|i| i.mandatory_keys = vec!["ssh/banner=^SSH-2".to_owned()]);
        assert_eq!(
            check(&script, &kb),
            Err(RequirementError::MissingMandatoryKey("ssh/banner".to_owned()))
        );
        kb.add("ssh/banner", "SSH-1.5-old".into(), None).unwrap();
        assert!(matches!(
            check(&script, &kb),
            Err(RequirementError::MismatchedKey { .. })
        ));
        kb.replace("ssh/banner", "SSH-2.0-OpenSSH_9.6".into(), None)
            .unwrap();
        assert_eq!(check(&script, &kb), Ok(()));
    }

    #[test]
    fn required_and_excluded_keys() {
        let kb = InMemoryKb::new();
        let script = info(|i| {
            i.required_keys = vec!["Host/OS".to_owned()];
            i.excluded_keys = vec!["Host/dead".to_owned()];
        });
        assert_eq!(
            check(&script, &kb),
            Err(RequirementError::MissingRequiredKey("Host/OS".to_owned()))
        );
        kb.add("Host/OS", "linux".into(), None).unwrap();
        assert_eq!(check(&script, &kb), Ok(()));
        kb.add("Host/dead", 1.into(), None).unwrap();
        assert_eq!(
            check(&script, &kb),
            Err(RequirementError::ContainsExcludedKey("Host/dead".to_owned()))
        );
    }

    #[test]
    fn any_required_port_suffices() {
        let kb = InMemoryKb::new();
        let script = info(|i| {
            i.required_ports = vec!["443".to_owned(), "Services/www".to_owned()];
            i.required_udp_ports = vec!["161".to_owned()];
        });
        assert_eq!(
            check(&script, &kb),
            Err(RequirementError::MissingPort(Protocol::Tcp))
        );
        kb.add("Services/www", 8080.into(), None).unwrap();
        kb.add("Ports/tcp/8080", 1.into(), None).unwrap();
        assert_eq!(
            check(&script, &kb),
            Err(RequirementError::MissingPort(Protocol::Udp))
        );
        kb.add("Ports/udp/161", "1".into(), None).unwrap();
        assert_eq!(check(&script, &kb), Ok(()));
    }

    #[test]
    fn closed_ports_do_not_count() {
        let kb = InMemoryKb::new();
        kb.add("Ports/tcp/22", 0.into(), None).unwrap();
        let script = info(|i| i.required_ports = vec!["22".to_owned()]);
        assert_eq!(
            check(&script, &kb),
            Err(RequirementError::MissingPort(Protocol::Tcp))
        );
    }
}
