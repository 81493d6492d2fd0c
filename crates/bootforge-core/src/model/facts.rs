// ── Interface facts ──
//
// Read-only snapshot of one interface as reported by the network facts
// provider. The engine never caches these across validation runs -- the
// provider is re-queried so the view matches the machine.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Link carrier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum LinkState {
    Up,
    Down,
}

/// How the interface currently obtains its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BootProtocol {
    Static,
    Dhcp,
}

/// Per-interface snapshot supplied by the network facts provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceFacts {
    pub name: String,
    /// None when the interface holds no IPv4 address.
    pub address: Option<Ipv4Addr>,
    pub netmask: Ipv4Addr,
    pub mac: String,
    pub link: LinkState,
    pub bootproto: BootProtocol,
}

impl InterfaceFacts {
    pub fn has_address(&self) -> bool {
        self.address.is_some()
    }

    /// The address rendered the way response mappings carry it: dotted
    /// quad, or an empty string when unassigned.
    pub fn address_text(&self) -> String {
        self.address.map(|a| a.to_string()).unwrap_or_default()
    }
}
