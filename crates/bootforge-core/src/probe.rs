// ── External probe seams ──
//
// Interface enumeration, DHCP scanning, duplicate-address detection,
// and URL reachability are external I/O. The engine consumes them
// behind these traits so every validation pass can run deterministically
// under test, and so a slow or broken probe degrades instead of taking
// the whole pass down with it.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::time::Duration;

use thiserror::Error;

use crate::model::InterfaceFacts;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    #[error("probe interrupted")]
    Interrupted,

    #[error("url not available: {0}")]
    Unavailable(String),

    #[error("invalid protocol: {0}")]
    InvalidProtocol(String),
}

/// One foreign DHCP offer observed during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpOffer {
    pub server_ip: Ipv4Addr,
    pub mac: String,
    /// Address the foreign server offered us, when the scan captured it.
    pub offered_ip: Option<Ipv4Addr>,
}

/// Live view of the machine's interfaces and routing.
pub trait NetworkFactsSource {
    /// Current interface snapshot, keyed by interface name. Queried on
    /// demand; the engine never caches it across validation runs.
    fn interfaces(&self) -> BTreeMap<String, InterfaceFacts>;

    fn default_gateway(&self) -> Option<Ipv4Addr>;
}

/// Active scan for DHCP servers not under this system's control.
///
/// `Send + Sync` because the engine drives the scan from a bounded
/// worker so a wedged socket cannot stall validation.
pub trait DhcpProbe: Send + Sync {
    fn scan(&self, iface: &str, timeout: Duration) -> Result<Vec<DhcpOffer>, ProbeError>;
}

/// ARP-level duplicate address detection.
pub trait DuplicateAddressProbe {
    /// True when another host already answers for `address`. `bind`
    /// requests that the probe bind to `address` locally, which is only
    /// valid when that address is assigned to a local interface.
    fn duplicate_exists(&self, address: Ipv4Addr, iface: &str, bind: bool) -> bool;
}

/// HTTP/HTTPS proxies handed to the URL probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proxies {
    pub http: Option<String>,
    pub https: Option<String>,
}

impl Proxies {
    /// Build from raw proxy fields; whitespace-only input means no proxy.
    pub fn from_fields(http: &str, https: &str) -> Self {
        let clean = |raw: &str| {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        };
        Self {
            http: clean(http),
            https: clean(https),
        }
    }
}

/// Reachability check for repository URLs.
pub trait UrlProbe {
    fn is_reachable(&self, url: &str, proxies: &Proxies) -> Result<bool, ProbeError>;
}
