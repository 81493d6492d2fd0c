// ── Subnet and address-range arithmetic ──
//
// IPv4 only; the appliance provisions over IPv4. All string-accepting
// functions fail closed on unparsable input -- a bad address is the
// validator's problem to report, never a reason to panic here.

use std::net::Ipv4Addr;

/// True when both addresses share a network under `netmask`. Fails
/// closed: any input that does not parse as a dotted quad makes the
/// test false.
pub fn in_same_subnet(a: &str, b: &str, netmask: Ipv4Addr) -> bool {
    match (a.parse::<Ipv4Addr>(), b.parse::<Ipv4Addr>()) {
        (Ok(a), Ok(b)) => same_subnet(a, b, netmask),
        _ => false,
    }
}

/// Typed variant of [`in_same_subnet`].
pub fn same_subnet(a: Ipv4Addr, b: Ipv4Addr, netmask: Ipv4Addr) -> bool {
    let mask = u32::from(netmask);
    u32::from(a) & mask == u32::from(b) & mask
}

/// Usable host addresses of the subnet containing `address` under
/// `netmask`, excluding the network address, the broadcast address, and
/// `exclude` (typically the gateway).
pub fn network_addresses(
    address: Ipv4Addr,
    netmask: Ipv4Addr,
    exclude: Option<Ipv4Addr>,
) -> SubnetHosts {
    let mask = u32::from(netmask);
    let network = u32::from(address) & mask;
    let broadcast = network | !mask;
    SubnetHosts {
        network,
        broadcast,
        exclude: exclude.map(u32::from),
    }
}

/// Ordered sequence of usable host addresses in one subnet.
///
/// Hosts occupy the open interval (network, broadcast); `exclude` is
/// skipped wherever it falls. For /31 and /32 masks the sequence is
/// empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubnetHosts {
    network: u32,
    broadcast: u32,
    exclude: Option<u32>,
}

impl SubnetHosts {
    fn host_span(&self) -> std::ops::Range<u32> {
        self.network.saturating_add(1)..self.broadcast
    }

    fn is_excluded(&self, raw: u32) -> bool {
        self.exclude == Some(raw)
    }

    /// Lowest usable host, used as the proposed pool start.
    pub fn first(&self) -> Option<Ipv4Addr> {
        self.host_span().find(|&h| !self.is_excluded(h)).map(Ipv4Addr::from)
    }

    /// Highest usable host, used as the proposed pool end.
    pub fn last(&self) -> Option<Ipv4Addr> {
        self.host_span().rev().find(|&h| !self.is_excluded(h)).map(Ipv4Addr::from)
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let raw = u32::from(addr);
        self.host_span().contains(&raw) && !self.is_excluded(raw)
    }

    pub fn len(&self) -> usize {
        let span = self.host_span();
        let excluded = usize::from(self.exclude.is_some_and(|e| span.contains(&e)));
        span.end.saturating_sub(span.start) as usize - excluded
    }

    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.host_span()
            .filter(move |&h| !self.is_excluded(h))
            .map(Ipv4Addr::from)
    }
}

/// Inclusive ascending address range, used for containment checks.
///
/// None when either bound fails to parse or the bounds are reversed.
pub fn address_range(start: &str, end: &str) -> Option<AddressRange> {
    let start: Ipv4Addr = start.parse().ok()?;
    let end: Ipv4Addr = end.parse().ok()?;
    let (start, end) = (u32::from(start), u32::from(end));
    (start <= end).then_some(AddressRange { start, end })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    start: u32,
    end: u32,
}

impl AddressRange {
    pub fn first(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.start)
    }

    pub fn last(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.end)
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        (self.start..=self.end).contains(&u32::from(addr))
    }

    /// Whether this range covers `other` at both ends.
    pub fn covers(&self, other: &AddressRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn iter(&self) -> impl Iterator<Item = Ipv4Addr> {
        (self.start..=self.end).map(Ipv4Addr::from)
    }
}
