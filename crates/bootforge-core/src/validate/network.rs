// ── Network / PXE screen validator ──
//
// Ordered sanity checks for the management network and DHCP pool. The
// pass accumulates: a failed check never hides the ones after it,
// except that an interface with no address makes every subnet check
// meaningless and skips them for this pass. A field that does not parse
// as an address skips only its own dependent checks. The foreign-DHCP
// scan is informational and runs for any known interface, configured
// or not.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use bootforge_settings::SettingsDoc;

use crate::feedback::Feedback;
use crate::keys;
use crate::model::{BootProtocol, DeploymentMode, InterfaceFacts};
use crate::net::{address_range, same_subnet};
use crate::probe::{DhcpOffer, DhcpProbe, DuplicateAddressProbe};
use crate::timeout::run_with_timeout;
use crate::validate::{ResponseValue, Responses, ValidationResult, response_text};

/// Hard deadline for the foreign-DHCP scan.
pub const DHCP_SCAN_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything the network validator needs beyond the responses.
pub struct NetworkCheckContext<'a> {
    pub interfaces: &'a BTreeMap<String, InterfaceFacts>,
    pub active_iface: &'a str,
    pub deployment: DeploymentMode,
    /// Last saved settings, read for the post-deployment invariants.
    pub previous: &'a SettingsDoc,
    pub dhcp: Arc<dyn DhcpProbe>,
    pub arp: &'a dyn DuplicateAddressProbe,
}

/// Outcome of one pass: the verdict plus any foreign DHCP offers to
/// surface as an informational notice (never a validation error).
#[derive(Debug)]
pub struct NetworkCheckReport {
    pub result: ValidationResult,
    pub foreign_dhcp: Vec<DhcpOffer>,
}

/// Run the ordered network checks over `responses`.
///
/// On entry `responses` holds the operator's pool fields; the selected
/// interface's identity (name, netmask, mac, address) is folded in here
/// so an accepted mapping is complete for persistence.
pub fn check_network(
    ctx: &NetworkCheckContext<'_>,
    mut responses: Responses,
    feedback: &mut dyn Feedback,
) -> NetworkCheckReport {
    let mut errors = Vec::new();

    let Some(facts) = ctx.interfaces.get(ctx.active_iface) else {
        return NetworkCheckReport {
            result: ValidationResult::Rejected(vec!["Management interface not valid".to_owned()]),
            foreign_dhcp: Vec::new(),
        };
    };

    responses.insert(keys::ADMIN_INTERFACE.to_owned(), ResponseValue::text(ctx.active_iface));
    responses.insert(
        keys::ADMIN_NETMASK.to_owned(),
        ResponseValue::Text(facts.netmask.to_string()),
    );
    responses.insert(keys::ADMIN_MAC.to_owned(), ResponseValue::Text(facts.mac.clone()));
    responses.insert(
        keys::ADMIN_IPADDRESS.to_owned(),
        ResponseValue::Text(facts.address_text()),
    );

    feedback.status("Scanning for DHCP servers. Please wait...");
    let foreign_dhcp = scan_foreign_dhcp(Arc::clone(&ctx.dhcp), ctx.active_iface);

    if let Some(mgmt_ip) = facts.address {
        check_configured_interface(ctx, facts, mgmt_ip, &responses, &mut errors, feedback);
    } else {
        errors.push("Go to Interfaces to configure management interface first.".to_owned());
    }

    if !errors.is_empty() {
        error!(count = errors.len(), ?errors, "network check failed");
    }
    NetworkCheckReport {
        result: ValidationResult::from_errors(responses, errors),
        foreign_dhcp,
    }
}

fn check_configured_interface(
    ctx: &NetworkCheckContext<'_>,
    facts: &InterfaceFacts,
    mgmt_ip: Ipv4Addr,
    responses: &Responses,
    errors: &mut Vec<String>,
    feedback: &mut dyn Feedback,
) {
    if facts.bootproto == BootProtocol::Dhcp {
        errors.push(format!(
            "{} is running DHCP. Change it to static first.",
            ctx.active_iface
        ));
    }

    // Each pool field parses on its own; one bad field does not hide
    // the others, it only skips its own subnet checks below.
    let start = parse_field(responses, keys::DHCP_POOL_START, "DHCP Pool Start", errors);
    let gateway = parse_field(responses, keys::DHCP_GATEWAY, "DHCP Gateway", errors);
    let end = parse_field(responses, keys::DHCP_POOL_END, "DHCP Pool end", errors);

    let netmask = facts.netmask;
    if let (Some(start), Some(end)) = (start, end) {
        if !same_subnet(start, end, netmask) {
            errors.push("DHCP Pool start and end are not in the same subnet.".to_owned());
        }
    }
    if let Some(start) = start {
        if !same_subnet(start, mgmt_ip, netmask) {
            errors.push("DHCP Pool start does not match management network.".to_owned());
        }
    }
    if let Some(end) = end {
        if !same_subnet(end, mgmt_ip, netmask) {
            errors.push("DHCP Pool end does not match management network.".to_owned());
        }
    }
    if let Some(gateway) = gateway {
        if !same_subnet(gateway, mgmt_ip, netmask) {
            errors.push("DHCP Gateway does not match management network.".to_owned());
        }
    }

    feedback.status("Scanning for duplicate IP addresses. Please wait...");
    // Bind the probe to the management address only if it is actually
    // assigned locally.
    let bind = ctx.interfaces.values().any(|f| f.address == Some(mgmt_ip));
    if ctx.arp.duplicate_exists(mgmt_ip, ctx.active_iface, bind) {
        errors.push(format!("Duplicate host found with IP {mgmt_ip}."));
    }

    if ctx.deployment == DeploymentMode::Post {
        check_post_deployment(ctx, responses, errors);
    }
}

fn parse_field(
    responses: &Responses,
    key: &str,
    label: &str,
    errors: &mut Vec<String>,
) -> Option<Ipv4Addr> {
    match response_text(responses, key).parse::<Ipv4Addr>() {
        Ok(addr) => Some(addr),
        Err(_) => {
            errors.push(format!("Invalid IP address for {label}"));
            None
        }
    }
}

/// Foreign-DHCP scan with a hard deadline. Timeouts and interruptions
/// degrade to "no servers found" -- the scan is informational.
fn scan_foreign_dhcp(probe: Arc<dyn DhcpProbe>, iface: &str) -> Vec<DhcpOffer> {
    let iface = iface.to_owned();
    let outcome = run_with_timeout(DHCP_SCAN_TIMEOUT, Ok(Vec::new()), move || {
        probe.scan(&iface, DHCP_SCAN_TIMEOUT)
    });

    match outcome {
        Ok(offers) => {
            if offers.is_empty() {
                debug!("no DHCP servers found");
            } else {
                error!(count = offers.len(), ?offers, "foreign DHCP server(s) found");
            }
            offers
        }
        Err(err) => {
            warn!(%err, "DHCP scan did not complete; assuming no servers");
            Vec::new()
        }
    }
}

/// After deployment the management interface is pinned and the pool
/// range may only grow.
fn check_post_deployment(
    ctx: &NetworkCheckContext<'_>,
    responses: &Responses,
    errors: &mut Vec<String>,
) {
    if let Some(old_iface) = ctx.previous.get_str(keys::ADMIN_INTERFACE) {
        if old_iface != ctx.active_iface {
            errors.push("Cannot change admin interface after deployment".to_owned());
        }
    }

    let old_range = match (
        ctx.previous.get_str(keys::DHCP_POOL_START),
        ctx.previous.get_str(keys::DHCP_POOL_END),
    ) {
        (Some(start), Some(end)) => address_range(start, end),
        _ => None,
    };
    let new_range = address_range(
        response_text(responses, keys::DHCP_POOL_START),
        response_text(responses, keys::DHCP_POOL_END),
    );

    // Earlier checks already reported unparsable fields; nothing more
    // to compare without both ranges.
    let (Some(old_range), Some(new_range)) = (old_range, new_range) else {
        return;
    };

    if !new_range.contains(old_range.first()) {
        errors.push("DHCP range must contain previous values.".to_owned());
    }
    if !new_range.contains(old_range.last()) {
        errors.push("DHCP range can only be increased after deployment.".to_owned());
    }
}
