// ── Field reconciliation ──
//
// Merges three layers into one current-defaults view: the screen's
// static descriptors, the persisted settings document, and the
// operator's in-progress edits. The result is a fresh immutable value
// every time; callers replace their view instead of mutating shared
// state. Reconciliation covers *all* of a screen's descriptors, so a
// field hidden by the current flavor keeps its last value and
// re-showing it does not regress.

use std::net::Ipv4Addr;

use indexmap::IndexMap;
use tracing::debug;

use bootforge_settings::{SettingsDoc, Value};

use crate::keys;
use crate::model::repo;
use crate::model::{FieldDescriptor, FieldValue, Flavor, InterfaceFacts, RepoEntryStorage, WidgetKind};
use crate::net::{in_same_subnet, network_addresses};

/// The operator's in-progress edits, keyed like descriptors.
pub type Edits = IndexMap<String, FieldValue>;

/// Current value for every field of a screen. Derived, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciledDefaults(IndexMap<String, FieldValue>);

impl ReconciledDefaults {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Text value of a field; empty for missing or non-text fields.
    pub fn text(&self, key: &str) -> &str {
        self.get(key).and_then(FieldValue::as_text).unwrap_or("")
    }

    /// Flag value of a field; false for missing or non-flag fields.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(FieldValue::as_flag).unwrap_or(false)
    }

    /// Repository rows of a list field; empty for anything else.
    pub fn repos(&self, key: &str) -> &[crate::model::RepoEntryUi] {
        self.get(key).and_then(FieldValue::as_repos).unwrap_or(&[])
    }

    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        self.0.insert(key.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Merge descriptors, persisted settings, and edits into one view.
///
/// Layering per field: an in-memory edit wins, then the persisted
/// value, then the descriptor default. Idempotent -- the same inputs
/// always produce the same output.
pub fn reconcile(
    descriptors: &[FieldDescriptor],
    persisted: &SettingsDoc,
    edits: &Edits,
) -> ReconciledDefaults {
    let mut out = ReconciledDefaults::default();
    for desc in descriptors {
        let value = edits
            .get(desc.key)
            .cloned()
            .or_else(|| value_from_settings(persisted.get(desc.key), desc))
            .unwrap_or_else(|| desc.default.clone());
        out.set(desc.key, value);
    }
    out
}

/// Coerce one persisted value to the shape its descriptor expects.
/// Anything that does not fit is ignored so the default applies.
fn value_from_settings(raw: Option<&Value>, desc: &FieldDescriptor) -> Option<FieldValue> {
    let Some(raw) = raw else {
        debug!(key = desc.key, "setting not present; using default");
        return None;
    };
    match desc.widget {
        WidgetKind::Checkbox => raw.as_bool().map(FieldValue::Flag),
        WidgetKind::List => {
            let stored: Vec<RepoEntryStorage> = serde_yaml::from_value(raw.clone()).ok()?;
            Some(FieldValue::Repos(repo::list_to_ui(&stored)))
        }
        _ => settings_text(raw).map(FieldValue::Text),
    }
}

fn settings_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ── Visible field set ───────────────────────────────────────────────

/// Which bootstrap-screen fields are visible for the current flavor and
/// skip-build selections. Pure data; rendering is external.
pub fn visible_fields(flavor: Flavor, skip_build: bool) -> Vec<&'static str> {
    let mut fields = vec![keys::BOOTSTRAP_FLAVOR];
    if !flavor.is_ubuntu() {
        return fields;
    }
    fields.push(keys::BOOTSTRAP_SKIP_BUILD);
    if skip_build {
        return fields;
    }
    fields.extend([
        keys::BOOTSTRAP_HTTP_PROXY,
        keys::BOOTSTRAP_HTTPS_PROXY,
        keys::BOOTSTRAP_REPOS,
    ]);
    fields
}

// ── Derived pool bounds ─────────────────────────────────────────────

/// Recompute the DHCP pool fields for the selected interface.
///
/// A pool start that still lies in the interface subnet is operator
/// intent and is kept, so navigating away and back does not clobber an
/// edit. Pool end is judged on its own: a stale end is recomputed even
/// when start survives. When start itself no longer fits, start and end
/// are recomputed from the usable host range (gateway excluded) and the
/// advertised gateway falls back to the interface address.
pub fn derive_pool_fields(
    defaults: &mut ReconciledDefaults,
    facts: &InterfaceFacts,
    gateway: Option<Ipv4Addr>,
) {
    let Some(addr) = facts.address else {
        // Nothing to derive from; blank the pool so the operator sees
        // the interface needs configuring first.
        defaults.set(keys::DHCP_POOL_START, FieldValue::text(""));
        defaults.set(keys::DHCP_POOL_END, FieldValue::text(""));
        defaults.set(keys::DHCP_GATEWAY, FieldValue::text(""));
        return;
    };

    let addr_text = addr.to_string();
    let start_ok = in_same_subnet(defaults.text(keys::DHCP_POOL_START), &addr_text, facts.netmask);
    let end_ok = in_same_subnet(defaults.text(keys::DHCP_POOL_END), &addr_text, facts.netmask);

    if start_ok && end_ok {
        debug!(iface = %facts.name, "existing pool matches interface subnet; keeping");
        return;
    }

    let hosts = network_addresses(addr, facts.netmask, gateway);
    let host_text = |a: Option<Ipv4Addr>| a.map(|a| a.to_string()).unwrap_or_default();

    if start_ok {
        debug!(iface = %facts.name, "pool end left the interface subnet; recomputing end");
        defaults.set(keys::DHCP_POOL_END, FieldValue::Text(host_text(hosts.last())));
        return;
    }

    debug!(iface = %facts.name, "pool does not match interface subnet; recomputing");
    defaults.set(keys::DHCP_POOL_START, FieldValue::Text(host_text(hosts.first())));
    defaults.set(keys::DHCP_POOL_END, FieldValue::Text(host_text(hosts.last())));
    defaults.set(keys::DHCP_GATEWAY, FieldValue::Text(addr_text));
}
