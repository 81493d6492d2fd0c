// ── PXE network screen ──
//
// Settings for PXE booting of slave nodes: which interface the embedded
// DHCP service runs on and the discovery pool it hands out. The pool
// fields are derived from the selected interface and preserved across
// navigation as long as they still fit its subnet.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::Arc;

use tracing::{error, info};

use bootforge_settings::{SettingsDoc, SettingsStore, Value};

use crate::error::CoreError;
use crate::feedback::Feedback;
use crate::keys;
use crate::model::{DeploymentMode, FieldDescriptor, InterfaceFacts};
use crate::probe::{DhcpOffer, DhcpProbe, DuplicateAddressProbe, NetworkFactsSource};
use crate::reconcile::{Edits, ReconciledDefaults, derive_pool_fields, reconcile};
use crate::validate::{
    NetworkCheckContext, ResponseValue, Responses, ValidationResult, check_network,
};

pub const SCREEN_NAME: &str = "PXE Setup";

const POOL_KEYS: [&str; 3] = [keys::DHCP_POOL_START, keys::DHCP_POOL_END, keys::DHCP_GATEWAY];

pub struct PxeSetup {
    facts: Box<dyn NetworkFactsSource>,
    dhcp: Arc<dyn DhcpProbe>,
    arp: Box<dyn DuplicateAddressProbe>,
    deployment: DeploymentMode,
    store: SettingsStore,

    interfaces: BTreeMap<String, InterfaceFacts>,
    gateway: Option<Ipv4Addr>,
    active_iface: String,
    oldsettings: SettingsDoc,
    edits: Edits,
}

impl PxeSetup {
    /// Build the screen: query the facts provider, load the persisted
    /// settings, and adopt the saved management interface when it still
    /// exists on this machine.
    pub fn new(
        facts: Box<dyn NetworkFactsSource>,
        dhcp: Arc<dyn DhcpProbe>,
        arp: Box<dyn DuplicateAddressProbe>,
        deployment: DeploymentMode,
        store: SettingsStore,
    ) -> Result<Self, CoreError> {
        let interfaces = facts.interfaces();
        let gateway = facts.default_gateway();
        let oldsettings = store.load().map_err(|source| CoreError::SettingsLoad {
            screen: SCREEN_NAME.to_owned(),
            source,
        })?;

        let mut active_iface = interfaces
            .keys()
            .next()
            .cloned()
            .ok_or(CoreError::NoInterfaces)?;
        if let Some(saved) = oldsettings.get_str(keys::ADMIN_INTERFACE) {
            if interfaces.contains_key(saved) {
                active_iface = saved.to_owned();
            }
        }

        let mut screen = Self {
            facts,
            dhcp,
            arp,
            deployment,
            store,
            interfaces,
            gateway,
            active_iface,
            oldsettings,
            edits: Edits::new(),
        };
        screen.derive_pool();
        Ok(screen)
    }

    pub fn descriptors() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::label("dynamic_label", "DHCP pool for node discovery:"),
            FieldDescriptor::text(
                keys::DHCP_POOL_START,
                "DHCP Pool Start",
                "Used for defining IPs for hosts and instance public addresses",
                "10.0.0.3",
            ),
            FieldDescriptor::text(
                keys::DHCP_POOL_END,
                "DHCP Pool End",
                "Used for defining IPs for hosts and instance public addresses",
                "10.0.0.254",
            ),
            FieldDescriptor::text(
                keys::DHCP_GATEWAY,
                "DHCP Gateway",
                "Default gateway to advertise via DHCP to nodes",
                "10.0.0.2",
            ),
        ]
    }

    pub fn active_iface(&self) -> &str {
        &self.active_iface
    }

    pub fn interfaces(&self) -> &BTreeMap<String, InterfaceFacts> {
        &self.interfaces
    }

    /// Last-saved settings document, replaced after each successful save.
    pub fn settings(&self) -> &SettingsDoc {
        &self.oldsettings
    }

    /// Re-query the facts provider so the view matches the machine.
    pub fn refresh(&mut self) {
        self.interfaces = self.facts.interfaces();
        self.gateway = self.facts.default_gateway();
    }

    /// Switch the management interface. Refreshes facts first; an
    /// interface that disappeared meanwhile is refused. The pool fields
    /// are re-derived for the new subnet.
    pub fn select_interface(&mut self, name: &str) -> bool {
        self.refresh();
        if !self.interfaces.contains_key(name) {
            return false;
        }
        self.active_iface = name.to_owned();
        self.derive_pool();
        true
    }

    /// Fold `edits` into the screen state and return the fresh
    /// current-defaults view for redraw.
    pub fn reconcile(&mut self, edits: &Edits) -> ReconciledDefaults {
        for (key, value) in edits {
            self.edits.insert(key.clone(), value.clone());
        }
        reconcile(&Self::descriptors(), &self.oldsettings, &self.edits)
    }

    /// Run the ordered network checks over the current view plus `edits`.
    pub fn check(&mut self, edits: &Edits, feedback: &mut dyn Feedback) -> ValidationResult {
        feedback.status("Checking data...");
        // Refresh networking to make sure the address still matches.
        self.refresh();
        let view = self.reconcile(edits);

        let mut responses = Responses::new();
        for key in POOL_KEYS {
            responses.insert(key.to_owned(), ResponseValue::text(view.text(key)));
        }

        let ctx = NetworkCheckContext {
            interfaces: &self.interfaces,
            active_iface: &self.active_iface,
            deployment: self.deployment,
            previous: &self.oldsettings,
            dhcp: Arc::clone(&self.dhcp),
            arp: self.arp.as_ref(),
        };
        let report = check_network(&ctx, responses, feedback);

        if !report.foreign_dhcp.is_empty() {
            feedback.notice(
                &format!("DHCP Servers Found on {}", self.active_iface),
                &foreign_dhcp_notice(&report.foreign_dhcp),
            );
        }
        match &report.result {
            ValidationResult::Rejected(errors) => feedback.notice("Check failed", &errors.join("\n")),
            ValidationResult::Accepted(_) => feedback.status("No errors found."),
        }
        report.result
    }

    /// Check, then persist on acceptance. `Ok(false)` means the check
    /// rejected and nothing was written.
    pub fn apply(&mut self, edits: &Edits, feedback: &mut dyn Feedback) -> Result<bool, CoreError> {
        match self.check(edits, feedback) {
            ValidationResult::Rejected(errors) => {
                error!(count = errors.len(), "check failed; not applying");
                Ok(false)
            }
            ValidationResult::Accepted(responses) => {
                self.save(&responses)?;
                feedback.status("Changes saved successfully.");
                Ok(true)
            }
        }
    }

    fn save(&mut self, responses: &Responses) -> Result<(), CoreError> {
        // Merge only the accepted keys into a copy of the last-saved
        // document; sections owned by other screens ride along.
        let mut newsettings = self.oldsettings.clone();
        for (key, value) in responses {
            newsettings.set(key, value.to_setting());
        }
        // Netmask always mirrors the live interface at save time.
        if let Some(facts) = self.interfaces.get(&self.active_iface) {
            newsettings.set(keys::ADMIN_NETMASK, Value::String(facts.netmask.to_string()));
        }

        self.store
            .write(&newsettings)
            .map_err(|source| CoreError::SettingsWrite {
                screen: SCREEN_NAME.to_owned(),
                source,
            })?;

        // Later checks compare against the latest saved state.
        self.oldsettings = newsettings;
        for key in POOL_KEYS {
            if let Some(value) = responses.get(key) {
                self.edits.insert(key.to_owned(), value.to_field_value());
            }
        }
        info!("PXE settings saved");
        Ok(())
    }

    /// Re-derive the pool fields for the active interface, folding the
    /// outcome into the edit layer so redraws keep it.
    fn derive_pool(&mut self) {
        let Some(facts) = self.interfaces.get(&self.active_iface) else {
            return;
        };
        let mut view = reconcile(&Self::descriptors(), &self.oldsettings, &self.edits);
        derive_pool_fields(&mut view, facts, self.gateway);
        for key in POOL_KEYS {
            if let Some(value) = view.get(key) {
                self.edits.insert(key.to_owned(), value.clone());
            }
        }
    }
}

fn foreign_dhcp_notice(offers: &[DhcpOffer]) -> String {
    let mut body = String::from(
        "You have selected an interface that contains one or more DHCP \
         servers. This will impact provisioning. You should disable these \
         DHCP servers before you continue, or else deployment will likely \
         fail.\n",
    );
    for (index, offer) in offers.iter().enumerate() {
        body.push_str(&format!(
            "\nDHCP Server #{}:\nIP address: {}\nMAC address: {}\n",
            index + 1,
            offer.server_ip,
            offer.mac
        ));
    }
    body
}
