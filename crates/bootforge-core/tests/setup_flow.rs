// End-to-end flows for the setup screens: deterministic probes, a real
// temp-dir settings store, and the full check/apply lifecycle.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use bootforge_core::keys;
use bootforge_core::{
    BootProtocol, BootstrapImage, DeploymentMode, DhcpOffer, DhcpProbe, DuplicateAddressProbe,
    Edits, FieldValue, InterfaceFacts, LinkState, NetworkFactsSource, ProbeError, Proxies,
    PxeSetup, RepoEntryUi, ResponseValue, SilentFeedback, UrlProbe, ValidationResult,
};
use bootforge_settings::SettingsStore;

// ── Deterministic collaborators ─────────────────────────────────────

struct StaticFacts(BTreeMap<String, InterfaceFacts>, Option<Ipv4Addr>);

impl NetworkFactsSource for StaticFacts {
    fn interfaces(&self) -> BTreeMap<String, InterfaceFacts> {
        self.0.clone()
    }
    fn default_gateway(&self) -> Option<Ipv4Addr> {
        self.1
    }
}

struct QuietDhcp;
impl DhcpProbe for QuietDhcp {
    fn scan(&self, _iface: &str, _timeout: Duration) -> Result<Vec<DhcpOffer>, ProbeError> {
        Ok(Vec::new())
    }
}

struct NoDuplicates;
impl DuplicateAddressProbe for NoDuplicates {
    fn duplicate_exists(&self, _address: Ipv4Addr, _iface: &str, _bind: bool) -> bool {
        false
    }
}

struct Reachable;
impl UrlProbe for Reachable {
    fn is_reachable(&self, _url: &str, _proxies: &Proxies) -> Result<bool, ProbeError> {
        Ok(true)
    }
}

fn eth0_facts() -> StaticFacts {
    let mut map = BTreeMap::new();
    map.insert(
        "eth0".to_owned(),
        InterfaceFacts {
            name: "eth0".into(),
            address: Some("10.0.0.5".parse().expect("addr")),
            netmask: "255.255.255.0".parse().expect("mask"),
            mac: "52:54:00:12:34:56".into(),
            link: LinkState::Up,
            bootproto: BootProtocol::Static,
        },
    );
    StaticFacts(map, None)
}

fn store_in(dir: &tempfile::TempDir) -> SettingsStore {
    SettingsStore::new(dir.path().join("defaults.yaml"), dir.path().join("settings.yaml"))
}

fn pxe_screen(dir: &tempfile::TempDir) -> PxeSetup {
    PxeSetup::new(
        Box::new(eth0_facts()),
        Arc::new(QuietDhcp),
        Box::new(NoDuplicates),
        DeploymentMode::Pre,
        store_in(dir),
    )
    .expect("pxe screen")
}

fn pool_edits(start: &str, end: &str, gateway: &str) -> Edits {
    let mut edits = Edits::new();
    edits.insert(keys::DHCP_POOL_START.to_owned(), FieldValue::text(start));
    edits.insert(keys::DHCP_POOL_END.to_owned(), FieldValue::text(end));
    edits.insert(keys::DHCP_GATEWAY.to_owned(), FieldValue::text(gateway));
    edits
}

// ── Network screen ──────────────────────────────────────────────────

#[test]
fn clean_pxe_configuration_is_accepted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut screen = pxe_screen(&dir);

    let result = screen.check(
        &pool_edits("10.0.0.3", "10.0.0.254", "10.0.0.2"),
        &mut SilentFeedback,
    );
    let responses = match result {
        ValidationResult::Accepted(responses) => responses,
        ValidationResult::Rejected(errors) => panic!("expected acceptance, got {errors:?}"),
    };
    assert_eq!(
        responses.get(keys::ADMIN_INTERFACE).and_then(ResponseValue::as_text),
        Some("eth0")
    );
    assert_eq!(
        responses.get(keys::ADMIN_IPADDRESS).and_then(ResponseValue::as_text),
        Some("10.0.0.5")
    );
}

#[test]
fn pool_end_in_foreign_subnet_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut screen = pxe_screen(&dir);

    let result = screen.check(
        &pool_edits("10.0.0.3", "192.168.1.1", "10.0.0.2"),
        &mut SilentFeedback,
    );
    assert!(
        result
            .errors()
            .contains(&"DHCP Pool end does not match management network.".to_owned()),
        "unexpected errors: {:?}",
        result.errors()
    );
}

#[test]
fn pxe_apply_then_post_deployment_shrink_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");

    // First pass, pre-deployment: persist a pool.
    let mut screen = pxe_screen(&dir);
    let applied = screen
        .apply(&pool_edits("10.0.0.10", "10.0.0.100", "10.0.0.2"), &mut SilentFeedback)
        .expect("apply");
    assert!(applied);

    // Second pass, post-deployment, against the same store: a narrower
    // pool must be refused at both ends.
    let mut screen = PxeSetup::new(
        Box::new(eth0_facts()),
        Arc::new(QuietDhcp),
        Box::new(NoDuplicates),
        DeploymentMode::Post,
        store_in(&dir),
    )
    .expect("post screen");

    let result = screen.check(
        &pool_edits("10.0.0.20", "10.0.0.50", "10.0.0.2"),
        &mut SilentFeedback,
    );
    let errors = result.errors();
    assert!(errors.contains(&"DHCP range must contain previous values.".to_owned()));
    assert!(errors.contains(&"DHCP range can only be increased after deployment.".to_owned()));

    // Growth in both directions is fine.
    let result = screen.check(
        &pool_edits("10.0.0.3", "10.0.0.254", "10.0.0.2"),
        &mut SilentFeedback,
    );
    assert!(result.is_accepted());
}

// ── Bootstrap screen ────────────────────────────────────────────────

#[test]
fn ubuntu_repo_entry_round_trips_through_check() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut screen =
        BootstrapImage::new(Box::new(Reachable), store_in(&dir)).expect("bootstrap screen");

    let mut edits = Edits::new();
    edits.insert(
        keys::BOOTSTRAP_REPOS.to_owned(),
        FieldValue::Repos(vec![RepoEntryUi {
            name: "main".into(),
            uri: "deb http://example.com/ubuntu trusty main".into(),
            priority: String::new(),
        }]),
    );

    let result = screen.check(&edits, &mut SilentFeedback);
    let responses = match result {
        ValidationResult::Accepted(responses) => responses,
        ValidationResult::Rejected(errors) => panic!("expected acceptance, got {errors:?}"),
    };
    let repos = responses
        .get(keys::BOOTSTRAP_REPOS)
        .and_then(ResponseValue::as_repos)
        .expect("repos");
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].repo_type, "deb");
    assert_eq!(repos[0].uri, "http://example.com/ubuntu");
    assert_eq!(repos[0].suite, "trusty");
    assert_eq!(repos[0].section.as_deref(), Some("main"));
}

#[test]
fn both_screens_share_one_settings_file_without_clobbering() {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut pxe = pxe_screen(&dir);
    assert!(
        pxe.apply(&pool_edits("10.0.0.3", "10.0.0.254", "10.0.0.2"), &mut SilentFeedback)
            .expect("pxe apply")
    );

    let mut bootstrap =
        BootstrapImage::new(Box::new(Reachable), store_in(&dir)).expect("bootstrap screen");
    let mut edits = Edits::new();
    edits.insert(
        keys::BOOTSTRAP_REPOS.to_owned(),
        FieldValue::Repos(vec![RepoEntryUi {
            name: "main".into(),
            uri: "deb http://example.com/ubuntu trusty main".into(),
            priority: "1001".into(),
        }]),
    );
    assert!(bootstrap.apply(&edits, &mut SilentFeedback).expect("bootstrap apply"));

    // The bootstrap save carried the PXE section along verbatim.
    let saved = store_in(&dir).load().expect("reload");
    assert_eq!(saved.get_str(keys::ADMIN_INTERFACE), Some("eth0"));
    assert_eq!(saved.get_str(keys::DHCP_POOL_START), Some("10.0.0.3"));
    assert_eq!(saved.get_str(keys::BOOTSTRAP_FLAVOR), Some("ubuntu"));
}
