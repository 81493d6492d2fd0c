// ── Bootstrap image screen ──
//
// Flavor selection plus, for ubuntu builds, the proxy and repository
// configuration the image builder needs. Which fields exist at all
// depends on the flavor and the skip-build flag; hidden fields keep
// their values so flipping the flags back restores the previous state.

use tracing::{error, info};

use bootforge_settings::{SettingsDoc, SettingsStore};

use crate::error::CoreError;
use crate::feedback::Feedback;
use crate::keys;
use crate::model::{FieldDescriptor, FieldValue, Flavor, RepoEntryUi, SubField};
use crate::probe::UrlProbe;
use crate::reconcile::{Edits, ReconciledDefaults, reconcile, visible_fields};
use crate::validate::{ResponseValue, Responses, ValidationResult, check_bootstrap};

pub const SCREEN_NAME: &str = "Bootstrap Image";

/// Columns of one repository row in the list editor.
pub const REPO_VALUE_SCHEME: &[SubField] = &[
    SubField {
        key: "name",
        label: "Name",
        tooltip: "Repository name",
    },
    SubField {
        key: "uri",
        label: "Deb repo",
        tooltip: "Repo in format: deb uri distribution [component1] [...]",
    },
    SubField {
        key: "priority",
        label: "Priority",
        tooltip: "Repository priority",
    },
];

pub struct BootstrapImage {
    url_probe: Box<dyn UrlProbe>,
    store: SettingsStore,
    oldsettings: SettingsDoc,
    edits: Edits,
}

impl BootstrapImage {
    pub fn new(url_probe: Box<dyn UrlProbe>, store: SettingsStore) -> Result<Self, CoreError> {
        let oldsettings = store.load().map_err(|source| CoreError::SettingsLoad {
            screen: SCREEN_NAME.to_owned(),
            source,
        })?;
        Ok(Self {
            url_probe,
            store,
            oldsettings,
            edits: Edits::new(),
        })
    }

    pub fn descriptors() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::radio(
                keys::BOOTSTRAP_FLAVOR,
                "Flavor",
                &["Ubuntu", "CentOS"],
                "ubuntu",
            ),
            FieldDescriptor::checkbox(
                keys::BOOTSTRAP_SKIP_BUILD,
                "Skip building bootstrap image",
                false,
            ),
            FieldDescriptor::text(
                keys::BOOTSTRAP_HTTP_PROXY,
                "HTTP proxy",
                "Use this proxy when building the bootstrap image",
                "",
            ),
            FieldDescriptor::text(
                keys::BOOTSTRAP_HTTPS_PROXY,
                "HTTPS proxy",
                "Use this proxy when building the bootstrap image",
                "",
            ),
            FieldDescriptor::list(keys::BOOTSTRAP_REPOS, "List of repositories", REPO_VALUE_SCHEME),
        ]
    }

    /// Last-saved settings document, replaced after each successful save.
    pub fn settings(&self) -> &SettingsDoc {
        &self.oldsettings
    }

    pub fn flavor(&self) -> Flavor {
        Flavor::from_setting(self.view().text(keys::BOOTSTRAP_FLAVOR))
    }

    pub fn skip_build(&self) -> bool {
        self.view().flag(keys::BOOTSTRAP_SKIP_BUILD)
    }

    /// The field keys the renderer should show right now.
    pub fn visible_fields(&self) -> Vec<&'static str> {
        visible_fields(self.flavor(), self.skip_build())
    }

    /// Append a blank repository row and return the refreshed view.
    pub fn add_repo(&mut self) -> ReconciledDefaults {
        let mut rows = self.view().repos(keys::BOOTSTRAP_REPOS).to_vec();
        rows.push(RepoEntryUi::default());
        self.edits
            .insert(keys::BOOTSTRAP_REPOS.to_owned(), FieldValue::Repos(rows));
        self.view()
    }

    /// Fold `edits` into the screen state and return the fresh
    /// current-defaults view for redraw.
    pub fn reconcile(&mut self, edits: &Edits) -> ReconciledDefaults {
        for (key, value) in edits {
            self.edits.insert(key.clone(), value.clone());
        }
        self.view()
    }

    /// The values this screen would submit, restricted to the fields
    /// currently visible. Repositories convert to storage shape here,
    /// dropping blank sentinel rows.
    pub fn responses(&self) -> Responses {
        let view = self.view();
        let flavor = Flavor::from_setting(view.text(keys::BOOTSTRAP_FLAVOR));
        let skip_build = view.flag(keys::BOOTSTRAP_SKIP_BUILD);

        let mut responses = Responses::new();
        for key in visible_fields(flavor, skip_build) {
            let value = match key {
                keys::BOOTSTRAP_FLAVOR => ResponseValue::Text(flavor.to_string()),
                _ => view
                    .get(key)
                    .cloned()
                    .map(ResponseValue::from)
                    .unwrap_or_else(|| ResponseValue::text("")),
            };
            responses.insert(key.to_owned(), value);
        }
        responses
    }

    /// Run the bootstrap-image checks over the current view plus `edits`.
    pub fn check(&mut self, edits: &Edits, feedback: &mut dyn Feedback) -> ValidationResult {
        feedback.status("Checking data...");
        self.reconcile(edits);

        let result = check_bootstrap(self.responses(), self.url_probe.as_ref());
        match &result {
            ValidationResult::Rejected(errors) => feedback.notice("Check failed", &errors.join("\n")),
            ValidationResult::Accepted(_) => feedback.status("No errors found."),
        }
        result
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
        let mut newsettings = self.oldsettings.clone();
        for (key, value) in responses {
            newsettings.set(key, value.to_setting());
        }

        self.store
            .write(&newsettings)
            .map_err(|source| CoreError::SettingsWrite {
                screen: SCREEN_NAME.to_owned(),
                source,
            })?;

        self.oldsettings = newsettings;
        for (key, value) in responses {
            self.edits.insert(key.clone(), value.to_field_value());
        }
        info!("bootstrap image settings saved");
        Ok(())
    }

    fn view(&self) -> ReconciledDefaults {
        reconcile(&Self::descriptors(), &self.oldsettings, &self.edits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::feedback::SilentFeedback;
    use crate::probe::{ProbeError, Proxies};

    struct Reachable;
    impl UrlProbe for Reachable {
        fn is_reachable(&self, _url: &str, _proxies: &Proxies) -> Result<bool, ProbeError> {
            Ok(true)
        }
    }

    struct Unreachable;
    impl UrlProbe for Unreachable {
        fn is_reachable(&self, _url: &str, _proxies: &Proxies) -> Result<bool, ProbeError> {
            Ok(false)
        }
    }

    fn screen_with(
        dir: &tempfile::TempDir,
        seed: Option<&str>,
        probe: Box<dyn UrlProbe>,
    ) -> BootstrapImage {
        let settings = dir.path().join("settings.yaml");
        if let Some(yaml) = seed {
            std::fs::write(&settings, yaml).expect("seed settings");
        }
        let store = SettingsStore::new(dir.path().join("defaults.yaml"), settings);
        BootstrapImage::new(probe, store).expect("screen")
    }

    fn repo_edit(name: &str, line: &str) -> Edits {
        let mut edits = Edits::new();
        edits.insert(
            keys::BOOTSTRAP_REPOS.to_owned(),
            FieldValue::Repos(vec![RepoEntryUi {
                name: name.into(),
                uri: line.into(),
                priority: String::new(),
            }]),
        );
        edits
    }

    #[test]
    fn persisted_repos_load_in_ui_shape() {
        let dir = tempfile::tempdir().expect("tempdir");
        let seed = "BOOTSTRAP:\n  flavor: ubuntu\n  repos:\n    - name: main\n      \
                    type: deb\n      uri: http://example.com/ubuntu\n      suite: trusty\n      \
                    section: main\n";
        let mut screen = screen_with(&dir, Some(seed), Box::new(Reachable));

        let view = screen.reconcile(&Edits::new());
        let rows = view.repos(keys::BOOTSTRAP_REPOS);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].uri, "deb http://example.com/ubuntu trusty main");
    }

    #[test]
    fn check_accepts_parsed_reachable_repo() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut screen = screen_with(&dir, None, Box::new(Reachable));

        let result = screen.check(
            &repo_edit("main", "deb http://example.com/ubuntu trusty main"),
            &mut SilentFeedback,
        );
        let ValidationResult::Accepted(responses) = result else {
            panic!("expected acceptance");
        };
        let repos = responses
            .get(keys::BOOTSTRAP_REPOS)
            .and_then(ResponseValue::as_repos)
            .expect("repos");
        assert_eq!(repos[0].repo_type, "deb");
        assert_eq!(repos[0].suite, "trusty");
    }

    #[test]
    fn check_rejects_unreachable_repo() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut screen = screen_with(&dir, None, Box::new(Unreachable));

        let result = screen.check(
            &repo_edit("main", "deb http://example.com/ubuntu trusty main"),
            &mut SilentFeedback,
        );
        assert_eq!(result.errors(), ["URL for repository main is not accessible."]);
    }

    #[test]
    fn centos_flavor_collapses_to_common_fields_and_accepts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut screen = screen_with(&dir, None, Box::new(Unreachable));

        let mut edits = Edits::new();
        edits.insert(keys::BOOTSTRAP_FLAVOR.to_owned(), FieldValue::text("centos"));
        screen.reconcile(&edits);

        assert_eq!(screen.visible_fields(), vec![keys::BOOTSTRAP_FLAVOR]);
        // No repository fields are submitted, so nothing can fail.
        let result = screen.check(&Edits::new(), &mut SilentFeedback);
        assert!(result.is_accepted());
    }

    #[test]
    fn hidden_repo_rows_survive_flavor_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut screen = screen_with(&dir, None, Box::new(Reachable));
        screen.reconcile(&repo_edit("main", "deb http://example.com/ubuntu trusty main"));

        // Hide the repository fields, then bring them back.
        let mut edits = Edits::new();
        edits.insert(keys::BOOTSTRAP_FLAVOR.to_owned(), FieldValue::text("centos"));
        screen.reconcile(&edits);
        assert_eq!(screen.visible_fields(), vec![keys::BOOTSTRAP_FLAVOR]);

        let mut edits = Edits::new();
        edits.insert(keys::BOOTSTRAP_FLAVOR.to_owned(), FieldValue::text("ubuntu"));
        let view = screen.reconcile(&edits);
        assert_eq!(view.repos(keys::BOOTSTRAP_REPOS).len(), 1);
    }

    #[test]
    fn add_repo_appends_blank_row_that_storage_drops() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut screen = screen_with(&dir, None, Box::new(Reachable));
        screen.reconcile(&repo_edit("main", "deb http://example.com/ubuntu trusty main"));

        let view = screen.add_repo();
        assert_eq!(view.repos(keys::BOOTSTRAP_REPOS).len(), 2);

        // The blank row is a sentinel; it never reaches storage shape.
        let responses = screen.responses();
        let repos = responses
            .get(keys::BOOTSTRAP_REPOS)
            .and_then(ResponseValue::as_repos)
            .expect("repos");
        assert_eq!(repos.len(), 1);
    }

    #[test]
    fn apply_persists_storage_shape_and_updates_oldsettings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut screen = screen_with(
            &dir,
            Some("ADMIN_NETWORK:\n  interface: eth0\n"),
            Box::new(Reachable),
        );

        let applied = screen
            .apply(
                &repo_edit("main", "deb http://example.com/ubuntu trusty main"),
                &mut SilentFeedback,
            )
            .expect("apply");
        assert!(applied);

        let store = SettingsStore::new(dir.path().join("defaults.yaml"), dir.path().join("settings.yaml"));
        let saved = store.load().expect("reload");
        assert_eq!(saved.get_str(keys::BOOTSTRAP_FLAVOR), Some("ubuntu"));
        let repos = saved
            .get(keys::BOOTSTRAP_REPOS)
            .and_then(bootforge_settings::Value::as_sequence)
            .expect("repos sequence");
        assert_eq!(repos.len(), 1);
        assert_eq!(
            repos[0].get("uri").and_then(bootforge_settings::Value::as_str),
            Some("http://example.com/ubuntu")
        );
        // The other screen's section rides along untouched.
        assert_eq!(saved.get_str("ADMIN_NETWORK/interface"), Some("eth0"));
        // In-memory oldsettings reflects the save.
        assert_eq!(screen.settings().get_str(keys::BOOTSTRAP_FLAVOR), Some("ubuntu"));
    }
}
