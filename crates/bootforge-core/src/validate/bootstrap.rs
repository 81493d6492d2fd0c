// ── Bootstrap-image screen validator ──
//
// Repository checks only apply when the image flavor is ubuntu and the
// build is not skipped; other flavors carry no repository
// configuration. Per entry: a missing name is reported once and a
// positional placeholder stands in for it in later messages; an entry
// whose line never parsed skips its reachability probe but the rest of
// the list is still checked.

use tracing::{debug, error};

use crate::keys;
use crate::model::{Flavor, RepoEntryStorage};
use crate::probe::{Proxies, UrlProbe};
use crate::validate::{ResponseValue, Responses, ValidationResult, response_text};

/// Run the bootstrap-image checks over `responses`.
pub fn check_bootstrap(responses: Responses, url_probe: &dyn UrlProbe) -> ValidationResult {
    let flavor = Flavor::from_setting(response_text(&responses, keys::BOOTSTRAP_FLAVOR));
    let skip_build = responses
        .get(keys::BOOTSTRAP_SKIP_BUILD)
        .and_then(ResponseValue::as_flag)
        .unwrap_or(false);

    let mut errors = Vec::new();
    if flavor.is_ubuntu() && !skip_build {
        let proxies = Proxies::from_fields(
            response_text(&responses, keys::BOOTSTRAP_HTTP_PROXY),
            response_text(&responses, keys::BOOTSTRAP_HTTPS_PROXY),
        );
        let repos = responses
            .get(keys::BOOTSTRAP_REPOS)
            .and_then(ResponseValue::as_repos)
            .unwrap_or(&[]);
        errors.extend(check_apt_repos(repos, &proxies, url_probe));
    }

    if errors.is_empty() {
        ValidationResult::Accepted(responses)
    } else {
        error!(count = errors.len(), ?errors, "bootstrap check failed");
        ValidationResult::Rejected(errors)
    }
}

/// Ordered per-entry checks for the repository list. Entries arrive in
/// storage shape with blank rows already dropped.
pub fn check_apt_repos(
    repos: &[RepoEntryStorage],
    proxies: &Proxies,
    url_probe: &dyn UrlProbe,
) -> Vec<String> {
    let mut errors = Vec::new();

    if repos.is_empty() {
        errors.push("Specify at least one repository.".to_owned());
    }

    for (index, repo) in repos.iter().enumerate() {
        let name = if repo.name.is_empty() {
            let placeholder = format!("#{}", index + 1);
            errors.push(format!("Empty name for repository {placeholder}."));
            placeholder
        } else {
            repo.name.clone()
        };

        if !repo.is_well_formed() {
            errors.push(format!(
                "Cannot parse repository {name}. Expected format: \
                 'deb uri distribution [component1] [...]'."
            ));
            continue;
        }

        if !release_reachable(&repo.uri, &repo.suite, proxies, url_probe) {
            errors.push(format!("URL for repository {name} is not accessible."));
        }
    }

    errors
}

/// Probe the suite's Release file. Any probe failure counts as
/// unreachable.
fn release_reachable(base_url: &str, suite: &str, proxies: &Proxies, probe: &dyn UrlProbe) -> bool {
    let release_url = format!("{base_url}/dists/{suite}/Release");
    match probe.is_reachable(&release_url, proxies) {
        Ok(reachable) => reachable,
        Err(err) => {
            debug!(url = %release_url, %err, "reachability probe failed");
            false
        }
    }
}
