// ── Repository entries: UI shape vs storage shape ──
//
// The list editor shows three fields per repository: a name, a single
// apt-style line ("deb uri distribution [component...]"), and a
// priority. The settings file stores the same record with the line
// split into typed parts. The codec below converts between the two;
// both directions are total.

use serde::{Deserialize, Serialize};

/// Editable shape: one row of the repository list widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoEntryUi {
    pub name: String,
    /// Single-line encoding: `type uri suite [section...]`.
    pub uri: String,
    pub priority: String,
}

impl RepoEntryUi {
    /// A row the operator added but never filled in.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.uri.is_empty() && self.priority.is_empty()
    }
}

/// Canonical persisted shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoEntryStorage {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub repo_type: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub suite: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl RepoEntryStorage {
    /// A valid entry carries type, uri, and suite; section is optional.
    pub fn is_well_formed(&self) -> bool {
        !self.repo_type.is_empty() && !self.uri.is_empty() && !self.suite.is_empty()
    }
}

// ── Single-line parser ──────────────────────────────────────────────

/// Structured result of parsing one apt-style line.
///
/// `matched` distinguishes "the line was empty" from "the line did not
/// fit the pattern" -- downstream code never has to guess from
/// empty-string sentinels. When the pattern does not match, `uri` holds
/// the raw input verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRepoLine {
    pub matched: bool,
    pub repo_type: String,
    pub uri: String,
    pub suite: String,
    /// Remaining tokens joined with single spaces; empty when absent.
    pub section: String,
}

/// Parse a `type uri suite [section...]` line. Total: a line with fewer
/// than three whitespace-delimited tokens yields an unmatched result
/// carrying the input verbatim in `uri`.
pub fn parse_repo_line(line: &str) -> ParsedRepoLine {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(repo_type), Some(uri), Some(suite)) => ParsedRepoLine {
            matched: true,
            repo_type: repo_type.to_owned(),
            uri: uri.to_owned(),
            suite: suite.to_owned(),
            section: tokens.collect::<Vec<_>>().join(" "),
        },
        _ => ParsedRepoLine {
            matched: false,
            uri: line.to_owned(),
            ..ParsedRepoLine::default()
        },
    }
}

// ── Codec ───────────────────────────────────────────────────────────

/// UI row to storage record. Empty priority normalizes to absent.
pub fn to_storage(entry: &RepoEntryUi) -> RepoEntryStorage {
    let parsed = parse_repo_line(&entry.uri);
    RepoEntryStorage {
        name: entry.name.clone(),
        repo_type: parsed.repo_type,
        uri: parsed.uri,
        suite: parsed.suite,
        section: (!parsed.section.is_empty()).then_some(parsed.section),
        priority: (!entry.priority.is_empty()).then(|| entry.priority.clone()),
    }
}

/// Storage record to UI row. The single line is rebuilt as
/// `"type uri suite"` plus `" section"` when present; a record whose
/// components are all empty yields an empty line, never bare spaces.
pub fn to_ui(entry: &RepoEntryStorage) -> RepoEntryUi {
    let section = entry.section.as_deref().unwrap_or("");
    let uri = if entry.repo_type.is_empty()
        && entry.uri.is_empty()
        && entry.suite.is_empty()
        && section.is_empty()
    {
        String::new()
    } else {
        let mut line = format!("{} {} {}", entry.repo_type, entry.uri, entry.suite);
        if !section.is_empty() {
            line.push(' ');
            line.push_str(section);
        }
        line.trim().to_owned()
    };

    RepoEntryUi {
        name: entry.name.clone(),
        uri,
        priority: entry.priority.clone().unwrap_or_default(),
    }
}

/// Convert an edited list for storage, dropping blank sentinel rows.
pub fn list_to_storage(entries: &[RepoEntryUi]) -> Vec<RepoEntryStorage> {
    entries
        .iter()
        .filter(|e| !e.is_blank())
        .map(to_storage)
        .collect()
}

/// Convert a persisted list for editing.
pub fn list_to_ui(entries: &[RepoEntryStorage]) -> Vec<RepoEntryUi> {
    entries.iter().map(to_ui).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn storage(
        name: &str,
        repo_type: &str,
        uri: &str,
        suite: &str,
        section: Option<&str>,
        priority: Option<&str>,
    ) -> RepoEntryStorage {
        RepoEntryStorage {
            name: name.into(),
            repo_type: repo_type.into(),
            uri: uri.into(),
            suite: suite.into(),
            section: section.map(Into::into),
            priority: priority.map(Into::into),
        }
    }

    #[test]
    fn parse_full_line() {
        let parsed = parse_repo_line("deb http://archive.ubuntu.com/ubuntu trusty main universe");
        assert!(parsed.matched);
        assert_eq!(parsed.repo_type, "deb");
        assert_eq!(parsed.uri, "http://archive.ubuntu.com/ubuntu");
        assert_eq!(parsed.suite, "trusty");
        assert_eq!(parsed.section, "main universe");
    }

    #[test]
    fn parse_line_without_section() {
        let parsed = parse_repo_line("deb http://mirror/ubuntu trusty");
        assert!(parsed.matched);
        assert_eq!(parsed.section, "");
    }

    #[test]
    fn parse_short_line_is_unmatched_with_verbatim_uri() {
        let parsed = parse_repo_line("deb http://mirror/ubuntu");
        assert!(!parsed.matched);
        assert_eq!(parsed.repo_type, "");
        assert_eq!(parsed.suite, "");
        assert_eq!(parsed.uri, "deb http://mirror/ubuntu");
    }

    #[test]
    fn parse_empty_line() {
        let parsed = parse_repo_line("");
        assert!(!parsed.matched);
        assert_eq!(parsed.uri, "");
    }

    #[test]
    fn to_storage_splits_line_and_normalizes_priority() {
        let entry = RepoEntryUi {
            name: "main".into(),
            uri: "deb http://example.com/ubuntu trusty main".into(),
            priority: String::new(),
        };
        assert_eq!(
            to_storage(&entry),
            storage(
                "main",
                "deb",
                "http://example.com/ubuntu",
                "trusty",
                Some("main"),
                None,
            )
        );
    }

    #[test]
    fn to_storage_keeps_unparsable_line_verbatim() {
        let entry = RepoEntryUi {
            name: "broken".into(),
            uri: "not-a-repo-line".into(),
            priority: "1001".into(),
        };
        let stored = to_storage(&entry);
        assert!(!stored.is_well_formed());
        assert_eq!(stored.uri, "not-a-repo-line");
        assert_eq!(stored.priority.as_deref(), Some("1001"));
    }

    #[test]
    fn to_ui_rebuilds_line_and_defaults_priority() {
        let ui = to_ui(&storage(
            "updates",
            "deb",
            "http://mirror/ubuntu",
            "trusty-updates",
            Some("main universe"),
            None,
        ));
        assert_eq!(ui.uri, "deb http://mirror/ubuntu trusty-updates main universe");
        assert_eq!(ui.priority, "");
    }

    #[test]
    fn to_ui_of_empty_record_emits_empty_line() {
        let ui = to_ui(&storage("", "", "", "", None, None));
        assert_eq!(ui.uri, "");
    }

    #[test]
    fn to_ui_never_emits_bare_spaces() {
        // Partially-empty records still get a trimmed line.
        let ui = to_ui(&storage("x", "", "http://mirror/ubuntu", "trusty", None, None));
        assert_eq!(ui.uri, "http://mirror/ubuntu trusty");
    }

    #[test]
    fn storage_roundtrip_for_well_formed_entries() {
        let cases = [
            storage("main", "deb", "http://example.com/ubuntu", "trusty", Some("main"), None),
            storage(
                "multi",
                "deb",
                "http://example.com/ubuntu",
                "trusty",
                Some("main universe multiverse"),
                Some("1050"),
            ),
            storage("no-section", "deb", "http://example.com/ubuntu", "trusty", None, None),
        ];
        for entry in cases {
            assert_eq!(to_storage(&to_ui(&entry)), entry);
        }
    }

    #[test]
    fn blank_rows_are_dropped_before_storage() {
        let entries = vec![
            RepoEntryUi::default(),
            RepoEntryUi {
                name: "main".into(),
                uri: "deb http://example.com/ubuntu trusty main".into(),
                priority: String::new(),
            },
            RepoEntryUi::default(),
        ];
        let stored = list_to_storage(&entries);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "main");
    }

    #[test]
    fn storage_shape_serde_field_names() {
        let entry = storage("main", "deb", "http://example.com/ubuntu", "trusty", None, None);
        let yaml = serde_yaml::to_string(&entry).expect("serialize");
        assert!(yaml.contains("type: deb"));
        assert!(!yaml.contains("section"));
        assert!(!yaml.contains("priority"));

        let back: RepoEntryStorage = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(back, entry);
    }
}
