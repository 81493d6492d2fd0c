//! Persisted settings for the bootforge setup screens.
//!
//! The settings file is a nested YAML mapping keyed by top-level section
//! (e.g. `ADMIN_NETWORK`) and then by leaf name. This crate owns the
//! load/merge/replace contract: a defaults document layered under the
//! operator's document on load, `SECTION/leaf` path access, and atomic
//! whole-file replacement on save. The shapes stored inside the document
//! are defined by `bootforge-core`; this crate treats values as opaque.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub use serde_yaml::{Mapping, Value};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ── Settings document ───────────────────────────────────────────────

/// A loaded settings document: a nested YAML mapping with `SECTION/leaf`
/// path access.
///
/// The document is a plain value: clone it, mutate the copy, and hand
/// the copy to [`SettingsStore::write`]. Nothing here touches disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDoc(Mapping);

impl SettingsDoc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mapping(mapping: Mapping) -> Self {
        Self(mapping)
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    /// Look up a value by `SECTION/leaf` path. A path without `/` reads a
    /// top-level entry.
    pub fn get(&self, path: &str) -> Option<&Value> {
        match path.split_once('/') {
            Some((section, leaf)) => self
                .section(section)?
                .get(Value::String(leaf.to_owned())),
            None => self.0.get(Value::String(path.to_owned())),
        }
    }

    /// Convenience: look up a path and coerce it to a string slice.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Insert a value at a `SECTION/leaf` path, creating the section
    /// mapping if needed. A non-mapping value already stored under the
    /// section name is replaced.
    pub fn set(&mut self, path: &str, value: Value) {
        match path.split_once('/') {
            Some((section, leaf)) => {
                let key = Value::String(section.to_owned());
                let entry = self.0.entry(key).or_insert(Value::Mapping(Mapping::new()));
                if !entry.is_mapping() {
                    *entry = Value::Mapping(Mapping::new());
                }
                if let Value::Mapping(map) = entry {
                    map.insert(Value::String(leaf.to_owned()), value);
                }
            }
            None => {
                self.0.insert(Value::String(path.to_owned()), value);
            }
        }
    }

    /// Borrow a top-level section mapping, if present and a mapping.
    pub fn section(&self, name: &str) -> Option<&Mapping> {
        self.0
            .get(Value::String(name.to_owned()))
            .and_then(Value::as_mapping)
    }

    /// Layer `other` over this document. Nested mappings merge key by
    /// key; every other value type replaces wholesale.
    pub fn merge_from(&mut self, other: SettingsDoc) {
        merge_mapping(&mut self.0, other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn merge_mapping(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Mapping(existing)), Value::Mapping(incoming)) => {
                merge_mapping(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

// ── Store ───────────────────────────────────────────────────────────

/// On-disk home of the settings: a read-only defaults file layered under
/// the operator's settings file.
///
/// Writes go to the settings file only, via a sibling temp file renamed
/// into place, so readers never observe a partial document.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    defaults_path: PathBuf,
    settings_path: PathBuf,
}

impl SettingsStore {
    pub fn new(defaults_path: impl Into<PathBuf>, settings_path: impl Into<PathBuf>) -> Self {
        Self {
            defaults_path: defaults_path.into(),
            settings_path: settings_path.into(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load the merged view: defaults first, operator settings layered on
    /// top. A missing file contributes an empty document.
    pub fn load(&self) -> Result<SettingsDoc, SettingsError> {
        let mut doc = read_document(&self.defaults_path)?;
        doc.merge_from(read_document(&self.settings_path)?);
        Ok(doc)
    }

    /// Replace the settings file with `doc`, atomically.
    pub fn write(&self, doc: &SettingsDoc) -> Result<(), SettingsError> {
        let rendered = serde_yaml::to_string(doc.as_mapping())?;

        let tmp_name = match self.settings_path.file_name() {
            Some(name) => {
                let mut n = name.to_os_string();
                n.push(".new");
                n
            }
            None => ".settings.new".into(),
        };
        let tmp_path = self.settings_path.with_file_name(tmp_name);

        fs::write(&tmp_path, rendered).map_err(|source| SettingsError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.settings_path).map_err(|source| SettingsError::Write {
            path: self.settings_path.clone(),
            source,
        })?;

        debug!(path = %self.settings_path.display(), "settings written");
        Ok(())
    }
}

fn read_document(path: &Path) -> Result<SettingsDoc, SettingsError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "settings file missing; starting empty");
            return Ok(SettingsDoc::new());
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if raw.trim().is_empty() {
        return Ok(SettingsDoc::new());
    }

    let mapping: Mapping = serde_yaml::from_str(&raw).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SettingsDoc::from_mapping(mapping))
}

// ── Tests ───────────────────────────────────────────────────────────
