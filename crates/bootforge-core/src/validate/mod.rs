// ── Validation engine ──
//
// One validator per screen, same shape: take the reconciled responses,
// run the ordered checks, accumulate every problem into one list so the
// operator sees the whole picture in a single pass. Probe failures
// degrade; only duplicate addresses and unreachable repositories block.

pub mod bootstrap;
pub mod network;

use indexmap::IndexMap;

use bootforge_settings::Value;

use crate::model::{FieldValue, RepoEntryStorage, repo};

pub use bootstrap::check_bootstrap;
pub use network::{DHCP_SCAN_TIMEOUT, NetworkCheckContext, NetworkCheckReport, check_network};

/// Values a screen submits for validation, keyed like descriptors.
pub type Responses = IndexMap<String, ResponseValue>;

/// One submitted value. Repositories travel in storage shape here --
/// the codec has already run by the time validation sees them.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    Text(String),
    Flag(bool),
    Repos(Vec<RepoEntryStorage>),
}

impl ResponseValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_repos(&self) -> Option<&[RepoEntryStorage]> {
        match self {
            Self::Repos(r) => Some(r),
            _ => None,
        }
    }

    /// The persisted encoding of this value.
    pub fn to_setting(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Flag(b) => Value::Bool(*b),
            Self::Repos(repos) => serde_yaml::to_value(repos).unwrap_or(Value::Null),
        }
    }

    /// The editable encoding of this value.
    pub fn to_field_value(&self) -> FieldValue {
        match self {
            Self::Text(s) => FieldValue::Text(s.clone()),
            Self::Flag(b) => FieldValue::Flag(*b),
            Self::Repos(repos) => FieldValue::Repos(repo::list_to_ui(repos)),
        }
    }
}

impl From<FieldValue> for ResponseValue {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(s) => Self::Text(s),
            FieldValue::Flag(b) => Self::Flag(b),
            FieldValue::Repos(rows) => Self::Repos(repo::list_to_storage(&rows)),
        }
    }
}

/// Terminal output of one validation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// Every check passed; the mapping is ready to persist.
    Accepted(Responses),
    /// Ordered, operator-facing problems. Nothing was persisted.
    Rejected(Vec<String>),
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn errors(&self) -> &[String] {
        match self {
            Self::Accepted(_) => &[],
            Self::Rejected(errors) => errors,
        }
    }

    fn from_errors(responses: Responses, errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Self::Accepted(responses)
        } else {
            Self::Rejected(errors)
        }
    }
}

/// Read a text response, treating a missing key as empty.
pub(crate) fn response_text<'a>(responses: &'a Responses, key: &str) -> &'a str {
    responses.get(key).and_then(ResponseValue::as_text).unwrap_or("")
}
