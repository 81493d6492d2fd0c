// ── Screen field descriptors ──
//
// A descriptor is the static identity of one field a screen can render:
// key, label, widget kind, default. The *current* value is layered on
// top at reconciliation time and never stored back into the descriptor.

use super::repo::RepoEntryUi;

/// What kind of widget a field renders as. Rendering itself is external;
/// the kind decides which value variant the field carries and how a
/// persisted value is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Label,
    TextField,
    Checkbox,
    Radio,
    List,
    Button,
}

/// A value layered on a descriptor at reconciliation time.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    /// List-of-record fields hold their rows in UI shape.
    Repos(Vec<RepoEntryUi>),
}

impl FieldValue {
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

    pub fn as_repos(&self) -> Option<&[RepoEntryUi]> {
        match self {
            Self::Repos(r) => Some(r),
            _ => None,
        }
    }
}

/// One column of a list-of-record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubField {
    pub key: &'static str,
    pub label: &'static str,
    pub tooltip: &'static str,
}

/// Static description of one field a screen can render.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub tooltip: &'static str,
    pub widget: WidgetKind,
    pub default: FieldValue,
    /// Choices for radio groups; empty otherwise.
    pub choices: &'static [&'static str],
    /// Column scheme for list-of-record fields; empty otherwise.
    pub value_scheme: &'static [SubField],
}

impl FieldDescriptor {
    pub fn text(key: &'static str, label: &'static str, tooltip: &'static str, default: &str) -> Self {
        Self {
            key,
            label,
            tooltip,
            widget: WidgetKind::TextField,
            default: FieldValue::Text(default.to_owned()),
            choices: &[],
            value_scheme: &[],
        }
    }

    pub fn label(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            tooltip: "",
            widget: WidgetKind::Label,
            default: FieldValue::Text(String::new()),
            choices: &[],
            value_scheme: &[],
        }
    }

    pub fn checkbox(key: &'static str, label: &'static str, default: bool) -> Self {
        Self {
            key,
            label,
            tooltip: "",
            widget: WidgetKind::Checkbox,
            default: FieldValue::Flag(default),
            choices: &[],
            value_scheme: &[],
        }
    }

    pub fn radio(
        key: &'static str,
        label: &'static str,
        choices: &'static [&'static str],
        default: &str,
    ) -> Self {
        Self {
            key,
            label,
            tooltip: "",
            widget: WidgetKind::Radio,
            default: FieldValue::Text(default.to_owned()),
            choices,
            value_scheme: &[],
        }
    }

    pub fn list(key: &'static str, label: &'static str, value_scheme: &'static [SubField]) -> Self {
        Self {
            key,
            label,
            tooltip: "",
            widget: WidgetKind::List,
            default: FieldValue::Repos(Vec::new()),
            choices: &[],
            value_scheme,
        }
    }
}
