use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error type for string identifiers that fail validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdError {
    #[error("{kind} cannot be empty")]
    Empty { kind: &'static str },
}

/// Rejects blank input. Accepted values are stored exactly as given.
fn non_blank(raw: String, kind: &'static str) -> Result<String, IdError> {
    if raw.trim().is_empty() {
        return Err(IdError::Empty { kind });
    }
    Ok(raw)
}

/// Key under which a walkthrough's "seen" flag is persisted.
///
/// The key is used verbatim by the preference store; it is never namespaced.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageKey(String);

impl StorageKey {
    /// Creates a new `StorageKey`
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the key is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        non_blank(value.into(), "storage key").map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of the document element a step points at.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetId(String);

impl TargetId {
    /// Creates a new `TargetId`
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the identifier is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        non_blank(value.into(), "target id").map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a collapsible UI panel.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PanelId(String);

impl PanelId {
    /// Creates a new `PanelId`
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the identifier is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        non_blank(value.into(), "panel id").map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorageKey({})", self.0)
    }
}

impl fmt::Debug for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TargetId({})", self.0)
    }
}

impl fmt::Debug for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PanelId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Conversions ───────────────────────────────────────────────────────────────

impl FromStr for StorageKey {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for TargetId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for PanelId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for StorageKey {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for TargetId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for PanelId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StorageKey> for String {
    fn from(value: StorageKey) -> Self {
        value.0
    }
}

impl From<TargetId> for String {
    fn from(value: TargetId) -> Self {
        value.0
    }
}

impl From<PanelId> for String {
    fn from(value: PanelId) -> Self {
        value.0
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
