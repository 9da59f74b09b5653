use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Maximum length for content identifiers
const MAX_ID_LENGTH: usize = 64;

/// A validated event identifier (e.g., "harvest_festival", "dragon_attack")
///
/// Event ids are authored by content, not generated, so they are readable
/// slugs rather than UUIDs.
///
/// Validation rules:
/// - Non-empty after trimming
/// - Maximum 64 characters
/// - Lowercase ASCII alphanumerics, `_` and `-` only
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventId(String);

impl EventId {
    /// Create a new validated event identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidId` if the identifier is empty, too long, or
    /// contains characters other than lowercase alphanumerics, `_` or `-`.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();

        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("Event ID cannot be empty"));
        }
        if trimmed.len() > MAX_ID_LENGTH {
            return Err(DomainError::invalid_id(format!(
                "Event ID cannot exceed {} characters",
                MAX_ID_LENGTH
            )));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return Err(DomainError::invalid_id(format!(
                "Event ID '{}' must contain only lowercase alphanumerics, '_' or '-'",
                trimmed
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for EventId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EventId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for EventId {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<EventId> for String {
    fn from(id: EventId) -> String {
        id.0
    }
}
