//! Stop identifier value object
//!
//! Operator-assigned stop codes are opaque. Configuration files tend to carry
//! them as bare integers (`16010480`), so both integers and strings are
//! accepted and normalized to their text form.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A validated transit stop identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawStopId", into = "String")]
pub struct StopId(String);

impl StopId {
    /// Create a new stop identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty after trimming.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("stop id must not be empty"));
        }
        if trimmed.contains('/') {
            return Err(DomainError::validation(format!(
                "stop id must not contain '/': {trimmed}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<StopId> for String {
    fn from(id: StopId) -> Self {
        id.0
    }
}

impl TryFrom<&str> for StopId {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStopId {
    Number(u64),
    Text(String),
}

impl TryFrom<RawStopId> for StopId {
    type Error = DomainError;

    fn try_from(raw: RawStopId) -> Result<Self, Self::Error> {
        match raw {
            RawStopId::Number(n) => Self::new(n.to_string()),
            RawStopId::Text(s) => Self::new(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_whitespace() {
        let id = StopId::new("  16010480 ").unwrap();
        assert_eq!(id.as_str(), "16010480");
    }

    #[test]
    fn empty_id_is_rejected() {
        assert!(StopId::new("").is_err());
        assert!(StopId::new("   ").is_err());
    }

    #[test]
    fn slash_is_rejected() {
        assert!(StopId::new("160/10480").is_err());
    }

    #[test]
    fn deserializes_from_integer_and_string() {
        let from_int: StopId = serde_json::from_str("16010480").unwrap();
        let from_str: StopId = serde_json::from_str("\"16010480\"").unwrap();
        assert_eq!(from_int, from_str);
    }

    #[test]
    fn deserializing_empty_string_fails() {
        assert!(serde_json::from_str::<StopId>("\"\"").is_err());
    }

    #[test]
    fn serializes_as_string() {
        let id = StopId::new("16010480").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"16010480\"");
    }
}
