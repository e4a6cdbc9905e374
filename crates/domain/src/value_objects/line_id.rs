//! Line identifier value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// A line identifier exactly as the departure API sent it
///
/// The API is inconsistent about whether lines are strings (`"3"`, `"FB73"`)
/// or numbers (`3`). The original JSON type is kept so diagnostic attributes
/// round-trip unchanged; comparisons go through [`LineId::label`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineId {
    /// Numeric line identifier
    Number(serde_json::Number),
    /// Textual line identifier
    Text(String),
}

impl LineId {
    /// Text form of the line, used for filtering and display
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<&str> for LineId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<u64> for LineId {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}
