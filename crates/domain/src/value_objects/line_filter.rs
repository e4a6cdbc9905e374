//! Line filter value object
//!
//! An allow-list of line labels. Configuration accepts a list
//! (`["3", "9"]`), a comma-separated string (`"3, 9"`), or a single line
//! number (`9`).

use serde::{Deserialize, Serialize};

use super::LineId;

/// Allow-list of line labels used to pick the summary departure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLineFilter", into = "Vec<String>")]
pub struct LineFilter {
    lines: Vec<String>,
}

impl LineFilter {
    /// Create a filter from line labels
    ///
    /// Labels are trimmed; empty labels and duplicates are dropped while
    /// preserving first-seen order.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for line in lines {
            let line = line.as_ref().trim();
            if !line.is_empty() && !normalized.iter().any(|l| l == line) {
                normalized.push(line.to_string());
            }
        }
        Self { lines: normalized }
    }

    /// Parse a comma-separated list of line labels
    #[must_use]
    pub fn from_csv(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    /// Whether the given line is allowed by this filter
    #[must_use]
    pub fn matches(&self, line: &LineId) -> bool {
        let label = line.label();
        self.lines.iter().any(|l| *l == label)
    }

    /// Whether the filter holds no labels
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of labels in the filter
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The normalized labels in configuration order
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl From<LineFilter> for Vec<String> {
    fn from(filter: LineFilter) -> Self {
        filter.lines
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLineFilter {
    Csv(String),
    Single(u64),
    List(Vec<RawLine>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLine {
    Number(u64),
    Text(String),
}

impl From<RawLineFilter> for LineFilter {
    fn from(raw: RawLineFilter) -> Self {
        match raw {
            RawLineFilter::Csv(csv) => Self::from_csv(&csv),
            RawLineFilter::Single(n) => Self::new([n.to_string()]),
            RawLineFilter::List(items) => Self::new(items.into_iter().map(|item| match item {
                RawLine::Number(n) => n.to_string(),
                RawLine::Text(s) => s,
            })),
        }
    }
}
