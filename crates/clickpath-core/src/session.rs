//! Session data model and the positional-link normalizer.

use serde::{Deserialize, Serialize};

/// Number of positional link columns in one input row.
pub const LINK_COLUMNS: usize = 16;

/// One input row as handed over by a loader, before normalization.
///
/// `source` and `device` are optional here so that a loader can pass a blank
/// field through and let the store reject it; link columns are sparse by nature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub source: Option<String>,
    pub device: Option<String>,
    pub links: [Option<String>; LINK_COLUMNS],
}

impl RawRow {
    /// Build a row from a slice of present links, padding the remaining
    /// columns with absent values. Extra links beyond the column count are
    /// ignored.
    pub fn new(source: &str, device: &str, links: &[&str]) -> Self {
        let mut row = Self {
            source: Some(source.to_string()),
            device: Some(device.to_string()),
            links: Default::default(),
        };
        for (slot, link) in row.links.iter_mut().zip(links) {
            *slot = Some((*link).to_string());
        }
        row
    }
}

/// The ordered, gap-free sequence of pages and events visited in a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitPath(Vec<String>);

impl VisitPath {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn contains(&self, event: &str) -> bool {
        self.0.iter().any(|step| step == event)
    }

    /// Index of the first occurrence of `event`, if any.
    pub fn position(&self, event: &str) -> Option<usize> {
        self.0.iter().position(|step| step == event)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for VisitPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Collapse positional link fields into a visit path.
///
/// Present values keep their left-to-right order; absent values are dropped
/// rather than replaced. Nothing is reordered or deduplicated.
pub fn normalize_links<I>(links: I) -> VisitPath
where
    I: IntoIterator<Item = Option<String>>,
{
    VisitPath(links.into_iter().flatten().collect())
}

/// One visitor's recorded visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    source: String,
    device: String,
    path: VisitPath,
}

impl Session {
    pub fn new(source: impl Into<String>, device: impl Into<String>, path: VisitPath) -> Self {
        Self {
            source: source.into(),
            device: device.into(),
            path,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn path(&self) -> &VisitPath {
        &self.path
    }

    pub fn path_length(&self) -> usize {
        self.path.len()
    }

    /// A session that never navigated past its first page.
    pub fn is_bounce(&self) -> bool {
        self.path.len() <= 1
    }

    pub fn converted(&self, success_event: &str) -> bool {
        self.path.contains(success_event)
    }

    /// Path prefix up to and including the first `success_event`, or `None`
    /// when the session never converted.
    pub fn path_to_success(&self, success_event: &str) -> Option<&[String]> {
        self.path
            .position(success_event)
            .map(|idx| &self.path.as_slice()[..=idx])
    }
}
