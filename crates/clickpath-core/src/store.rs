use crate::error::CoreError;
use crate::filter::{select, SessionFilter};
use crate::session::{normalize_links, RawRow, Session};

/// Immutable, load-once collection of normalized sessions.
///
/// Rows keep their input order. Raw link columns are discarded once the
/// path has been built.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Vec<Session>,
}

impl SessionStore {
    /// Normalize every row into a session.
    ///
    /// Fails on the first row missing `source` or `device`. A blank value
    /// counts as missing: defaulting it would put sessions into a bogus group.
    pub fn from_rows<I>(rows: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut sessions = Vec::new();
        for (row_idx, row) in rows.into_iter().enumerate() {
            let source = required(row.source, row_idx, "source")?;
            let device = required(row.device, row_idx, "device")?;
            let path = normalize_links(row.links);
            sessions.push(Session::new(source, device, path));
        }
        tracing::debug!(sessions = sessions.len(), "Session store built");
        Ok(Self { sessions })
    }

    pub fn from_sessions(sessions: Vec<Session>) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn select(&self, filter: &SessionFilter) -> Vec<&Session> {
        select(&self.sessions, filter)
    }

    /// Distinct sources in first-seen order.
    pub fn sources(&self) -> Vec<&str> {
        distinct(self.sessions.iter().map(Session::source))
    }

    /// Distinct devices in first-seen order.
    pub fn devices(&self) -> Vec<&str> {
        distinct(self.sessions.iter().map(Session::device))
    }
}

fn required(value: Option<String>, row: usize, field: &'static str) -> Result<String, CoreError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CoreError::MalformedInput { row, field }),
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = std::collections::HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}
