//! Source/device selection over a session collection.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::CoreError;
use crate::session::Session;

/// Immutable membership predicate over the two categorical dimensions.
///
/// `None` on a dimension means unrestricted. A `Some` set is never empty;
/// [`SessionFilter::new`] rejects that case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionFilter {
    sources: Option<BTreeSet<String>>,
    devices: Option<BTreeSet<String>>,
}

impl SessionFilter {
    pub fn new<S, D>(sources: Option<S>, devices: Option<D>) -> Result<Self, CoreError>
    where
        S: IntoIterator,
        S::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Ok(Self {
            sources: constraint(sources, "sources")?,
            devices: constraint(devices, "devices")?,
        })
    }

    /// No restriction on either dimension.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn source(source: impl Into<String>) -> Self {
        Self {
            sources: Some(BTreeSet::from([source.into()])),
            devices: None,
        }
    }

    pub fn device(device: impl Into<String>) -> Self {
        Self {
            sources: None,
            devices: Some(BTreeSet::from([device.into()])),
        }
    }

    pub fn sources(&self) -> Option<&BTreeSet<String>> {
        self.sources.as_ref()
    }

    pub fn devices(&self) -> Option<&BTreeSet<String>> {
        self.devices.as_ref()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.sources.is_none() && self.devices.is_none()
    }

    pub fn matches(&self, session: &Session) -> bool {
        accepts(self.sources.as_ref(), session.source())
            && accepts(self.devices.as_ref(), session.device())
    }
}

fn constraint<I>(
    values: Option<I>,
    dimension: &'static str,
) -> Result<Option<BTreeSet<String>>, CoreError>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    match values {
        None => Ok(None),
        Some(values) => {
            let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
            if set.is_empty() {
                return Err(CoreError::InvalidFilter { dimension });
            }
            Ok(Some(set))
        }
    }
}

fn accepts(set: Option<&BTreeSet<String>>, value: &str) -> bool {
    set.map_or(true, |set| set.contains(value))
}

/// Borrow the sessions matching `filter`, preserving input order.
pub fn select<'a>(sessions: &'a [Session], filter: &SessionFilter) -> Vec<&'a Session> {
    sessions.iter().filter(|s| filter.matches(s)).collect()
}
