//! Session-level and cohort-level path metrics.
//!
//! Every function takes an already-filtered slice of sessions (owned or
//! borrowed) and is total: an empty group yields `0.0` for rates and
//! averages instead of `NaN`.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::session::Session;
use crate::tally::Tally;

/// Default identifier marking a completed purchase.
pub const DEFAULT_SUCCESS_EVENT: &str = "purchase_success";

/// Grouping dimension for per-group metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Source,
    Device,
    SourceDevice,
}

impl GroupBy {
    pub fn key(self, session: &Session) -> GroupKey {
        let source = || Some(session.source().to_string());
        let device = || Some(session.device().to_string());
        match self {
            GroupBy::Source => GroupKey {
                source: source(),
                device: None,
            },
            GroupBy::Device => GroupKey {
                source: None,
                device: device(),
            },
            GroupBy::SourceDevice => GroupKey {
                source: source(),
                device: device(),
            },
        }
    }
}

/// Value of the grouping dimension(s) a result row belongs to. Only the
/// dimensions named by the [`GroupBy`] are populated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl GroupKey {
    pub fn source(source: &str) -> Self {
        Self {
            source: Some(source.to_string()),
            device: None,
        }
    }

    pub fn device(device: &str) -> Self {
        Self {
            source: None,
            device: Some(device.to_string()),
        }
    }

    pub fn pair(source: &str, device: &str) -> Self {
        Self {
            source: Some(source.to_string()),
            device: Some(device.to_string()),
        }
    }
}

/// Modal exit page(s) of the sessions in one group that did not end on the
/// success event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropOff {
    /// Every final page sharing the highest count, in first-seen order.
    pub pages: Vec<String>,
    /// How many sessions ended on each of `pages`.
    pub sessions: usize,
    /// Non-empty sessions in the group whose final page is not the success
    /// event. A session that converted mid-path and then moved on counts.
    pub candidates: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathLengthStats {
    pub sessions: usize,
    pub empty_paths: usize,
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

/// `part / whole * 100`, with an empty whole defined as `0.0`.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Iterate a slice of owned or borrowed sessions as `&Session`.
pub(crate) fn each<S: Borrow<Session>>(sessions: &[S]) -> impl Iterator<Item = &Session> {
    sessions.iter().map(<S as Borrow<Session>>::borrow)
}

fn mean(sum: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    sum as f64 / count as f64
}

/// Share of sessions that viewed at most one page.
pub fn bounce_rate<S: Borrow<Session>>(sessions: &[S]) -> f64 {
    let bounced = each(sessions).filter(|s| s.is_bounce()).count();
    percentage(bounced, sessions.len())
}

pub fn bounce_rate_by<S: Borrow<Session>>(
    sessions: &[S],
    group_by: GroupBy,
) -> BTreeMap<GroupKey, f64> {
    group_sessions(sessions, group_by)
        .into_iter()
        .map(|(key, group)| (key, bounce_rate(&group)))
        .collect()
}

/// Share of sessions whose path contains `success_event` anywhere.
pub fn conversion_rate<S: Borrow<Session>>(sessions: &[S], success_event: &str) -> f64 {
    let converted = each(sessions)
        .filter(|s| s.converted(success_event))
        .count();
    percentage(converted, sessions.len())
}

pub fn conversion_rate_by<S: Borrow<Session>>(
    sessions: &[S],
    group_by: GroupBy,
    success_event: &str,
) -> BTreeMap<GroupKey, f64> {
    group_sessions(sessions, group_by)
        .into_iter()
        .map(|(key, group)| (key, conversion_rate(&group, success_event)))
        .collect()
}

/// Conversion rate among sessions whose final page is one of `pages`.
/// An empty `pages` slice applies no restriction.
pub fn conversion_rate_by_last_page<S: Borrow<Session>>(
    sessions: &[S],
    pages: &[&str],
    success_event: &str,
) -> f64 {
    if pages.is_empty() {
        return conversion_rate(sessions, success_event);
    }
    let ending: Vec<&Session> = each(sessions)
        .filter(|s| s.path().last().is_some_and(|last| pages.contains(&last)))
        .collect();
    conversion_rate(&ending, success_event)
}

/// Mean path length over the group.
pub fn average_links_visited<S: Borrow<Session>>(sessions: &[S]) -> f64 {
    let total: usize = each(sessions).map(Session::path_length).sum();
    mean(total, sessions.len())
}

/// Mean full path length over the sessions that converted.
pub fn average_links_to_success<S: Borrow<Session>>(
    sessions: &[S],
    success_event: &str,
) -> f64 {
    let converted: Vec<&Session> = each(sessions)
        .filter(|s| s.converted(success_event))
        .collect();
    average_links_visited(&converted)
}

/// Mean number of steps up to and including the first `success_event`,
/// over the sessions that converted.
pub fn average_steps_to_success<S: Borrow<Session>>(
    sessions: &[S],
    success_event: &str,
) -> f64 {
    let steps: Vec<usize> = each(sessions)
        .filter_map(|s| s.path_to_success(success_event))
        .map(<[String]>::len)
        .collect();
    mean(steps.iter().sum(), steps.len())
}

/// Modal final page per group among sessions that did not end on
/// `success_event`. Groups where no session qualifies are omitted.
pub fn drop_off_pages<S: Borrow<Session>>(
    sessions: &[S],
    group_by: GroupBy,
    success_event: &str,
) -> BTreeMap<GroupKey, DropOff> {
    let mut exits: BTreeMap<GroupKey, Tally<&str>> = BTreeMap::new();
    for session in each(sessions) {
        let Some(last) = session.path().last() else {
            continue;
        };
        if last == success_event {
            continue;
        }
        exits.entry(group_by.key(session)).or_default().add(last);
    }

    exits
        .into_iter()
        .map(|(key, tally)| {
            let candidates = tally.total();
            let modes = tally.into_modes();
            let count = modes.first().map_or(0, |(_, n)| *n);
            let drop_off = DropOff {
                pages: modes.into_iter().map(|(page, _)| page.to_string()).collect(),
                sessions: count,
                candidates,
            };
            (key, drop_off)
        })
        .collect()
}

/// Session counts per group, most frequent first with ties in first-seen
/// order.
pub fn distribution<S: Borrow<Session>>(
    sessions: &[S],
    group_by: GroupBy,
) -> Vec<(GroupKey, usize)> {
    each(sessions)
        .map(|s| group_by.key(s))
        .collect::<Tally<GroupKey>>()
        .into_ranked()
}

pub fn path_length_stats<S: Borrow<Session>>(sessions: &[S]) -> PathLengthStats {
    let lengths = || each(sessions).map(Session::path_length);
    PathLengthStats {
        sessions: sessions.len(),
        empty_paths: lengths().filter(|&n| n == 0).count(),
        min: lengths().min().unwrap_or(0),
        max: lengths().max().unwrap_or(0),
        mean: mean(lengths().sum(), sessions.len()),
    }
}

/// Split sessions by group key, preserving input order inside each group.
pub fn group_sessions<S: Borrow<Session>>(
    sessions: &[S],
    group_by: GroupBy,
) -> BTreeMap<GroupKey, Vec<&Session>> {
    let mut groups: BTreeMap<GroupKey, Vec<&Session>> = BTreeMap::new();
    for session in each(sessions) {
        groups.entry(group_by.key(session)).or_default().push(session);
    }
    groups
}
