//! Composite reports assembled from the metric functions.
//!
//! Each report receives its filter explicitly; nothing here keeps a
//! "current" selection between calls.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{AnalysisConfig, Segment};
use crate::filter::SessionFilter;
use crate::metrics::{self, GroupBy, GroupKey, PathLengthStats};
use crate::session::Session;
use crate::store::SessionStore;

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub sessions: usize,
    pub bounce_rate: f64,
    pub bounce_rate_by_source: Vec<KeyedValue>,
    pub average_links_visited: f64,
    pub average_links_to_purchase: f64,
    pub average_steps_to_purchase: f64,
    pub purchase_success_rate: f64,
}

/// One grouped metric value, flattened for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyedValue {
    #[serde(flatten)]
    pub key: GroupKey,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelMetrics {
    pub source: String,
    pub sessions: usize,
    pub bounce_rate: f64,
    pub average_links_visited: f64,
    pub average_links_to_purchase: f64,
    pub purchase_success_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentReport {
    pub name: String,
    pub channels: Vec<ChannelMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub sessions: usize,
    pub path_length: PathLengthStats,
    pub sources: Vec<KeyedCount>,
    pub devices: Vec<KeyedCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyedCount {
    #[serde(flatten)]
    pub key: GroupKey,
    pub sessions: usize,
}

pub fn keyed_values(map: BTreeMap<GroupKey, f64>) -> Vec<KeyedValue> {
    map.into_iter()
        .map(|(key, value)| KeyedValue { key, value })
        .collect()
}

pub fn overview(store: &SessionStore, filter: &SessionFilter, cfg: &AnalysisConfig) -> Overview {
    let sessions = store.select(filter);
    let success = cfg.success_event.as_str();
    Overview {
        sessions: sessions.len(),
        bounce_rate: metrics::bounce_rate(&sessions),
        bounce_rate_by_source: keyed_values(metrics::bounce_rate_by(&sessions, GroupBy::Source)),
        average_links_visited: metrics::average_links_visited(&sessions),
        average_links_to_purchase: metrics::average_links_to_success(&sessions, success),
        average_steps_to_purchase: metrics::average_steps_to_success(&sessions, success),
        purchase_success_rate: metrics::conversion_rate(&sessions, success),
    }
}

/// Per-source metrics for every source of `segment`, in the segment's
/// order. A source absent from the data reports zeros.
pub fn segment_report(
    store: &SessionStore,
    segment: &Segment,
    devices: Option<&SessionFilter>,
    cfg: &AnalysisConfig,
) -> SegmentReport {
    let channels = segment
        .sources
        .iter()
        .map(|source| {
            let sessions: Vec<_> = store
                .select(&SessionFilter::source(source.clone()))
                .into_iter()
                .filter(|s| devices.map_or(true, |f| f.matches(s)))
                .collect();
            channel_metrics(source, &sessions, cfg)
        })
        .collect();
    SegmentReport {
        name: segment.name.clone(),
        channels,
    }
}

fn channel_metrics(
    source: &str,
    sessions: &[&Session],
    cfg: &AnalysisConfig,
) -> ChannelMetrics {
    let success = cfg.success_event.as_str();
    ChannelMetrics {
        source: source.to_string(),
        sessions: sessions.len(),
        bounce_rate: metrics::bounce_rate(sessions),
        average_links_visited: metrics::average_links_visited(sessions),
        average_links_to_purchase: metrics::average_links_to_success(sessions, success),
        purchase_success_rate: metrics::conversion_rate(sessions, success),
    }
}

pub fn dataset_summary(store: &SessionStore, filter: &SessionFilter) -> DatasetSummary {
    let sessions = store.select(filter);
    let counts = |group_by: GroupBy| -> Vec<KeyedCount> {
        metrics::distribution(&sessions, group_by)
            .into_iter()
            .map(|(key, sessions)| KeyedCount { key, sessions })
            .collect()
    };
    DatasetSummary {
        sessions: sessions.len(),
        path_length: metrics::path_length_stats(&sessions),
        sources: counts(GroupBy::Source),
        devices: counts(GroupBy::Device),
    }
}
