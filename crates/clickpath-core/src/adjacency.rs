//! What visitors did right before or right after a target event.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize, Serializer};

use crate::metrics::each;
use crate::session::{Session, VisitPath};
use crate::tally::Tally;

/// Default funnel milestone inspected by adjacency analysis.
pub const DEFAULT_TARGET_EVENT: &str = "purchase_start";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Before,
    After,
}

/// The step next to a target event.
///
/// `Start` and `End` stand for the missing predecessor or successor when the
/// event sits at either edge of the path. They serialize as `"start"` and
/// `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Neighbor {
    Start,
    Page(String),
    End,
}

impl Neighbor {
    pub fn page(&self) -> Option<&str> {
        match self {
            Neighbor::Page(page) => Some(page),
            Neighbor::Start | Neighbor::End => None,
        }
    }
}

impl Serialize for Neighbor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Neighbor::Start => serializer.serialize_str("start"),
            Neighbor::Page(page) => serializer.serialize_str(page),
            Neighbor::End => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborCount {
    pub neighbor: Neighbor,
    pub sessions: usize,
}

/// Look up the neighbor of the first `target` in `path`.
///
/// Returns `None` when the path never reaches `target`. Later occurrences are
/// ignored.
pub fn neighbor(path: &VisitPath, target: &str, direction: Direction) -> Option<Neighbor> {
    let idx = path.position(target)?;
    let steps = path.as_slice();
    let found = match direction {
        Direction::Before => match idx.checked_sub(1) {
            Some(prev) => Neighbor::Page(steps[prev].clone()),
            None => Neighbor::Start,
        },
        Direction::After => match steps.get(idx + 1) {
            Some(next) => Neighbor::Page(next.clone()),
            None => Neighbor::End,
        },
    };
    Some(found)
}

/// Frequency of neighbors of `target` across sessions, most frequent first.
pub fn adjacent<S: Borrow<Session>>(
    sessions: &[S],
    target: &str,
    direction: Direction,
) -> Vec<NeighborCount> {
    each(sessions)
        .filter_map(|s| neighbor(s.path(), target, direction))
        .collect::<Tally<Neighbor>>()
        .into_ranked()
        .into_iter()
        .map(|(neighbor, sessions)| NeighborCount { neighbor, sessions })
        .collect()
}
