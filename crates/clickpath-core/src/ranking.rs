use std::borrow::Borrow;

use serde::Serialize;

use crate::metrics::each;
use crate::session::{Session, VisitPath};
use crate::tally::Tally;

/// Default number of paths returned by [`top_paths`].
pub const DEFAULT_TOP_K: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathCount {
    pub path: VisitPath,
    pub sessions: usize,
}

/// The `k` most common complete paths. Paths are equal only when they hold
/// the same steps in the same order; ties keep first-encountered order.
pub fn top_paths<S: Borrow<Session>>(sessions: &[S], k: usize) -> Vec<PathCount> {
    let tally: Tally<&VisitPath> = each(sessions).map(Session::path).collect();
    tally
        .into_ranked()
        .into_iter()
        .take(k)
        .map(|(path, sessions)| PathCount {
            path: path.clone(),
            sessions,
        })
        .collect()
}
