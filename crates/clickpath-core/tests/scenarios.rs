use clickpath_core::adjacency::{adjacent, Direction, Neighbor, DEFAULT_TARGET_EVENT};
use clickpath_core::metrics::{
    average_links_to_success, bounce_rate, bounce_rate_by, conversion_rate, GroupBy, GroupKey,
    DEFAULT_SUCCESS_EVENT,
};
use clickpath_core::ranking::top_paths;
use clickpath_core::session::{normalize_links, LINK_COLUMNS};
use clickpath_core::{RawRow, SessionFilter, SessionStore};

fn sparse_row(source: &str, device: &str, links: &[(usize, &str)]) -> RawRow {
    let mut row = RawRow::new(source, device, &[]);
    for (idx, link) in links {
        row.links[*idx] = Some((*link).to_string());
    }
    row
}

fn store(rows: Vec<RawRow>) -> SessionStore {
    SessionStore::from_rows(rows).expect("store")
}

#[test]
fn path_length_matches_normalized_row() {
    let rows = vec![
        sparse_row("direct", "mobile", &[(0, "home"), (3, "cart"), (15, "exit")]),
        sparse_row("search", "desktop", &[]),
        sparse_row("facebook_advert", "tablet", &[(1, "landing")]),
    ];
    let store = store(rows.clone());

    for (row, session) in rows.into_iter().zip(store.sessions()) {
        let expected = normalize_links(row.links);
        assert_eq!(session.path_length(), expected.len());
        assert_eq!(session.path(), &expected);
        assert!(session.path().len() <= LINK_COLUMNS);
        assert!(session.path().iter().all(|step| !step.is_empty()));
    }
}

#[test]
fn bounce_for_direct_with_empty_and_two_page_paths() {
    let store = store(vec![
        RawRow::new("direct", "mobile", &[]),
        RawRow::new("direct", "mobile", &["home", "checkout"]),
    ]);
    let direct = store.select(&SessionFilter::source("direct"));
    assert_eq!(bounce_rate(&direct), 50.0);
    assert_eq!(
        bounce_rate_by(store.sessions(), GroupBy::Source)[&GroupKey::source("direct")],
        50.0
    );
}

#[test]
fn bounce_ignores_position_of_gaps() {
    // A gap in the second column must not make a multi-page visit a bounce.
    let store = store(vec![sparse_row(
        "search",
        "desktop",
        &[(0, "home"), (2, "pricing")],
    )]);
    assert_eq!(bounce_rate(store.sessions()), 0.0);
}

#[test]
fn bounce_of_empty_selection_is_zero() {
    let store = store(vec![RawRow::new("direct", "mobile", &["home"])]);
    let nothing = store.select(&SessionFilter::source("linkedin_share"));
    assert!(nothing.is_empty());
    assert_eq!(bounce_rate(&nothing), 0.0);
}

#[test]
fn conversion_and_average_links_to_purchase() {
    let store = store(vec![
        RawRow::new("direct", "mobile", &["home", "cart", "purchase_success"]),
        RawRow::new("direct", "mobile", &["home", "purchase_success"]),
    ]);
    let all = store.select(&SessionFilter::all());
    assert_eq!(conversion_rate(&all, DEFAULT_SUCCESS_EVENT), 100.0);
    assert_eq!(average_links_to_success(&all, DEFAULT_SUCCESS_EVENT), 2.5);
}

#[test]
fn conversion_is_zero_exactly_when_nobody_converts() {
    let store = store(vec![
        RawRow::new("direct", "mobile", &["home", "cart"]),
        RawRow::new("search", "desktop", &["home", "purchase_success"]),
        RawRow::new("search", "mobile", &[]),
    ]);
    let filters = [
        SessionFilter::all(),
        SessionFilter::source("direct"),
        SessionFilter::source("search"),
        SessionFilter::device("mobile"),
        SessionFilter::device("desktop"),
    ];
    for filter in &filters {
        let subset = store.select(filter);
        let any_converted = subset.iter().any(|s| s.converted(DEFAULT_SUCCESS_EVENT));
        let rate = conversion_rate(&subset, DEFAULT_SUCCESS_EVENT);
        assert_eq!(rate == 0.0, !any_converted, "filter {filter:?}");
        assert!((0.0..=100.0).contains(&rate));
    }
}

#[test]
fn adjacency_before_and_after_target() {
    let store = store(vec![RawRow::new(
        "direct",
        "mobile",
        &["a", "b", "purchase_start", "c"],
    )]);
    let before = adjacent(store.sessions(), DEFAULT_TARGET_EVENT, Direction::Before);
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].neighbor, Neighbor::Page("b".to_string()));

    let after = adjacent(store.sessions(), DEFAULT_TARGET_EVENT, Direction::After);
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].neighbor, Neighbor::Page("c".to_string()));
}

#[test]
fn adjacency_edges_use_sentinels() {
    let store = store(vec![
        RawRow::new("direct", "mobile", &["purchase_start", "x"]),
        RawRow::new("direct", "mobile", &["x", "purchase_start"]),
    ]);
    let before = adjacent(&store.sessions()[..1], DEFAULT_TARGET_EVENT, Direction::Before);
    assert_eq!(before[0].neighbor, Neighbor::Start);

    let after = adjacent(&store.sessions()[1..], DEFAULT_TARGET_EVENT, Direction::After);
    assert_eq!(after[0].neighbor, Neighbor::End);
    assert_eq!(after[0].neighbor.page(), None);
}

#[test]
fn top_paths_rank_identical_sequences() {
    let store = store(vec![
        RawRow::new("direct", "mobile", &["x", "y"]),
        RawRow::new("direct", "mobile", &["x", "y"]),
        RawRow::new("direct", "mobile", &["y", "x"]),
        RawRow::new("direct", "mobile", &["x", "y"]),
    ]);
    let top = top_paths(store.sessions(), 2);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].path.as_slice(), ["x", "y"]);
    assert_eq!(top[0].sessions, 3);
    assert_eq!(top[1].path.as_slice(), ["y", "x"]);
    assert_eq!(top[1].sessions, 1);
}

#[test]
fn top_paths_with_large_k_cover_every_session() {
    let store = store(vec![
        RawRow::new("direct", "mobile", &["a"]),
        RawRow::new("search", "mobile", &["a", "b"]),
        RawRow::new("search", "desktop", &[]),
        RawRow::new("direct", "desktop", &["a"]),
    ]);
    let top = top_paths(store.sessions(), 100);
    assert_eq!(top.len(), 3);
    assert_eq!(
        top.iter().map(|c| c.sessions).sum::<usize>(),
        store.len()
    );
}

#[test]
fn filtering_never_alters_the_store() {
    let store = store(vec![
        RawRow::new("direct", "mobile", &["a"]),
        RawRow::new("search", "desktop", &["b"]),
    ]);
    let before: Vec<_> = store.sessions().to_vec();
    let _ = store.select(&SessionFilter::source("direct"));
    let _ = store.select(&SessionFilter::device("desktop"));
    assert_eq!(store.sessions(), before.as_slice());
}
