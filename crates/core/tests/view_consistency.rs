use gamebook_core::{
    candidates, filter, CatalogIndex, Entry, ProbeController, ProbeStatus, Query, Translation,
    PLACEHOLDER_URL, SELECT_ALL,
};
use std::collections::HashMap;

fn entry(id: &str, name: &str, category: &str, image: &str) -> Entry {
    Entry {
        id: id.to_string(),
        slug: id.to_string(),
        name: name.to_string(),
        text: format!("<p>How to play {name}.</p>"),
        image: image.to_string(),
        category: Some(category.to_string()),
        visible: true,
        translations: HashMap::new(),
    }
}

fn catalog() -> CatalogIndex {
    let mut baccarat = entry("baccarat", "Baccarat", "Cards", "");
    baccarat.translations.insert(
        "fr".to_string(),
        Translation {
            name: Some("Baccara".to_string()),
            text: None,
        },
    );
    CatalogIndex::build(
        vec![
            entry("roulette", "Roulette", "Table", "wheel.jpg"),
            baccarat,
            entry("blackjack", "Blackjack", "Cards", ""),
        ],
        "en",
    )
}

/// Grid, sidebar, and drawer all derive from the same index; their row
/// order and selection handling must agree.
#[test]
fn all_views_observe_the_same_snapshot() {
    let index = catalog();

    let grid: Vec<&str> = filter(&index, &Query::default())
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    let sidebar: Vec<&str> = index.iter().map(|e| e.id.as_str()).collect();
    let drawer: Vec<&str> = filter(&index, &Query::with_category(SELECT_ALL))
        .iter()
        .map(|e| e.id.as_str())
        .collect();

    assert_eq!(grid, sidebar);
    assert_eq!(grid, drawer);
    assert_eq!(grid, vec!["baccarat", "blackjack", "roulette"]);

    // a selection that survives a data reload stays, a stale one degrades
    assert_eq!(index.normalize_selection("roulette"), "roulette");
    assert_eq!(index.normalize_selection("craps"), SELECT_ALL);
}

#[test]
fn locale_switch_reorders_without_disturbing_consumers() {
    let index = catalog();
    let french = index.reorder("fr-CA");

    assert_eq!(french.resolve(french.entry_by_key("baccarat").expect("entry")).name, "Baccara");
    // filtering the reordered index still preserves its own order
    let filtered: Vec<&str> = filter(&french, &Query::default())
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    let expected: Vec<&str> = french.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(filtered, expected);
}

/// Walk a probe against a synthetic asset origin where only one slug
/// variant exists, then switch entries mid-flight.
#[test]
fn probe_walks_candidates_and_discards_stale_results() {
    let index = catalog();
    let roulette = index.entry_by_key("roulette").expect("roulette");
    let available = "/assets/roulette.png";

    let mut probe = ProbeController::for_entry(roulette);
    let mut attempts = 0;
    while !probe.loaded() {
        attempts += 1;
        let event = if probe.current_url() == available {
            probe.success_event()
        } else {
            probe.failure_event()
        };
        assert!(probe.handle(event));
    }
    assert_eq!(probe.current_url(), available);
    assert_eq!(attempts, candidates(roulette).iter().position(|u| u == available).unwrap() + 1);

    // entry switch: pending result for the old list must be ignored
    let stale = probe.failure_event();
    let blackjack = index.entry_by_key("blackjack").expect("blackjack");
    probe.reset(candidates(blackjack)).expect("reset");
    assert!(!probe.handle(stale));
    assert_eq!(probe.status(), ProbeStatus::Pending(0));

    // exhaust everything; the placeholder is displayed regardless
    while !probe.loaded() {
        let event = probe.failure_event();
        probe.handle(event);
    }
    assert_eq!(probe.current_url(), PLACEHOLDER_URL);
}
