use super::*;
use crate::model::Entry;
use std::cmp::Ordering;

fn values(matches: &[Match]) -> Vec<&str> {
    matches.iter().map(|m| m.value.as_str()).collect()
}

#[test]
fn test_score_first_and_absorb() {
    let mut score = Score::first(2);
    assert_eq!(score.match_count, 1);
    assert_eq!(score.index_delta, 2);

    score.absorb(3);
    assert_eq!(
        score,
        Score {
            match_count: 2,
            index_delta: 5
        }
    );
}

#[test]
fn test_score_rank_cmp_prefers_more_matches() {
    let broad = Score {
        match_count: 3,
        index_delta: 10,
    };
    let narrow = Score {
        match_count: 2,
        index_delta: 0,
    };

    assert_eq!(broad.rank_cmp(&narrow), Ordering::Less);
    assert_eq!(narrow.rank_cmp(&broad), Ordering::Greater);
}

#[test]
fn test_score_rank_cmp_prefers_smaller_delta_on_tie() {
    let close = Score {
        match_count: 2,
        index_delta: 1,
    };
    let far = Score {
        match_count: 2,
        index_delta: 4,
    };

    assert_eq!(close.rank_cmp(&far), Ordering::Less);
    assert_eq!(close.rank_cmp(&close), Ordering::Equal);
}

#[test]
fn test_score_display() {
    assert_eq!(Score::first(4).to_string(), "matches=1 delta=4");
}

#[test]
fn test_scorer_positions_use_first_occurrence() {
    let query = ["foo", "bar", "foo"];
    let scorer = MatchScorer::new(&query);

    assert_eq!(scorer.tags(), &["foo", "bar"]);
    assert_eq!(scorer.position("foo"), Some(0));
    assert_eq!(scorer.position("bar"), Some(1));
    assert_eq!(scorer.position("baz"), None);
}

#[test]
fn test_scorer_index_delta() {
    let query = ["foo", "bar", "baz"];
    let scorer = MatchScorer::new(&query);

    assert_eq!(scorer.index_delta(&Entry::new("v", "baz", 0)), 2);
    assert_eq!(scorer.index_delta(&Entry::new("v", "foo", 3)), 3);
    assert_eq!(scorer.index_delta(&Entry::new("v", "bar", 1)), 0);
    assert_eq!(scorer.index_delta(&Entry::new("v", "other", 2)), 2);
}

#[test]
fn test_scorer_missing_tags() {
    let query = vec!["foo".to_string(), "bar".to_string(), "baz".to_string()];
    let scorer = MatchScorer::new(&query);
    let cached = vec![Entry::new("v", "bar", 0)];

    assert_eq!(scorer.missing_tags(&cached), vec!["foo", "baz"]);
    assert!(scorer.missing_tags(&[
        Entry::new("v", "foo", 0),
        Entry::new("v", "bar", 1),
        Entry::new("w", "baz", 2),
    ])
    .is_empty());
}

#[test]
fn test_rank_empty() {
    let query = ["foo"];
    let none: Vec<Entry> = Vec::new();
    assert!(MatchScorer::new(&query).rank(&none).is_empty());
}

#[test]
fn test_rank_counts_one_match_per_shared_tag() {
    let query = ["foo", "bar", "qux"];
    let entries = vec![
        Entry::new("u1", "foo", 0),
        Entry::new("u1", "bar", 1),
        Entry::new("u2", "qux", 0),
        Entry::new("u2", "foo", 1),
        Entry::new("u1", "qux", 2),
    ];

    let ranked = MatchScorer::new(&query).rank(&entries);

    assert_eq!(values(&ranked), vec!["u1", "u2"]);
    assert_eq!(ranked[0].score.match_count, 3);
    assert_eq!(ranked[0].score.index_delta, 0);
    assert_eq!(ranked[1].score.match_count, 2);
    assert_eq!(ranked[1].score.index_delta, 2 + 1);
}

#[test]
fn test_rank_orders_by_delta_among_equal_counts() {
    // u1 tagged: foo bar baz; u2 tagged: bar foo qux.
    let query = ["foo", "bar", "baz", "qux", "quux"];
    let entries = vec![
        Entry::new("u1", "foo", 0),
        Entry::new("u2", "foo", 1),
        Entry::new("u1", "bar", 1),
        Entry::new("u2", "bar", 0),
        Entry::new("u1", "baz", 2),
        Entry::new("u2", "qux", 2),
    ];

    let ranked = MatchScorer::new(&query).rank(&entries);

    assert_eq!(values(&ranked), vec!["u1", "u2"]);
    assert_eq!(ranked[0].score, Score { match_count: 3, index_delta: 0 });
    assert_eq!(ranked[1].score, Score { match_count: 3, index_delta: 3 });
}

#[test]
fn test_rank_keeps_first_seen_order_on_full_tie() {
    let query = ["foo"];
    let entries = vec![
        Entry::new("c", "foo", 0),
        Entry::new("a", "foo", 0),
        Entry::new("b", "foo", 0),
    ];

    let scorer = MatchScorer::new(&query);
    for _ in 0..10 {
        assert_eq!(values(&scorer.rank(&entries)), vec!["c", "a", "b"]);
    }
}

#[test]
fn test_rank_accepts_chained_sources() {
    let query = ["foo", "bar"];
    let cached = vec![Entry::new("u1", "foo", 0)];
    let stored = vec![Entry::new("u1", "bar", 1), Entry::new("u2", "bar", 0)];

    let ranked = MatchScorer::new(&query).rank(cached.iter().chain(stored.iter()));

    assert_eq!(values(&ranked), vec!["u1", "u2"]);
    assert_eq!(ranked[0].score.match_count, 2);
    assert_eq!(ranked[1].score, Score::first(1));
}

#[test]
fn test_match_into_value() {
    let m = Match::new("u1", Score::first(0));
    assert_eq!(m.into_value(), "u1");
}
