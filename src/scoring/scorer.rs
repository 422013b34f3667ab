use std::collections::HashMap;
use std::collections::hash_map::Entry as MapEntry;

use tracing::debug;

use crate::model::Entry;

use super::types::{Match, Score};

/// Scores entries against one ordered query.
///
/// A tag's query position is its first occurrence in the query; repeated query tags
/// count once.
#[derive(Debug, Clone)]
pub struct MatchScorer<'q> {
    tags: Vec<&'q str>,
    positions: HashMap<&'q str, usize>,
}

impl<'q> MatchScorer<'q> {
    /// Builds a scorer for one ordered query.
    pub fn new<S: AsRef<str>>(query: &'q [S]) -> Self {
        let mut tags = Vec::with_capacity(query.len());
        let mut positions = HashMap::with_capacity(query.len());

        for (position, tag) in query.iter().map(AsRef::as_ref).enumerate() {
            if let MapEntry::Vacant(slot) = positions.entry(tag) {
                slot.insert(position);
                tags.push(tag);
            }
        }

        Self { tags, positions }
    }

    /// Distinct query tags in query order.
    pub fn tags(&self) -> &[&'q str] {
        &self.tags
    }

    /// Returns the query position of `tag`.
    pub fn position(&self, tag: &str) -> Option<usize> {
        self.positions.get(tag).copied()
    }

    /// Distance between the entry's stored tag index and its tag's query position.
    ///
    /// Entries whose tag is not part of the query are measured from position zero.
    pub fn index_delta(&self, entry: &Entry) -> usize {
        self.position(&entry.tag)
            .unwrap_or(0)
            .abs_diff(entry.tag_index)
    }

    /// Query tags for which `entries` holds nothing, in query order.
    pub fn missing_tags(&self, entries: &[Entry]) -> Vec<String> {
        self.tags
            .iter()
            .filter(|tag| !entries.iter().any(|e| e.tag == **tag))
            .map(|tag| tag.to_string())
            .collect()
    }

    /// Deduplicates `entries` by value and ranks the values.
    ///
    /// The first occurrence of a value fixes its place among equals. Each further
    /// occurrence adds one match and its index delta. The result is stably sorted by
    /// [`Score::rank_cmp`], so equal scores keep first-occurrence order.
    pub fn rank<'e, I>(&self, entries: I) -> Vec<Match>
    where
        I: IntoIterator<Item = &'e Entry>,
    {
        let mut slots: HashMap<&'e str, usize> = HashMap::new();
        let mut matches: Vec<Match> = Vec::new();
        let mut seen = 0usize;

        for entry in entries {
            seen += 1;
            let delta = self.index_delta(entry);
            match slots.entry(entry.value.as_str()) {
                MapEntry::Occupied(slot) => matches[*slot.get()].score.absorb(delta),
                MapEntry::Vacant(slot) => {
                    slot.insert(matches.len());
                    matches.push(Match::new(entry.value.as_str(), Score::first(delta)));
                }
            }
        }

        matches.sort_by(|a, b| a.score.rank_cmp(&b.score));

        debug!(
            entries = seen,
            values = matches.len(),
            best = matches.first().map(|m| m.score.match_count),
            "Ranked query matches"
        );

        matches
    }
}
