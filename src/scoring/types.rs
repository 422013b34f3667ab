use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Query-scoped score of one value.
pub struct Score {
    /// Number of distinct query tags the value matched.
    pub match_count: usize,
    /// Sum of `|query position - tag index|` over the matched tags.
    pub index_delta: usize,
}

impl Score {
    /// Score of a value after its first matching tag.
    pub fn first(index_delta: usize) -> Self {
        Self {
            match_count: 1,
            index_delta,
        }
    }

    /// Folds one more matching tag into the score.
    pub fn absorb(&mut self, index_delta: usize) {
        self.match_count += 1;
        self.index_delta += index_delta;
    }

    /// Ranking order: more matches first, then smaller accumulated delta.
    pub fn rank_cmp(&self, other: &Score) -> Ordering {
        other
            .match_count
            .cmp(&self.match_count)
            .then_with(|| self.index_delta.cmp(&other.index_delta))
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "matches={} delta={}", self.match_count, self.index_delta)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A value returned by a query, with its score.
pub struct Match {
    /// The matched value.
    pub value: String,
    /// How well it matched.
    pub score: Score,
}

impl Match {
    /// Pairs a value with its score.
    pub fn new(value: impl Into<String>, score: Score) -> Self {
        Self {
            value: value.into(),
            score,
        }
    }

    /// Consumes the match and returns the value.
    pub fn into_value(self) -> String {
        self.value
    }
}
