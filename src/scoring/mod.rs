//! Query-scoped scoring and ranking.
//!
//! Scores are never stored. A [`MatchScorer`] is built for one query, joins the
//! entries gathered for it by value, and yields a ranked list of [`Match`]es:
//!
//! 1. more matched query tags rank higher ([`Score::match_count`]);
//! 2. among equals, the smaller sum of `|query position - tag index|` ranks higher
//!    ([`Score::index_delta`]);
//! 3. remaining ties keep the order in which values were first seen.

pub mod scorer;
pub mod types;

#[cfg(test)]
mod tests;

pub use scorer::MatchScorer;
pub use types::{Match, Score};
