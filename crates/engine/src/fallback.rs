//! Popularity fallback.
//!
//! Served whenever personalization is impossible (no data, cold-start user)
//! or fails (computation error, timeout). Ranking is delegated to the
//! external popularity provider: total rating count descending, movie id
//! ascending on ties. No similarity work happens here.

use std::fmt;
use std::sync::Arc;
use store::{MovieId, PopularityProvider};
use tracing::warn;

/// Why the fallback was served instead of a personalized list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The global rating snapshot was empty
    NoRatingData,
    /// The target user has no rating history
    NoUserHistory,
    /// Personalization failed mid-computation
    ComputationFailure,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoRatingData => write!(f, "no rating data"),
            FallbackReason::NoUserHistory => write!(f, "no user history"),
            FallbackReason::ComputationFailure => write!(f, "computation failure"),
        }
    }
}

/// Supplies popularity-ranked movie lists when personalization degrades.
#[derive(Clone)]
pub struct FallbackPolicy {
    popularity: Arc<dyn PopularityProvider>,
}

impl FallbackPolicy {
    pub fn new(popularity: Arc<dyn PopularityProvider>) -> Self {
        Self { popularity }
    }

    /// Top movies by rating count, truncated to `limit`.
    ///
    /// The provider owns the ranking contract; the truncation is re-applied
    /// locally so a misbehaving provider cannot overrun the result bound.
    pub fn top_movies(&self, reason: FallbackReason, limit: usize) -> Vec<MovieId> {
        warn!(%reason, limit, "serving popularity fallback");
        let mut movie_ids = self.popularity.top_by_rating_count(limit);
        movie_ids.truncate(limit);
        movie_ids
    }
}
