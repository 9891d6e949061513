//! Collaborator interfaces consumed by the recommendation engine.
//!
//! The engine never talks to storage directly; it sees three narrow traits:
//! a point-in-time rating snapshot, a popularity ranking, and a detail
//! hydrator. `RatingStore` implements all three for in-memory/offline use,
//! and tests substitute their own mocks at the same seam.

use crate::types::{MovieId, MovieSummary, Rating, RatingStore};
use anyhow::Result;
use std::collections::HashMap;

/// Source of consistent point-in-time rating snapshots.
///
/// One call returns the complete rating list as it exists at that moment.
/// The engine builds all of its per-request state from a single call, so an
/// implementation backed by a live database must read atomically rather than
/// streaming while writes land.
pub trait RatingSnapshotSource: Send + Sync {
    fn fetch_all_ratings(&self) -> Result<Vec<Rating>>;
}

/// Popularity ranking over the whole catalog.
///
/// Used by the fallback policy when personalization is impossible. The
/// contract requires a deterministic order: rating count descending, ties
/// broken by movie id ascending.
pub trait PopularityProvider: Send + Sync {
    fn top_by_rating_count(&self, limit: usize) -> Vec<MovieId>;
}

/// Hydrates movie id lists into display records.
///
/// Ids with no catalog entry still get a summary so callers never lose a
/// recommendation to a catalog gap.
pub trait MovieDetailProvider: Send + Sync {
    fn fetch_details(&self, movie_ids: &[MovieId]) -> HashMap<MovieId, MovieSummary>;
}

impl RatingSnapshotSource for RatingStore {
    fn fetch_all_ratings(&self) -> Result<Vec<Rating>> {
        // The store is only mutated through &mut self, so a clone of the
        // rating list is a consistent snapshot.
        Ok(self.ratings.clone())
    }
}

impl PopularityProvider for RatingStore {
    fn top_by_rating_count(&self, limit: usize) -> Vec<MovieId> {
        let mut ranked: Vec<(MovieId, u32)> = self
            .aggregates
            .iter()
            .map(|(&movie_id, agg)| (movie_id, agg.rating_count))
            .collect();

        // Rating count DESC, movie id ASC on ties
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);

        ranked.into_iter().map(|(movie_id, _)| movie_id).collect()
    }
}

impl MovieDetailProvider for RatingStore {
    fn fetch_details(&self, movie_ids: &[MovieId]) -> HashMap<MovieId, MovieSummary> {
        movie_ids
            .iter()
            .map(|&movie_id| (movie_id, self.summary(movie_id)))
            .collect()
    }
}
