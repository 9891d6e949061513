//! Core domain types for the rating store.
//!
//! The store holds the raw material the recommendation engine works from:
//! a flat list of ratings plus a movie catalog with per-movie aggregates.
//! It is deliberately dumb — all algorithmic work happens in the `engine`
//! crate, which only ever sees a point-in-time snapshot of the ratings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with movie IDs

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Rating
// =============================================================================

/// A single rating given by a user to a movie.
///
/// Scores are on the 1.0-5.0 scale. The store does not enforce uniqueness of
/// (user, movie) pairs; the matrix builder resolves duplicates
/// deterministically (last one wins).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value from 1.0 to 5.0
    pub score: f32,
}

impl Rating {
    pub fn new(user_id: UserId, movie_id: MovieId, score: f32) -> Self {
        Self {
            user_id,
            movie_id,
            score,
        }
    }
}

// =============================================================================
// Movie catalog types
// =============================================================================

/// Display-level summary of a movie, used to hydrate recommendation id lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    /// Mean of all scores this movie received, 0.0 when unrated
    pub avg_score: f32,
    /// Total number of ratings this movie received
    pub rating_count: u32,
}

/// Per-movie rating aggregates, maintained incrementally on insert.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MovieAggregate {
    pub(crate) score_sum: f32,
    pub(crate) rating_count: u32,
}

impl MovieAggregate {
    pub(crate) fn avg_score(&self) -> f32 {
        if self.rating_count == 0 {
            0.0
        } else {
            self.score_sum / self.rating_count as f32
        }
    }
}

// =============================================================================
// RatingStore - In-Memory Rating & Catalog Store
// =============================================================================

/// In-memory implementation of the engine's data collaborators.
///
/// Holds the full rating list (the snapshot source), movie titles, and
/// per-movie aggregates (the popularity and detail sources). In a deployment
/// these three concerns would sit behind a database; for offline use the CLI
/// loads this from CSV files instead.
#[derive(Debug, Default)]
pub struct RatingStore {
    /// All ratings, in insertion order. Cloned wholesale per snapshot read.
    pub(crate) ratings: Vec<Rating>,
    /// Movie titles by id
    pub(crate) titles: HashMap<MovieId, String>,
    /// Per-movie rating aggregates
    pub(crate) aggregates: HashMap<MovieId, MovieAggregate>,
    /// Ratings grouped by user, for history queries
    pub(crate) user_ratings: HashMap<UserId, Vec<Rating>>,
}

impl RatingStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a movie title. Ratings for unregistered movies are still
    /// accepted; they just hydrate without a title.
    pub fn insert_movie(&mut self, movie_id: MovieId, title: impl Into<String>) {
        self.titles.insert(movie_id, title.into());
    }

    /// Record a rating and update the movie's aggregates.
    pub fn insert_rating(&mut self, rating: Rating) {
        let agg = self.aggregates.entry(rating.movie_id).or_default();
        agg.score_sum += rating.score;
        agg.rating_count += 1;

        self.user_ratings
            .entry(rating.user_id)
            .or_default()
            .push(rating);

        self.ratings.push(rating);
    }

    /// All ratings made by a user, in insertion order.
    ///
    /// Returns an empty slice if the user has no ratings.
    pub fn user_ratings(&self, user_id: UserId) -> &[Rating] {
        self.user_ratings
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Title lookup for a single movie
    pub fn title(&self, movie_id: MovieId) -> Option<&str> {
        self.titles.get(&movie_id).map(|s| s.as_str())
    }

    /// Number of ratings a movie has received
    pub fn rating_count(&self, movie_id: MovieId) -> u32 {
        self.aggregates
            .get(&movie_id)
            .map(|a| a.rating_count)
            .unwrap_or(0)
    }

    /// Mean score for a movie, 0.0 when unrated
    pub fn avg_score(&self, movie_id: MovieId) -> f32 {
        self.aggregates
            .get(&movie_id)
            .map(|a| a.avg_score())
            .unwrap_or(0.0)
    }

    /// Build a display summary for a movie.
    ///
    /// Movies missing from the catalog are still summarized (the rating
    /// stream may run ahead of the catalog) under a placeholder title.
    pub fn summary(&self, movie_id: MovieId) -> MovieSummary {
        MovieSummary {
            id: movie_id,
            title: self
                .title(movie_id)
                .unwrap_or("(unknown title)")
                .to_string(),
            avg_score: self.avg_score(movie_id),
            rating_count: self.rating_count(movie_id),
        }
    }

    /// All user ids with at least one rating, ascending
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.user_ratings.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Counts for debugging/validation: (movies, users, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.titles.len(),
            self.user_ratings.len(),
            self.ratings.len(),
        )
    }
}
