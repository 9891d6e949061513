//! User-by-movie rating matrix.
//!
//! First stage of the pipeline: a flat rating snapshot becomes an indexed
//! structure with explicit user and movie universes. The matrix is logically
//! dense (an absent entry reads as 0.0, meaning "unrated", which is distinct
//! from the minimum real score of 1.0) but stored sparsely, since real
//! snapshots are overwhelmingly empty.
//!
//! Built fresh per request from one snapshot, owned by that computation,
//! dropped when it returns.

use std::collections::{BTreeSet, HashMap};
use store::{MovieId, Rating, UserId};

/// Sparse user-by-movie score matrix plus its observed universes.
#[derive(Debug, Clone, Default)]
pub struct RatingMatrix {
    rows: HashMap<UserId, HashMap<MovieId, f32>>,
    /// Distinct user ids observed, ascending
    users: Vec<UserId>,
    /// Distinct movie ids observed, ascending
    movies: Vec<MovieId>,
}

impl RatingMatrix {
    /// Build a matrix from a rating snapshot.
    ///
    /// Input order and id ranges are arbitrary. Duplicate (user, movie)
    /// entries are resolved last-seen-wins rather than rejected; replayed or
    /// backfilled snapshots must not take the engine down. An empty snapshot
    /// yields an empty matrix, which is a valid input for the fallback path.
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        let mut rows: HashMap<UserId, HashMap<MovieId, f32>> = HashMap::new();
        let mut users = BTreeSet::new();
        let mut movies = BTreeSet::new();

        for rating in ratings {
            users.insert(rating.user_id);
            movies.insert(rating.movie_id);
            rows.entry(rating.user_id)
                .or_default()
                .insert(rating.movie_id, rating.score);
        }

        Self {
            rows,
            users: users.into_iter().collect(),
            movies: movies.into_iter().collect(),
        }
    }

    /// Distinct user ids in the snapshot, ascending
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    /// Distinct movie ids in the snapshot, ascending
    pub fn movies(&self) -> &[MovieId] {
        &self.movies
    }

    /// Whether the user appears in the universe
    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.rows.contains_key(&user_id)
    }

    /// Score a user gave a movie, 0.0 when unrated
    pub fn score(&self, user_id: UserId, movie_id: MovieId) -> f32 {
        self.rows
            .get(&user_id)
            .and_then(|row| row.get(&movie_id))
            .copied()
            .unwrap_or(0.0)
    }

    /// A user's full row of (movie, score) entries
    pub fn row(&self, user_id: UserId) -> Option<&HashMap<MovieId, f32>> {
        self.rows.get(&user_id)
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn movie_count(&self) -> usize {
        self.movies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_is_valid() {
        let matrix = RatingMatrix::from_ratings(&[]);
        assert!(matrix.is_empty());
        assert!(matrix.users().is_empty());
        assert!(matrix.movies().is_empty());
        assert_eq!(matrix.score(1, 1), 0.0);
    }

    #[test]
    fn test_universes_are_sorted_and_distinct() {
        let ratings = vec![
            Rating::new(3, 20, 4.0),
            Rating::new(1, 30, 2.0),
            Rating::new(3, 10, 5.0),
            Rating::new(2, 20, 3.0),
        ];
        let matrix = RatingMatrix::from_ratings(&ratings);

        assert_eq!(matrix.users(), &[1, 2, 3]);
        assert_eq!(matrix.movies(), &[10, 20, 30]);
        assert_eq!(matrix.user_count(), 3);
        assert_eq!(matrix.movie_count(), 3);
    }

    #[test]
    fn test_absent_entry_reads_as_zero() {
        let matrix = RatingMatrix::from_ratings(&[Rating::new(1, 10, 5.0)]);
        assert_eq!(matrix.score(1, 10), 5.0);
        assert_eq!(matrix.score(1, 99), 0.0);
        assert_eq!(matrix.score(99, 10), 0.0);
        assert!(!matrix.contains_user(99));
    }

    #[test]
    fn test_duplicate_rating_last_seen_wins() {
        let ratings = vec![
            Rating::new(1, 10, 2.0),
            Rating::new(1, 11, 4.0),
            Rating::new(1, 10, 5.0),
        ];
        let matrix = RatingMatrix::from_ratings(&ratings);

        assert_eq!(matrix.score(1, 10), 5.0);
        assert_eq!(matrix.score(1, 11), 4.0);
        // The duplicate must not inflate the universes
        assert_eq!(matrix.users(), &[1]);
        assert_eq!(matrix.movies(), &[10, 11]);
    }
}
