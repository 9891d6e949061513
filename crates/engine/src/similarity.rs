//! Pairwise user similarity.
//!
//! ## Algorithm
//! Each user's matrix row is treated as a non-negative vector over the movie
//! universe (0 for unrated). Similarity is plain cosine:
//! `dot(u, v) / (‖u‖ · ‖v‖)`, defined as 0.0 when either norm is 0.
//!
//! This is the O(U² · M) hot spot of the whole engine. The upper triangle is
//! computed in parallel with rayon and then mirrored into the lower half, so
//! symmetry holds bit-exactly by construction instead of relying on
//! floating-point arithmetic to come out the same both ways.
//!
//! f32 addition is not associative, so the accumulation order of norms and
//! dot products is part of the result. Rows are materialized sorted by movie
//! id before any arithmetic, never iterated in hash order; identical
//! snapshots therefore produce identical similarity bits on every call.

use crate::matrix::RatingMatrix;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use store::{MovieId, UserId};
use tracing::debug;

/// Symmetric user-by-user cosine similarity matrix.
///
/// Stored dense and row-major over the user universe; values are in [0, 1]
/// and the diagonal is 1.0 for every user with at least one nonzero rating.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    users: Vec<UserId>,
    index: HashMap<UserId, usize>,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Compute the full similarity matrix for a rating matrix.
    pub fn compute(matrix: &RatingMatrix) -> Self {
        let users = matrix.users().to_vec();
        let n = users.len();

        // Materialize every row sorted by movie id, in universe order
        let rows: Vec<Vec<(MovieId, f32)>> = users
            .iter()
            .map(|&user_id| {
                let mut row: Vec<(MovieId, f32)> = matrix
                    .row(user_id)
                    .map(|r| r.iter().map(|(&movie_id, &score)| (movie_id, score)).collect())
                    .unwrap_or_default();
                row.sort_unstable_by_key(|&(movie_id, _)| movie_id);
                row
            })
            .collect();

        let norms: Vec<f32> = rows
            .iter()
            .map(|row| row.iter().map(|&(_, score)| score * score).sum::<f32>().sqrt())
            .collect();

        // Upper triangle in parallel, one row of pairs per task
        let upper: Vec<Vec<f32>> = (0..n)
            .into_par_iter()
            .map(|i| {
                ((i + 1)..n)
                    .map(|j| cosine(&rows[i], &rows[j], norms[i], norms[j]))
                    .collect()
            })
            .collect();

        // Mirror into a dense row-major buffer
        let mut values = vec![0.0f32; n * n];
        for i in 0..n {
            // A user in the universe has rated something, but guard the
            // degenerate all-zero row anyway
            values[i * n + i] = if norms[i] > 0.0 { 1.0 } else { 0.0 };
            for (offset, &sim) in upper[i].iter().enumerate() {
                let j = i + 1 + offset;
                values[i * n + j] = sim;
                values[j * n + i] = sim;
            }
        }

        let index = users
            .iter()
            .enumerate()
            .map(|(i, &user_id)| (user_id, i))
            .collect();

        debug!(users = n, "computed similarity matrix");

        Self {
            users,
            index,
            values,
        }
    }

    /// User ids covered by this matrix, ascending
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    /// Whether a user is covered by this matrix
    pub fn contains(&self, user_id: UserId) -> bool {
        self.index.contains_key(&user_id)
    }

    /// Similarity between two users, 0.0 when either is outside the universe
    pub fn similarity(&self, u: UserId, v: UserId) -> f32 {
        match (self.index.get(&u), self.index.get(&v)) {
            (Some(&i), Some(&j)) => self.values[i * self.users.len() + j],
            _ => 0.0,
        }
    }
}

/// Cosine similarity of two sparse non-negative rows with precomputed norms.
///
/// Rows must be sorted by movie id; the dot product is a merge-join, so the
/// additions always happen in ascending movie-id order.
fn cosine(a: &[(MovieId, f32)], b: &[(MovieId, f32)], norm_a: f32, norm_b: f32) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }

    // Rounding can push proportional rows a hair past 1.0
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::Rating;

    fn matrix(ratings: &[(u32, u32, f32)]) -> RatingMatrix {
        let ratings: Vec<Rating> = ratings
            .iter()
            .map(|&(u, m, s)| Rating::new(u, m, s))
            .collect();
        RatingMatrix::from_ratings(&ratings)
    }

    #[test]
    fn test_self_similarity_is_one() {
        let m = matrix(&[(1, 10, 5.0), (1, 11, 2.0), (2, 10, 3.0)]);
        let sim = SimilarityMatrix::compute(&m);

        assert_eq!(sim.similarity(1, 1), 1.0);
        assert_eq!(sim.similarity(2, 2), 1.0);
    }

    #[test]
    fn test_symmetry_is_exact() {
        let m = matrix(&[
            (1, 10, 5.0),
            (1, 11, 3.5),
            (2, 10, 2.0),
            (2, 12, 4.5),
            (3, 11, 1.0),
            (3, 12, 5.0),
        ]);
        let sim = SimilarityMatrix::compute(&m);

        for &u in sim.users() {
            for &v in sim.users() {
                // Bitwise equality, not approximate
                assert_eq!(
                    sim.similarity(u, v).to_bits(),
                    sim.similarity(v, u).to_bits(),
                    "asymmetry between {u} and {v}"
                );
            }
        }
    }

    #[test]
    fn test_disjoint_users_have_zero_similarity() {
        let m = matrix(&[(1, 10, 5.0), (2, 20, 5.0)]);
        let sim = SimilarityMatrix::compute(&m);
        assert_eq!(sim.similarity(1, 2), 0.0);
    }

    #[test]
    fn test_proportional_rows_have_similarity_one() {
        // Same direction, different magnitude
        let m = matrix(&[(1, 10, 2.0), (1, 11, 4.0), (2, 10, 2.5), (2, 11, 5.0)]);
        let sim = SimilarityMatrix::compute(&m);
        assert!((sim.similarity(1, 2) - 1.0).abs() < 1e-6);
        assert!(sim.similarity(1, 2) <= 1.0);
    }

    #[test]
    fn test_partial_overlap_is_between_zero_and_one() {
        let m = matrix(&[(1, 10, 5.0), (1, 11, 4.0), (2, 10, 5.0), (2, 12, 5.0)]);
        let sim = SimilarityMatrix::compute(&m);
        let s = sim.similarity(1, 2);
        assert!(s > 0.0 && s < 1.0, "got {s}");
    }

    #[test]
    fn test_unknown_user_reads_as_zero() {
        let m = matrix(&[(1, 10, 5.0)]);
        let sim = SimilarityMatrix::compute(&m);
        assert!(!sim.contains(99));
        assert_eq!(sim.similarity(1, 99), 0.0);
        assert_eq!(sim.similarity(99, 99), 0.0);
    }

    #[test]
    fn test_empty_matrix() {
        let m = RatingMatrix::from_ratings(&[]);
        let sim = SimilarityMatrix::compute(&m);
        assert!(sim.users().is_empty());
    }

    /// Wide rows are where hash-order accumulation would show: dozens of
    /// additions per norm and dot product, with mathematically equal pairs
    /// that must not drift apart in their low bits.
    #[test]
    fn test_wide_tied_rows_are_bit_stable_across_rebuilds() {
        // Target 1 rates 40 movies; users 2 and 3 each cover one half with
        // the same score multiset, in the same per-movie order, so both
        // pairs run the identical f32 operation sequence
        let score = |i: u32| 1.0 + (i % 9) as f32 * 0.5;
        let mut ratings = Vec::new();
        for i in 0..20 {
            ratings.push((1, 100 + i, score(i)));
            ratings.push((1, 120 + i, score(i)));
            ratings.push((2, 100 + i, score(i)));
            ratings.push((3, 120 + i, score(i)));
        }

        let first = SimilarityMatrix::compute(&matrix(&ratings));
        assert_eq!(
            first.similarity(1, 2).to_bits(),
            first.similarity(1, 3).to_bits(),
            "equal-by-construction pairs must match bitwise"
        );

        // Every rebuild gets fresh HashMaps with fresh iteration order;
        // the similarity bits must not care
        for _ in 0..50 {
            let again = SimilarityMatrix::compute(&matrix(&ratings));
            for &u in first.users() {
                for &v in first.users() {
                    assert_eq!(
                        again.similarity(u, v).to_bits(),
                        first.similarity(u, v).to_bits(),
                        "similarity({u}, {v}) drifted between rebuilds"
                    );
                }
            }
        }
    }
}
