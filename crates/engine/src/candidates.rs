//! Candidate generation.
//!
//! ## Algorithm
//! 1. seen = movies the target has rated (score > 0 in their row)
//! 2. For each neighbor, liked = movies they scored at or above the like
//!    threshold
//! 3. Pool = union over neighbors of (liked − seen)
//! 4. Each candidate accumulates (distinct neighbors who liked it,
//!    sum of those neighbors' similarity to the target)
//! 5. Sort by like count DESC, similarity sum DESC, movie id ASC; truncate
//!
//! The composite key makes the ranking reproducible even when neighbor
//! signals tie, which decides which candidates survive truncation. An empty
//! pool is a valid outcome, not an error; whether to serve popularity
//! instead is the orchestrator's call, and it deliberately does not.

use crate::matrix::RatingMatrix;
use crate::neighbors::Neighbor;
use std::collections::{HashMap, HashSet};
use store::{MovieId, UserId};
use tracing::debug;

/// Aggregate endorsement signal for one candidate movie.
#[derive(Debug, Clone, Copy, Default)]
struct CandidateSignal {
    /// Distinct neighbors who liked the movie (primary rank key)
    like_count: u32,
    /// Sum of those neighbors' similarity to the target (tie-break)
    similarity_sum: f32,
}

/// Generate a ranked candidate list for `target` from its neighborhood.
pub fn generate_candidates(
    matrix: &RatingMatrix,
    target: UserId,
    neighbors: &[Neighbor],
    like_threshold: f32,
    max_recommend: usize,
) -> Vec<MovieId> {
    let seen: HashSet<MovieId> = matrix
        .row(target)
        .map(|row| {
            row.iter()
                .filter(|&(_, &score)| score > 0.0)
                .map(|(&movie_id, _)| movie_id)
                .collect()
        })
        .unwrap_or_default();

    let mut signals: HashMap<MovieId, CandidateSignal> = HashMap::new();
    for neighbor in neighbors {
        let Some(row) = matrix.row(neighbor.user_id) else {
            continue;
        };
        for (&movie_id, &score) in row {
            if score >= like_threshold && !seen.contains(&movie_id) {
                let signal = signals.entry(movie_id).or_default();
                signal.like_count += 1;
                signal.similarity_sum += neighbor.similarity;
            }
        }
    }

    let mut ranked: Vec<(MovieId, CandidateSignal)> = signals.into_iter().collect();
    ranked.sort_unstable_by(|a, b| {
        b.1.like_count
            .cmp(&a.1.like_count)
            .then(b.1.similarity_sum.total_cmp(&a.1.similarity_sum))
            .then(a.0.cmp(&b.0))
    });
    ranked.truncate(max_recommend);

    debug!(
        target,
        neighbors = neighbors.len(),
        candidates = ranked.len(),
        "generated candidate list"
    );

    ranked.into_iter().map(|(movie_id, _)| movie_id).collect()
}
