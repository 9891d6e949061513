//! Neighborhood selection.
//!
//! Picks the K users most similar to a target. Similarity ties are common in
//! sparse data and the neighbor order feeds straight into candidate ranking,
//! so the order must be fully deterministic: similarity descending, then
//! user id ascending.

use crate::error::{RecommendError, Result};
use crate::similarity::SimilarityMatrix;
use serde::Serialize;
use store::UserId;
use tracing::debug;

/// One selected neighbor with its similarity to the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub user_id: UserId,
    pub similarity: f32,
}

/// Select the top-K neighbors of `target`.
///
/// The target itself is excluded. Fewer than K neighbors are returned when
/// fewer other users exist. A target outside the universe is a cold start,
/// surfaced as [`RecommendError::UnknownUser`] for the orchestrator to turn
/// into its fallback path; it is not recoverable here.
pub fn select_neighbors(
    similarity: &SimilarityMatrix,
    target: UserId,
    k: usize,
) -> Result<Vec<Neighbor>> {
    if !similarity.contains(target) {
        return Err(RecommendError::UnknownUser(target));
    }

    let mut neighbors: Vec<Neighbor> = similarity
        .users()
        .iter()
        .filter(|&&user_id| user_id != target)
        .map(|&user_id| Neighbor {
            user_id,
            similarity: similarity.similarity(target, user_id),
        })
        .collect();

    // Similarity DESC, user id ASC on ties. total_cmp keeps the sort total
    // even if a NaN ever slipped through.
    neighbors.sort_unstable_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then(a.user_id.cmp(&b.user_id))
    });
    neighbors.truncate(k);

    debug!(target, k, selected = neighbors.len(), "selected neighborhood");
    Ok(neighbors)
}
