//! # Recommendation Service
//!
//! Orchestrates the recommendation pipeline over one rating snapshot:
//! 1. Fetch the snapshot (single consistent read)
//! 2. Empty snapshot → popularity fallback (`fallback_no_data`)
//! 3. Build the rating matrix and its universes
//! 4. Target outside the universe → fallback (`fallback_no_history`)
//! 5. Compute pairwise similarity, select neighbors, generate candidates
//! 6. Return the candidate list as `personalized` (possibly empty)
//!
//! Any failure along the way — snapshot fetch error, engine failure, panic
//! in the blocking task, timeout — degrades to the popularity fallback with
//! outcome `fallback_error`. The public entry point never returns an error:
//! callers always get a result plus an outcome explaining any degradation.
//!
//! The matrix/similarity work is CPU-bound and runs on the blocking pool
//! under a timeout; concurrent requests are safe because each call owns the
//! structures built from its own snapshot.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use engine::{
    FallbackPolicy, FallbackReason, RatingMatrix, RecommendError, SimilarityMatrix,
    generate_candidates, select_neighbors,
};
use store::{MovieId, PopularityProvider, Rating, RatingSnapshotSource, UserId};

use crate::config::EngineConfig;

/// How a recommendation result was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Collaborative filtering ran to completion for the target user
    Personalized,
    /// The rating snapshot was empty
    FallbackNoData,
    /// The target user has no rating history (cold start)
    FallbackNoHistory,
    /// Personalization failed or timed out
    FallbackError,
}

/// Final result of one recommendation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub outcome: Outcome,
    /// At most `max_recommend` ids, in recommendation order
    pub movie_ids: Vec<MovieId>,
}

/// Main orchestrator: turns a rating snapshot into a recommendation list.
#[derive(Clone)]
pub struct RecommendationService {
    snapshot_source: Arc<dyn RatingSnapshotSource>,
    fallback: FallbackPolicy,
    config: EngineConfig,
}

impl RecommendationService {
    pub fn new(
        snapshot_source: Arc<dyn RatingSnapshotSource>,
        popularity: Arc<dyn PopularityProvider>,
        config: EngineConfig,
    ) -> Self {
        Self {
            snapshot_source,
            fallback: FallbackPolicy::new(popularity),
            config,
        }
    }

    /// Get recommendations for a user.
    ///
    /// Infallible by contract: every internal failure is absorbed into a
    /// fallback result. No retries either — the computation is deterministic
    /// for a fixed snapshot, so retrying without new data cannot help.
    pub async fn get_recommendations(&self, user_id: UserId) -> RecommendationResult {
        let start = Instant::now();

        let snapshot = match self.snapshot_source.fetch_all_ratings() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(user_id, error = %err, "rating snapshot fetch failed");
                return self.fallback_result(Outcome::FallbackError, FallbackReason::ComputationFailure);
            }
        };

        if snapshot.is_empty() {
            return self.fallback_result(Outcome::FallbackNoData, FallbackReason::NoRatingData);
        }

        info!(user_id, ratings = snapshot.len(), "personalizing from snapshot");

        let config = self.config.clone();
        let timeout = config.compute_timeout();
        let task = tokio::task::spawn_blocking(move || personalize(&snapshot, user_id, &config));

        let result = match tokio::time::timeout(timeout, task).await {
            Ok(Ok(Ok(movie_ids))) => RecommendationResult {
                outcome: Outcome::Personalized,
                movie_ids,
            },
            Ok(Ok(Err(RecommendError::NoRatingData))) => {
                self.fallback_result(Outcome::FallbackNoData, FallbackReason::NoRatingData)
            }
            Ok(Ok(Err(RecommendError::UnknownUser(_)))) => {
                self.fallback_result(Outcome::FallbackNoHistory, FallbackReason::NoUserHistory)
            }
            Ok(Ok(Err(err))) => {
                warn!(user_id, error = %err, "personalization failed");
                self.fallback_result(Outcome::FallbackError, FallbackReason::ComputationFailure)
            }
            Ok(Err(join_err)) => {
                warn!(user_id, error = %join_err, "personalization task panicked");
                self.fallback_result(Outcome::FallbackError, FallbackReason::ComputationFailure)
            }
            Err(_) => {
                warn!(user_id, ?timeout, "personalization timed out");
                self.fallback_result(Outcome::FallbackError, FallbackReason::ComputationFailure)
            }
        };

        info!(
            user_id,
            outcome = ?result.outcome,
            count = result.movie_ids.len(),
            elapsed = ?start.elapsed(),
            "recommendation request complete"
        );
        result
    }

    fn fallback_result(&self, outcome: Outcome, reason: FallbackReason) -> RecommendationResult {
        RecommendationResult {
            outcome,
            movie_ids: self.fallback.top_movies(reason, self.config.max_recommend),
        }
    }
}

/// The personalized path: matrix → similarity → neighbors → candidates.
///
/// Pure and synchronous; the caller decides where it runs and for how long.
fn personalize(
    snapshot: &[Rating],
    target: UserId,
    config: &EngineConfig,
) -> engine::error::Result<Vec<MovieId>> {
    let matrix = RatingMatrix::from_ratings(snapshot);
    if matrix.is_empty() {
        // Guarded upstream; kept as a state-machine invariant check
        return Err(RecommendError::NoRatingData);
    }
    if !matrix.contains_user(target) {
        return Err(RecommendError::UnknownUser(target));
    }

    let similarity = SimilarityMatrix::compute(&matrix);
    let neighbors = select_neighbors(&similarity, target, config.neighbor_count)?;

    Ok(generate_candidates(
        &matrix,
        target,
        &neighbors,
        config.like_threshold,
        config.max_recommend,
    ))
}
