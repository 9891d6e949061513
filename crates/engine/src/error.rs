//! Error taxonomy for the recommendation engine.
//!
//! Every way a personalized computation can fail maps to one of three
//! variants; the orchestrator recovers all of them into a popularity
//! fallback, so none of these ever reach the external caller as a hard
//! failure.

use store::UserId;
use thiserror::Error;

/// Failure modes of a single recommendation computation
#[derive(Error, Debug)]
pub enum RecommendError {
    /// The global rating snapshot was empty
    #[error("no rating data available")]
    NoRatingData,

    /// The target user has no ratings in the snapshot (cold start)
    #[error("user {0} has no rating history")]
    UnknownUser(UserId),

    /// Numeric or structural failure during matrix/similarity/candidate work
    #[error("recommendation computation failed: {0}")]
    Computation(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RecommendError>;
