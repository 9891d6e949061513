//! Engine configuration.
//!
//! All tuning knobs of the recommendation pipeline live here so callers can
//! set them per deployment instead of relying on hardcoded constants. The
//! defaults reproduce the classical behavior: 5 neighbors, a 3.5 like
//! threshold, at most 10 recommendations.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of neighbors considered per target user
pub const DEFAULT_NEIGHBOR_COUNT: usize = 5;
/// Default minimum score at which a neighbor's rating counts as a like
pub const DEFAULT_LIKE_THRESHOLD: f32 = 3.5;
/// Default maximum length of a recommendation list
pub const DEFAULT_MAX_RECOMMEND: usize = 10;
/// Default bound on the blocking personalization computation
pub const DEFAULT_COMPUTE_TIMEOUT_MS: u64 = 10_000;

/// Tunable parameters of the recommendation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Neighborhood size K
    pub neighbor_count: usize,
    /// Minimum neighbor score treated as an endorsement
    pub like_threshold: f32,
    /// Maximum number of movie ids in any result, fallback included
    pub max_recommend: usize,
    /// Wall-clock bound on the O(U²·M) personalization step; on expiry the
    /// request degrades to the fallback instead of blocking
    pub compute_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            neighbor_count: DEFAULT_NEIGHBOR_COUNT,
            like_threshold: DEFAULT_LIKE_THRESHOLD,
            max_recommend: DEFAULT_MAX_RECOMMEND,
            compute_timeout_ms: DEFAULT_COMPUTE_TIMEOUT_MS,
        }
    }
}

impl EngineConfig {
    /// Configure the neighborhood size (default: 5)
    pub fn with_neighbor_count(mut self, k: usize) -> Self {
        self.neighbor_count = k;
        self
    }

    /// Configure the like threshold (default: 3.5)
    pub fn with_like_threshold(mut self, threshold: f32) -> Self {
        self.like_threshold = threshold;
        self
    }

    /// Configure the result length bound (default: 10)
    pub fn with_max_recommend(mut self, max: usize) -> Self {
        self.max_recommend = max;
        self
    }

    /// Configure the computation timeout in milliseconds (default: 10s)
    pub fn with_compute_timeout_ms(mut self, ms: u64) -> Self {
        self.compute_timeout_ms = ms;
        self
    }

    pub fn compute_timeout(&self) -> Duration {
        Duration::from_millis(self.compute_timeout_ms)
    }
}
