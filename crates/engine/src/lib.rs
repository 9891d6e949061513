//! # Engine Crate
//!
//! Neighborhood-based collaborative filtering core for CineRecs.
//!
//! ## Pipeline
//!
//! Data flows one way through four pure stages, plus a fallback:
//!
//! 1. **matrix**: rating snapshot → user-by-movie [`RatingMatrix`]
//! 2. **similarity**: matrix → symmetric cosine [`SimilarityMatrix`]
//! 3. **neighbors**: similarity + target → top-K [`Neighbor`] list
//! 4. **candidates**: neighbor-liked, target-unseen movies, deterministically
//!    ranked and truncated
//! 5. **fallback**: popularity list for cold-start and error conditions
//!
//! The `service` crate owns sequencing and the fallback decision; everything
//! here is a pure function of its inputs, built per request and dropped
//! afterwards. There is no trained model and no state between calls.
//!
//! ## Example Usage
//!
//! ```ignore
//! use engine::{RatingMatrix, SimilarityMatrix, select_neighbors, generate_candidates};
//!
//! let matrix = RatingMatrix::from_ratings(&snapshot);
//! let similarity = SimilarityMatrix::compute(&matrix);
//! let neighbors = select_neighbors(&similarity, target, 5)?;
//! let movie_ids = generate_candidates(&matrix, target, &neighbors, 3.5, 10);
//! ```

// Public modules
pub mod error;
pub mod matrix;
pub mod similarity;
pub mod neighbors;
pub mod candidates;
pub mod fallback;

// Re-export commonly used items
pub use candidates::generate_candidates;
pub use error::RecommendError;
pub use fallback::{FallbackPolicy, FallbackReason};
pub use matrix::RatingMatrix;
pub use neighbors::{Neighbor, select_neighbors};
pub use similarity::SimilarityMatrix;
