//! Service crate for the CineRecs recommendation engine.
//!
//! Hosts the orchestrator that sequences the engine stages over one rating
//! snapshot, decides between the personalized and fallback paths, and owns
//! the engine configuration.

pub mod config;
pub mod recommender;

pub use config::EngineConfig;
pub use recommender::{Outcome, RecommendationResult, RecommendationService};
