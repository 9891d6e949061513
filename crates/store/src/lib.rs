//! # Store Crate
//!
//! Data layer for the CineRecs recommendation engine.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Rating, MovieSummary, RatingStore)
//! - **traits**: The collaborator interfaces the engine consumes
//!   (snapshot source, popularity provider, detail provider)
//! - **parser**: Load CSV dataset dumps into a RatingStore
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use store::{RatingStore, RatingSnapshotSource};
//! use std::path::Path;
//!
//! let store = RatingStore::load_from_files(Path::new("data"))?;
//! let snapshot = store.fetch_all_ratings()?;
//! println!("{} ratings in snapshot", snapshot.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod traits;
pub mod parser;

// Re-export commonly used types for convenience
pub use error::{Result, StoreError};
pub use traits::{MovieDetailProvider, PopularityProvider, RatingSnapshotSource};
pub use types::{MovieId, MovieSummary, Rating, RatingStore, UserId};
