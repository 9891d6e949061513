//! End-to-end tests for the recommendation flow.
//!
//! These run the real store against the real engine through the service, the
//! same wiring the CLI uses, and pin down the externally observable
//! contract: outcomes, exclusions, bounds, and determinism.

use service::{EngineConfig, Outcome, RecommendationService};
use std::sync::Arc;
use store::{PopularityProvider, Rating, RatingStore};

fn seeded_store() -> RatingStore {
    let mut store = RatingStore::new();
    store.insert_movie(10, "Heat");
    store.insert_movie(11, "Alien");
    store.insert_movie(12, "Ronin");

    store.insert_rating(Rating::new(1, 10, 5.0));
    store.insert_rating(Rating::new(1, 11, 4.0));
    store.insert_rating(Rating::new(2, 10, 5.0));
    store.insert_rating(Rating::new(2, 12, 5.0));
    store.insert_rating(Rating::new(3, 11, 5.0));
    store
}

fn service_over(store: RatingStore, config: EngineConfig) -> RecommendationService {
    let store = Arc::new(store);
    RecommendationService::new(store.clone(), store, config)
}

#[tokio::test]
async fn personalized_path_excludes_rated_movies() {
    let service = service_over(seeded_store(), EngineConfig::default());
    let result = service.get_recommendations(1).await;

    assert_eq!(result.outcome, Outcome::Personalized);
    assert!(result.movie_ids.contains(&12));
    assert!(!result.movie_ids.contains(&10));
    assert!(!result.movie_ids.contains(&11));
    assert!(result.movie_ids.len() <= 10);
}

#[tokio::test]
async fn empty_store_falls_back_to_popularity_ranking() {
    let store = RatingStore::new();
    let service = service_over(store, EngineConfig::default());

    let result = service.get_recommendations(42).await;
    assert_eq!(result.outcome, Outcome::FallbackNoData);
    // Equal to the provider's own ranking at the same limit
    assert_eq!(result.movie_ids, RatingStore::new().top_by_rating_count(10));
}

#[tokio::test]
async fn fallback_list_matches_popularity_provider() {
    // Ratings only from users 2 and 3; user 99 is unknown
    let mut store = RatingStore::new();
    store.insert_rating(Rating::new(2, 10, 5.0));
    store.insert_rating(Rating::new(2, 11, 4.0));
    store.insert_rating(Rating::new(3, 10, 3.0));

    let expected = store.top_by_rating_count(10);
    assert_eq!(expected, vec![10, 11]);

    let service = service_over(store, EngineConfig::default());
    let result = service.get_recommendations(99).await;

    assert_eq!(result.outcome, Outcome::FallbackNoHistory);
    assert_eq!(result.movie_ids, expected);
}

#[tokio::test]
async fn fallback_respects_max_recommend() {
    let mut store = RatingStore::new();
    // 15 movies, one rating each, from a single user
    for movie_id in 1..=15 {
        store.insert_rating(Rating::new(7, movie_id, 5.0));
    }

    let config = EngineConfig::default().with_max_recommend(5);
    let service = service_over(store, config);
    let result = service.get_recommendations(99).await;

    assert_eq!(result.outcome, Outcome::FallbackNoHistory);
    // All counts tie at 1, so the lowest movie ids win
    assert_eq!(result.movie_ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn repeated_calls_are_bit_identical() {
    // Sparse data with plenty of similarity and candidate ties
    let mut store = RatingStore::new();
    store.insert_rating(Rating::new(1, 10, 4.0));
    store.insert_rating(Rating::new(2, 10, 4.0));
    store.insert_rating(Rating::new(3, 10, 4.0));
    store.insert_rating(Rating::new(4, 10, 4.0));
    store.insert_rating(Rating::new(2, 20, 5.0));
    store.insert_rating(Rating::new(3, 21, 5.0));
    store.insert_rating(Rating::new(4, 22, 5.0));

    let service = service_over(store, EngineConfig::default());
    let first = service.get_recommendations(1).await;
    assert_eq!(first.outcome, Outcome::Personalized);

    for _ in 0..20 {
        assert_eq!(service.get_recommendations(1).await, first);
    }
}

#[tokio::test]
async fn duplicate_ratings_resolve_last_seen_wins() {
    let mut store = RatingStore::new();
    // User 1 re-rates movie 10 downward; last rating (2.0) is the one that
    // counts for similarity, but the movie stays "seen" either way
    store.insert_rating(Rating::new(1, 10, 5.0));
    store.insert_rating(Rating::new(1, 10, 2.0));
    store.insert_rating(Rating::new(2, 10, 2.0));
    store.insert_rating(Rating::new(2, 30, 5.0));

    let service = service_over(store, EngineConfig::default());
    let result = service.get_recommendations(1).await;

    assert_eq!(result.outcome, Outcome::Personalized);
    assert_eq!(result.movie_ids, vec![30]);
}
