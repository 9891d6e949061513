//! Benchmarks for the similarity hot loop
//!
//! Run with: cargo bench --package engine
//!
//! Pairwise cosine similarity is O(U² · M) and dominates the cost of a
//! recommendation request, so it gets the benchmark coverage. The snapshot
//! is synthetic but deterministic (small LCG), so runs are comparable.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use engine::{RatingMatrix, SimilarityMatrix, generate_candidates, select_neighbors};
use store::Rating;

/// Deterministic synthetic snapshot: `users` users rating `per_user` movies
/// each out of a catalog of `movies`.
fn synthetic_ratings(users: u32, movies: u32, per_user: u32) -> Vec<Rating> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as u32
    };

    let mut ratings = Vec::with_capacity((users * per_user) as usize);
    for user_id in 1..=users {
        for _ in 0..per_user {
            let movie_id = next() % movies + 1;
            let score = (next() % 9) as f32 * 0.5 + 1.0; // 1.0..=5.0 in half steps
            ratings.push(Rating::new(user_id, movie_id, score));
        }
    }
    ratings
}

fn bench_similarity_compute(c: &mut Criterion) {
    let ratings = synthetic_ratings(500, 2000, 40);
    let matrix = RatingMatrix::from_ratings(&ratings);

    c.bench_function("similarity_compute_500_users", |b| {
        b.iter(|| {
            let sim = SimilarityMatrix::compute(black_box(&matrix));
            black_box(sim)
        })
    });
}

fn bench_matrix_build(c: &mut Criterion) {
    let ratings = synthetic_ratings(500, 2000, 40);

    c.bench_function("matrix_from_ratings", |b| {
        b.iter(|| {
            let matrix = RatingMatrix::from_ratings(black_box(&ratings));
            black_box(matrix)
        })
    });
}

fn bench_full_personalization(c: &mut Criterion) {
    let ratings = synthetic_ratings(300, 1500, 40);

    c.bench_function("personalize_end_to_end", |b| {
        b.iter(|| {
            let matrix = RatingMatrix::from_ratings(black_box(&ratings));
            let sim = SimilarityMatrix::compute(&matrix);
            let neighbors = select_neighbors(&sim, black_box(1), 5).unwrap();
            let movie_ids = generate_candidates(&matrix, 1, &neighbors, 3.5, 10);
            black_box(movie_ids)
        })
    });
}

criterion_group!(
    benches,
    bench_matrix_build,
    bench_similarity_compute,
    bench_full_personalization
);
criterion_main!(benches);
