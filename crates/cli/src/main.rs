use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use service::{EngineConfig, Outcome, RecommendationResult, RecommendationService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use store::{MovieDetailProvider, PopularityProvider, RatingStore, UserId};

/// CineRecs - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "cine-recs")]
#[command(about = "Movie recommendations via user-based collaborative filtering", long_about = None)]
struct Cli {
    /// Path to the dataset directory (ratings.csv, optional movies.csv)
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Number of neighbors to consider
        #[arg(long, default_value = "5")]
        neighbors: usize,

        /// Minimum neighbor score treated as a like
        #[arg(long, default_value = "3.5")]
        like_threshold: f32,

        /// Maximum number of recommendations to return
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Emit the raw result as JSON instead of a formatted list
        #[arg(long)]
        json: bool,
    },

    /// Show a user's rating history
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// List the most-rated movies
    Popular {
        /// Number of movies to list
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let store = Arc::new(
        RatingStore::load_from_files(&cli.data_dir).context("Failed to load dataset")?,
    );
    let (movies, users, ratings) = store.counts();
    println!(
        "{} Loaded {} movies, {} users, {} ratings in {:?}",
        "✓".green(),
        movies,
        users,
        ratings,
        start.elapsed()
    );

    match cli.command {
        Commands::Recommend {
            user_id,
            neighbors,
            like_threshold,
            limit,
            json,
        } => {
            let config = EngineConfig::default()
                .with_neighbor_count(neighbors)
                .with_like_threshold(like_threshold)
                .with_max_recommend(limit);
            handle_recommend(store, user_id, config, json).await?
        }
        Commands::User { user_id } => handle_user(store, user_id),
        Commands::Popular { limit } => handle_popular(store, limit),
        Commands::Benchmark { requests } => handle_benchmark(store, requests).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    store: Arc<RatingStore>,
    user_id: UserId,
    config: EngineConfig,
    json: bool,
) -> Result<()> {
    let service = RecommendationService::new(store.clone(), store.clone(), config);
    let result = service.get_recommendations(user_id).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_result(&store, user_id, &result);
    Ok(())
}

fn print_result(store: &RatingStore, user_id: UserId, result: &RecommendationResult) {
    match result.outcome {
        Outcome::Personalized => {
            println!(
                "{}",
                format!("Recommendations for user {}:", user_id).bold().blue()
            );
        }
        Outcome::FallbackNoData => {
            println!(
                "{}",
                "No ratings yet; showing popular movies instead.".yellow()
            );
        }
        Outcome::FallbackNoHistory => {
            println!(
                "{}",
                format!(
                    "User {} has no rating history; showing popular movies instead.",
                    user_id
                )
                .yellow()
            );
        }
        Outcome::FallbackError => {
            println!(
                "{}",
                "Recommendation service degraded; showing popular movies instead.".red()
            );
        }
    }

    if result.movie_ids.is_empty() {
        println!("  (nothing to recommend)");
        return;
    }

    let details = store.fetch_details(&result.movie_ids);
    for (rank, movie_id) in result.movie_ids.iter().enumerate() {
        let summary = &details[movie_id];
        println!(
            "{}. {} (avg {:.1}, {} ratings)",
            (rank + 1).to_string().green(),
            summary.title,
            summary.avg_score,
            summary.rating_count
        );
    }
}

/// Handle the 'user' command
fn handle_user(store: Arc<RatingStore>, user_id: UserId) {
    let ratings = store.user_ratings(user_id);
    if ratings.is_empty() {
        println!("{}", format!("User {} has no ratings.", user_id).yellow());
        return;
    }

    let avg: f32 = ratings.iter().map(|r| r.score).sum::<f32>() / ratings.len() as f32;
    println!("{}", format!("User {}", user_id).bold().blue());
    println!("{}Ratings: {}", "• ".green(), ratings.len());
    println!("{}Average score: {:.2}", "• ".green(), avg);

    let mut by_score: Vec<_> = ratings.iter().collect();
    by_score.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.movie_id.cmp(&b.movie_id)));
    println!("Rated movies:");
    for rating in by_score {
        let title = store.title(rating.movie_id).unwrap_or("(unknown title)");
        println!("  {:.1}  {} (id {})", rating.score, title, rating.movie_id);
    }
}

/// Handle the 'popular' command
fn handle_popular(store: Arc<RatingStore>, limit: usize) {
    let top = store.top_by_rating_count(limit);
    if top.is_empty() {
        println!("No ratings in the dataset.");
        return;
    }

    println!("{}", "Most-rated movies:".bold().blue());
    let details = store.fetch_details(&top);
    for (rank, movie_id) in top.iter().enumerate() {
        let summary = &details[movie_id];
        println!(
            "{}. {} ({} ratings, avg {:.1})",
            (rank + 1).to_string().green(),
            summary.title,
            summary.rating_count,
            summary.avg_score
        );
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(store: Arc<RatingStore>, requests: usize) -> Result<()> {
    let user_ids = store.user_ids();
    if user_ids.is_empty() {
        println!("No users to benchmark against.");
        return Ok(());
    }

    let service = RecommendationService::new(store.clone(), store.clone(), EngineConfig::default());

    // Sample targets from the real user universe
    let targets: Vec<UserId> = (0..requests)
        .map(|_| user_ids[rand::random::<u32>() as usize % user_ids.len()])
        .collect();

    let mut handles = vec![];
    let wall_start = Instant::now();
    for user_id in targets {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let start = Instant::now();
            service.get_recommendations(user_id).await;
            start.elapsed()
        }));
    }

    let mut timings = vec![];
    for handle in handles {
        timings.push(handle.await?);
    }

    timings.sort();
    let total: std::time::Duration = timings.iter().sum();
    let avg = total / timings.len() as u32;
    let p50 = timings[timings.len() / 2];
    let p95 = timings[(timings.len() as f32 * 0.95) as usize];
    let p99 = timings[(timings.len() as f32 * 0.99) as usize];
    let throughput = requests as f32 / wall_start.elapsed().as_secs_f32();

    println!("Benchmark results:");
    println!("Requests: {}", requests);
    println!("Average latency: {:?}", avg);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}
