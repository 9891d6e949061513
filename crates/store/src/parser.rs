//! CSV loader for offline rating/catalog datasets.
//!
//! Two files are understood:
//! - `ratings.csv`: `user_id,movie_id,score` (header row optional)
//! - `movies.csv`:  `movie_id,title` (optional file, header row optional)
//!
//! Titles may themselves contain commas, so the movies file is split on the
//! first comma only.

use crate::error::{Result, StoreError};
use crate::types::{MovieId, Rating, RatingStore, UserId};
use std::fs;
use std::path::Path;

/// Name of the ratings file inside a dataset directory
pub const RATINGS_FILE: &str = "ratings.csv";
/// Name of the (optional) movie catalog file inside a dataset directory
pub const MOVIES_FILE: &str = "movies.csv";

fn parse_error(file: &str, line: usize, reason: impl Into<String>) -> StoreError {
    StoreError::ParseError {
        file: file.to_string(),
        line,
        reason: reason.into(),
    }
}

/// File name to report in errors. Callers pass arbitrary paths, so errors
/// name the file actually read, not the conventional dataset names.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// True for a leading header row like `user_id,movie_id,score`
fn is_header(line: &str) -> bool {
    line.split(',')
        .next()
        .is_some_and(|first| first.trim().parse::<u32>().is_err())
}

/// Parse a ratings file into a flat rating list.
///
/// Scores outside the 1.0-5.0 scale are rejected: a malformed dump should
/// fail loudly at load time, not skew similarities at request time.
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    let content = fs::read_to_string(path)?;
    let file = display_name(path);
    let mut ratings = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if idx == 0 && is_header(line) {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 3 {
            return Err(parse_error(
                &file,
                line_no,
                format!("expected 3 fields, found {}", fields.len()),
            ));
        }

        let user_id: UserId = fields[0]
            .trim()
            .parse()
            .map_err(|_| parse_error(&file, line_no, "invalid user_id"))?;
        let movie_id: MovieId = fields[1]
            .trim()
            .parse()
            .map_err(|_| parse_error(&file, line_no, "invalid movie_id"))?;
        let score: f32 = fields[2]
            .trim()
            .parse()
            .map_err(|_| parse_error(&file, line_no, "invalid score"))?;

        if !(1.0..=5.0).contains(&score) {
            return Err(StoreError::InvalidValue {
                file: file.clone(),
                line: line_no,
                field: "score".to_string(),
                value: fields[2].trim().to_string(),
            });
        }

        ratings.push(Rating::new(user_id, movie_id, score));
    }

    Ok(ratings)
}

/// Parse a movie catalog file into (id, title) pairs.
pub fn parse_movies(path: &Path) -> Result<Vec<(MovieId, String)>> {
    let content = fs::read_to_string(path)?;
    let file = display_name(path);
    let mut movies = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if idx == 0 && is_header(line) {
            continue;
        }

        let (id_field, title) = line
            .split_once(',')
            .ok_or_else(|| parse_error(&file, line_no, "expected 2 fields, found 1"))?;

        let movie_id: MovieId = id_field
            .trim()
            .parse()
            .map_err(|_| parse_error(&file, line_no, "invalid movie_id"))?;
        let title = title.trim();
        if title.is_empty() {
            return Err(parse_error(&file, line_no, "empty title"));
        }

        movies.push((movie_id, title.to_string()));
    }

    Ok(movies)
}

impl RatingStore {
    /// Load a dataset directory into a fresh store.
    ///
    /// `ratings.csv` is required; `movies.csv` is optional (recommendations
    /// are id-based, titles only matter for display). The two files are
    /// parsed in parallel.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        let ratings_path = data_dir.join(RATINGS_FILE);
        let movies_path = data_dir.join(MOVIES_FILE);

        let (ratings, movies) = rayon::join(
            || parse_ratings(&ratings_path),
            || {
                if movies_path.exists() {
                    parse_movies(&movies_path)
                } else {
                    Ok(Vec::new())
                }
            },
        );
        let ratings = ratings?;
        let movies = movies?;

        let mut store = RatingStore::new();
        for (movie_id, title) in movies {
            store.insert_movie(movie_id, title);
        }
        for rating in ratings {
            store.insert_rating(rating);
        }

        Ok(store)
    }
}
