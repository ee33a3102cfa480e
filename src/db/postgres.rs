use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::Store,
    error::AppResult,
    models::{Genre, Movie, MovieRow, RankingCategory, Review},
};

/// Uniform deadline for acquiring a storage connection
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(100);

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// PostgreSQL-backed [`Store`]
///
/// Expected tables (schema is managed out of band):
///
/// ```sql
/// movies   (imdb_id TEXT PRIMARY KEY, title TEXT NOT NULL,
///           genres TEXT[] NOT NULL, admin_review TEXT,
///           ranking_name TEXT, ranking_value INT,
///           created_at TIMESTAMPTZ NOT NULL)
/// rankings (name TEXT PRIMARY KEY, rank INT NOT NULL)
/// genres   (genre_name TEXT PRIMARY KEY)
/// users    (user_id TEXT PRIMARY KEY, favourite_genres TEXT[] NOT NULL)
/// ```
///
/// Queries are runtime-checked so the crate builds without a live
/// database.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MOVIE_COLUMNS: &str =
    "imdb_id, title, genres, admin_review, ranking_name, ranking_value, created_at";

#[async_trait::async_trait]
impl Store for PgStore {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn find_movie(&self, imdb_id: &str) -> AppResult<Option<Movie>> {
        let row = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE imdb_id = $1"
        ))
        .bind(imdb_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Movie::from))
    }

    async fn movie_exists(&self, imdb_id: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies WHERE imdb_id = $1")
            .bind(imdb_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    async fn insert_movie(&self, movie: &Movie) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO movies (imdb_id, title, genres, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&movie.imdb_id)
        .bind(&movie.title)
        .bind(&movie.genres)
        .bind(movie.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_movie_review(&self, imdb_id: &str, review: &Review) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE movies SET admin_review = $2, ranking_name = $3, ranking_value = $4 \
             WHERE imdb_id = $1",
        )
        .bind(imdb_id)
        .bind(&review.text)
        .bind(&review.category)
        .bind(review.rank)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_rankings(&self) -> AppResult<Vec<RankingCategory>> {
        let rankings =
            sqlx::query_as::<_, RankingCategory>("SELECT name, rank FROM rankings ORDER BY rank")
                .fetch_all(&self.pool)
                .await?;

        Ok(rankings)
    }

    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let genres =
            sqlx::query_as::<_, Genre>("SELECT genre_name FROM genres ORDER BY genre_name")
                .fetch_all(&self.pool)
                .await?;

        Ok(genres)
    }

    async fn favorite_genres(&self, user_id: &str) -> AppResult<Option<Vec<String>>> {
        let genres: Option<Vec<String>> =
            sqlx::query_scalar("SELECT favourite_genres FROM users WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(genres)
    }

    async fn movies_by_genres(&self, genres: &[String]) -> AppResult<Vec<Movie>> {
        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE genres && $1"
        ))
        .bind(genres.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }
}
