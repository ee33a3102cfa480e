//! Storage collaborator abstraction
//!
//! All persistence goes through the [`Store`] trait so handlers and
//! services stay decoupled from the concrete backend and tests can
//! substitute a fake. Implementations must not retry failed operations;
//! storage errors propagate to the caller unchanged.

use crate::{
    error::AppResult,
    models::{Genre, Movie, RankingCategory, Review},
};

pub mod postgres;

pub use postgres::{create_pool, PgStore};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// All movies in the catalog
    async fn list_movies(&self) -> AppResult<Vec<Movie>>;

    /// A single movie by its external id
    async fn find_movie(&self, imdb_id: &str) -> AppResult<Option<Movie>>;

    /// Whether a movie with this external id already exists
    async fn movie_exists(&self, imdb_id: &str) -> AppResult<bool>;

    /// Insert a new movie record
    async fn insert_movie(&self, movie: &Movie) -> AppResult<()>;

    /// Conditionally set review text, category, and rank on one movie.
    ///
    /// All three fields are written in a single update. Returns the
    /// matched count so callers can distinguish "not found" from
    /// "found and updated".
    async fn update_movie_review(&self, imdb_id: &str, review: &Review) -> AppResult<u64>;

    /// All sentiment categories, in listing order
    async fn list_rankings(&self) -> AppResult<Vec<RankingCategory>>;

    /// All catalog genres
    async fn list_genres(&self) -> AppResult<Vec<Genre>>;

    /// A user's favorite genre names; `None` when the user is unknown
    async fn favorite_genres(&self, user_id: &str) -> AppResult<Option<Vec<String>>>;

    /// Movies whose genre set intersects the given genres (OR semantics)
    async fn movies_by_genres(&self, genres: &[String]) -> AppResult<Vec<Movie>>;
}
