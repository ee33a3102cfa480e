use std::sync::Arc;

use crate::{db::Store, error::AppResult, models::Movie};

/// Builds a bounded, rank-ordered recommendation list for a user.
///
/// Pure read/filter/sort/limit pipeline: movies qualify when their genre
/// set intersects the user's favorite genres (matching any one favorite
/// is enough), ordered by ascending rank with unreviewed movies last.
#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<dyn Store>,
}

impl RecommendationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Recommended movies for `user_id`, at most `limit` entries.
    ///
    /// An unknown user degrades to an empty list rather than an error, as
    /// does a user with no favorite genres.
    pub async fn recommend(&self, user_id: &str, limit: usize) -> AppResult<Vec<Movie>> {
        let favorites = match self.store.favorite_genres(user_id).await? {
            Some(genres) => genres,
            None => {
                tracing::debug!(user_id = %user_id, "Unknown user, no recommendations");
                return Ok(Vec::new());
            }
        };

        if favorites.is_empty() {
            return Ok(Vec::new());
        }

        let mut movies = self.store.movies_by_genres(&favorites).await?;

        // Stable sort keeps listing order for equal ranks
        movies.sort_by_key(|movie| movie.effective_rank());
        movies.truncate(limit);

        tracing::info!(
            user_id = %user_id,
            count = movies.len(),
            "Recommendations built"
        );

        Ok(movies)
    }
}
