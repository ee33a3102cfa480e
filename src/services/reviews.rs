use std::sync::Arc;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::Review,
    services::review_ranking::ReviewRankingService,
};

/// Applies a classified admin review to a movie record.
///
/// The correctness guarantee here is classify-then-write-both-or-nothing:
/// review text, category, and rank land in one conditional update, and a
/// failed ranking leaves the movie untouched. Concurrent updates to the
/// same movie are not serialized; the storage layer's last write wins.
#[derive(Clone)]
pub struct ReviewUpdateService {
    store: Arc<dyn Store>,
    ranking: ReviewRankingService,
}

impl ReviewUpdateService {
    pub fn new(store: Arc<dyn Store>, ranking: ReviewRankingService) -> Self {
        Self { store, ranking }
    }

    /// Classifies `review_text` and persists the resulting review on the
    /// movie identified by `imdb_id`. Returns the resolved category and
    /// rank for display.
    pub async fn update_review(
        &self,
        imdb_id: &str,
        review_text: &str,
    ) -> AppResult<(String, i32)> {
        if imdb_id.trim().is_empty() {
            return Err(AppError::InvalidInput("Movie Id required".to_string()));
        }

        let (category, rank) = self.ranking.rank(review_text).await?;

        let review = Review {
            text: review_text.to_string(),
            category: category.clone(),
            rank,
        };

        let matched = self.store.update_movie_review(imdb_id, &review).await?;

        if matched == 0 {
            return Err(AppError::NotFound("Movie not found".to_string()));
        }

        tracing::info!(
            imdb_id = %imdb_id,
            category = %category,
            rank,
            "Review updated"
        );

        Ok((category, rank))
    }
}
