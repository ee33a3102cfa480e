use std::sync::Arc;

use crate::{
    db::Store,
    error::AppResult,
    models::RankingCategory,
};

/// Read access to the closed set of sentiment categories.
///
/// Categories are fetched fresh from storage on every call. The set is
/// small and administratively mutable, and reading it per classification
/// keeps the classifier's output contract valid against current catalog
/// state; this is an explicit no-cache policy.
#[derive(Clone)]
pub struct RankingCatalog {
    store: Arc<dyn Store>,
}

impl RankingCatalog {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// All sentiment categories in listing order
    pub async fn list_categories(&self) -> AppResult<Vec<RankingCategory>> {
        self.store.list_rankings().await
    }
}

/// Comma-joined category names offered to the classifier.
///
/// The sentinel "unrated" category is always excluded: it marks movies
/// that have not been reviewed yet and must never be a classification
/// outcome.
pub fn prompt_vocabulary(categories: &[RankingCategory]) -> String {
    categories
        .iter()
        .filter(|category| !category.is_sentinel())
        .map(|category| category.name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
