use std::sync::Arc;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    services::classifier::Classifier,
    services::rankings::{prompt_vocabulary, RankingCatalog},
};

/// How classifier labels are compared against category names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelMatch {
    /// Verbatim string equality. Compatible with data persisted under the
    /// original semantics, but any extra whitespace, casing, or
    /// explanation text in the backend's response matches nothing.
    #[default]
    Exact,
    /// Trimmed, ASCII case-insensitive comparison.
    Normalized,
}

impl LabelMatch {
    fn matches(self, category_name: &str, label: &str) -> bool {
        match self {
            LabelMatch::Exact => category_name == label,
            LabelMatch::Normalized => category_name.trim().eq_ignore_ascii_case(label.trim()),
        }
    }
}

/// Turns free-text review content into a `(category, rank)` pair.
///
/// Orchestrates the classification pipeline: fetch the current category
/// set, build the vocabulary, call the classifier, and resolve the
/// returned label to a rank. Read-only apart from the classifier call.
#[derive(Clone)]
pub struct ReviewRankingService {
    catalog: RankingCatalog,
    classifier: Arc<dyn Classifier>,
    prompt_template: String,
    label_match: LabelMatch,
}

impl ReviewRankingService {
    pub fn new(
        store: Arc<dyn Store>,
        classifier: Arc<dyn Classifier>,
        prompt_template: String,
    ) -> Self {
        Self {
            catalog: RankingCatalog::new(store),
            classifier,
            prompt_template,
            label_match: LabelMatch::default(),
        }
    }

    pub fn with_label_match(mut self, label_match: LabelMatch) -> Self {
        self.label_match = label_match;
        self
    }

    /// Classifies `review_text` and resolves the result to a rank.
    ///
    /// Returns the classifier's raw label together with the rank of the
    /// first category it matches in listing order. A label matching no
    /// category is passed through with rank 0, never raised as an error;
    /// that fallback value collides with a legitimate rank of 0.
    pub async fn rank(&self, review_text: &str) -> AppResult<(String, i32)> {
        let categories = self.catalog.list_categories().await?;
        let vocabulary = prompt_vocabulary(&categories);

        if self.prompt_template.trim().is_empty() {
            return Err(AppError::Configuration(
                "missing base prompt template".to_string(),
            ));
        }

        let label = self
            .classifier
            .classify(&self.prompt_template, &vocabulary, review_text)
            .await?;

        let rank = match categories
            .iter()
            .find(|category| self.label_match.matches(&category.name, &label))
        {
            Some(category) => category.rank,
            None => {
                tracing::warn!(
                    label = %label,
                    "Classifier label matched no ranking category, defaulting rank to 0"
                );
                0
            }
        };

        tracing::info!(label = %label, rank, "Review ranked");

        Ok((label, rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockStore;
    use crate::models::{RankingCategory, UNRATED_RANK};
    use crate::services::classifier::MockClassifier;

    const TEMPLATE: &str = "Classify the review into one of: {rankings}. Review: ";

    fn category(name: &str, rank: i32) -> RankingCategory {
        RankingCategory {
            name: name.to_string(),
            rank,
        }
    }

    fn store_with_categories(categories: Vec<RankingCategory>) -> MockStore {
        let mut store = MockStore::new();
        store
            .expect_list_rankings()
            .returning(move || Ok(categories.clone()));
        store
    }

    fn service_with(
        store: MockStore,
        classifier: MockClassifier,
        template: &str,
    ) -> ReviewRankingService {
        ReviewRankingService::new(Arc::new(store), Arc::new(classifier), template.to_string())
    }

    #[tokio::test]
    async fn test_rank_resolves_matching_label() {
        let store = store_with_categories(vec![
            category("A", 1),
            category("B", 2),
            category("Unrated", UNRATED_RANK),
        ]);

        let mut classifier = MockClassifier::new();
        classifier
            .expect_classify()
            .times(1)
            .returning(|_, _, _| Ok("A".to_string()));

        let service = service_with(store, classifier, TEMPLATE);
        let (label, rank) = service.rank("good movie").await.unwrap();

        assert_eq!(label, "A");
        assert_eq!(rank, 1);
    }

    #[tokio::test]
    async fn test_rank_unmatched_label_passes_through_with_rank_zero() {
        let store = store_with_categories(vec![
            category("A", 1),
            category("B", 2),
            category("Unrated", UNRATED_RANK),
        ]);

        let mut classifier = MockClassifier::new();
        classifier
            .expect_classify()
            .returning(|_, _, _| Ok("Z".to_string()));

        let service = service_with(store, classifier, TEMPLATE);
        let (label, rank) = service.rank("good movie").await.unwrap();

        assert_eq!(label, "Z");
        assert_eq!(rank, 0);
    }

    #[tokio::test]
    async fn test_rank_excludes_sentinel_from_vocabulary() {
        let store = store_with_categories(vec![
            category("A", 1),
            category("B", 2),
            category("Unrated", UNRATED_RANK),
        ]);

        let mut classifier = MockClassifier::new();
        classifier
            .expect_classify()
            .withf(|template, vocabulary, review_text| {
                template == TEMPLATE && vocabulary == "A,B" && review_text == "good movie"
            })
            .times(1)
            .returning(|_, _, _| Ok("B".to_string()));

        let service = service_with(store, classifier, TEMPLATE);
        let (label, rank) = service.rank("good movie").await.unwrap();

        assert_eq!(label, "B");
        assert_eq!(rank, 2);
    }

    #[tokio::test]
    async fn test_rank_first_match_wins_on_duplicate_names() {
        let store = store_with_categories(vec![category("A", 1), category("A", 5)]);

        let mut classifier = MockClassifier::new();
        classifier
            .expect_classify()
            .returning(|_, _, _| Ok("A".to_string()));

        let service = service_with(store, classifier, TEMPLATE);
        let (_, rank) = service.rank("good movie").await.unwrap();

        assert_eq!(rank, 1);
    }

    #[tokio::test]
    async fn test_rank_blank_template_fails_before_classifier_call() {
        let store = store_with_categories(vec![category("A", 1)]);

        // No expectations: any classify call would panic the test
        let classifier = MockClassifier::new();

        let service = service_with(store, classifier, "   ");
        let result = service.rank("good movie").await;

        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_rank_propagates_storage_failure() {
        let mut store = MockStore::new();
        store
            .expect_list_rankings()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let classifier = MockClassifier::new();

        let service = service_with(store, classifier, TEMPLATE);
        let result = service.rank("good movie").await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_rank_propagates_classifier_failure() {
        let store = store_with_categories(vec![category("A", 1)]);

        let mut classifier = MockClassifier::new();
        classifier
            .expect_classify()
            .returning(|_, _, _| Err(AppError::Classifier("backend down".to_string())));

        let service = service_with(store, classifier, TEMPLATE);
        let result = service.rank("good movie").await;

        assert!(matches!(result, Err(AppError::Classifier(_))));
    }

    #[tokio::test]
    async fn test_exact_matching_rejects_decorated_label() {
        let store = store_with_categories(vec![category("Positive", 1)]);

        let mut classifier = MockClassifier::new();
        classifier
            .expect_classify()
            .returning(|_, _, _| Ok(" positive \n".to_string()));

        let service = service_with(store, classifier, TEMPLATE);
        let (label, rank) = service.rank("good movie").await.unwrap();

        // Verbatim comparison: whitespace and casing defeat the match
        assert_eq!(label, " positive \n");
        assert_eq!(rank, 0);
    }

    #[tokio::test]
    async fn test_normalized_matching_accepts_decorated_label() {
        let store = store_with_categories(vec![category("Positive", 1)]);

        let mut classifier = MockClassifier::new();
        classifier
            .expect_classify()
            .returning(|_, _, _| Ok(" positive \n".to_string()));

        let service = service_with(store, classifier, TEMPLATE)
            .with_label_match(LabelMatch::Normalized);
        let (label, rank) = service.rank("good movie").await.unwrap();

        assert_eq!(label, " positive \n");
        assert_eq!(rank, 1);
    }
}
