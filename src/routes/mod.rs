use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    db::Store,
    services::{
        classifier::Classifier, recommendations::RecommendationService,
        review_ranking::ReviewRankingService, reviews::ReviewUpdateService,
    },
};

pub mod genres;
pub mod movies;
pub mod recommendations;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub reviews: ReviewUpdateService,
    pub recommendations: RecommendationService,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, classifier: Arc<dyn Classifier>, config: Config) -> Self {
        let ranking = ReviewRankingService::new(
            store.clone(),
            classifier,
            config.base_prompt_template.clone(),
        );

        Self {
            reviews: ReviewUpdateService::new(store.clone(), ranking),
            recommendations: RecommendationService::new(store.clone()),
            store,
            config,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Catalog
        .route("/movies", get(movies::list_movies).post(movies::create_movie))
        .route("/movies/:imdb_id", get(movies::get_movie))
        .route("/genres", get(genres::list_genres))
        // Derived behaviors
        .route("/recommendations", get(recommendations::recommended_movies))
        .route("/movies/:imdb_id/review", patch(movies::update_review))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
