use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::AuthIdentity,
    models::Movie,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub imdb_id: String,
    pub title: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub review: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub category: String,
    pub rank: i32,
    pub review: String,
}

/// Get all movies
pub async fn list_movies(State(state): State<AppState>) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.store.list_movies().await?;
    Ok(Json(movies))
}

/// Get one movie by its external id
pub async fn get_movie(
    State(state): State<AppState>,
    _identity: AuthIdentity,
    Path(imdb_id): Path<String>,
) -> AppResult<Json<Movie>> {
    let movie = state
        .store
        .find_movie(&imdb_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie Not Found".to_string()))?;

    Ok(Json(movie))
}

/// Create a new movie
pub async fn create_movie(
    State(state): State<AppState>,
    _identity: AuthIdentity,
    Json(request): Json<CreateMovieRequest>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    if request.imdb_id.trim().is_empty() {
        return Err(AppError::InvalidInput("imdb_id is required".to_string()));
    }

    if request.title.trim().is_empty() {
        return Err(AppError::InvalidInput("title is required".to_string()));
    }

    if state.store.movie_exists(&request.imdb_id).await? {
        return Err(AppError::Conflict("Movie Already Exists".to_string()));
    }

    let movie = Movie {
        imdb_id: request.imdb_id,
        title: request.title,
        genres: request.genres,
        review: None,
        created_at: Utc::now(),
    };

    state.store.insert_movie(&movie).await?;

    tracing::info!(imdb_id = %movie.imdb_id, "Movie created");

    Ok((StatusCode::CREATED, Json(movie)))
}

/// Classify and persist an administrator's review on a movie
pub async fn update_review(
    State(state): State<AppState>,
    identity: AuthIdentity,
    Path(imdb_id): Path<String>,
    Json(request): Json<UpdateReviewRequest>,
) -> AppResult<Json<ReviewResponse>> {
    if !identity.is_admin() {
        return Err(AppError::Unauthorized(
            "User must be part of the ADMIN role".to_string(),
        ));
    }

    let (category, rank) = state.reviews.update_review(&imdb_id, &request.review).await?;

    Ok(Json(ReviewResponse {
        category,
        rank,
        review: request.review,
    }))
}
