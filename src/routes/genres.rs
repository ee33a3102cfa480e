use axum::{extract::State, Json};

use crate::{error::AppResult, models::Genre};

use super::AppState;

/// Get all catalog genres
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.store.list_genres().await?;
    Ok(Json(genres))
}
