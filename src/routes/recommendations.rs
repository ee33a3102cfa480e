use axum::{extract::State, Json};

use crate::{error::AppResult, middleware::AuthIdentity, models::Movie};

use super::AppState;

/// Recommended movies for the authenticated user.
///
/// The list length is bounded by the configured recommendation limit.
pub async fn recommended_movies(
    State(state): State<AppState>,
    identity: AuthIdentity,
) -> AppResult<Json<Vec<Movie>>> {
    let limit = state.config.recommendation_limit();
    let movies = state
        .recommendations
        .recommend(&identity.user_id, limit)
        .await?;

    Ok(Json(movies))
}
