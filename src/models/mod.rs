use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Reserved rank marking the "not yet reviewed" category.
///
/// The category carrying this rank is a placeholder default, never a valid
/// classification outcome, and is excluded from classifier vocabularies.
pub const UNRATED_RANK: i32 = 999;

/// A sentiment category with its ordinal rank (lower = better)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RankingCategory {
    pub name: String,
    pub rank: i32,
}

impl RankingCategory {
    /// Whether this is the reserved "unrated" placeholder category
    pub fn is_sentinel(&self) -> bool {
        self.rank == UNRATED_RANK
    }
}

/// An administrator's classified review of a movie.
///
/// The three fields are only ever persisted together in a single update,
/// so a movie either carries a complete review or none at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub text: String,
    pub category: String,
    pub rank: i32,
}

/// A movie in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub imdb_id: String,
    pub title: String,
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Review>,
    pub created_at: DateTime<Utc>,
}

impl Movie {
    /// Rank used when ordering movies; unreviewed movies sort last
    pub fn effective_rank(&self) -> i32 {
        self.review.as_ref().map(|r| r.rank).unwrap_or(UNRATED_RANK)
    }
}

/// A catalog genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub genre_name: String,
}

/// Flat movie row as stored, with the review triple spread over nullable
/// columns
#[derive(Debug, Clone, FromRow)]
pub struct MovieRow {
    pub imdb_id: String,
    pub title: String,
    pub genres: Vec<String>,
    pub admin_review: Option<String>,
    pub ranking_name: Option<String>,
    pub ranking_value: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        // A review surfaces only when the whole triple is present; rows
        // with a partial triple are treated as unreviewed.
        let review = match (row.admin_review, row.ranking_name, row.ranking_value) {
            (Some(text), Some(category), Some(rank)) => Some(Review {
                text,
                category,
                rank,
            }),
            _ => None,
        };

        Movie {
            imdb_id: row.imdb_id,
            title: row.title,
            genres: row.genres,
            review,
            created_at: row.created_at,
        }
    }
}
