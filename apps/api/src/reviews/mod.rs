//! Reviews — persisted user feedback. Plain CRUD over a single table.

pub mod handlers;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A review as stored in SQLite.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewRow {
    pub id: String,
    pub name: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Wire shape returned to the frontend.
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub name: String,
    pub rating: i64,
    pub comment: String,
    pub date: String,
}

impl From<ReviewRow> for ReviewResponse {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            rating: row.rating,
            comment: row.comment,
            date: row.created_at.to_rfc3339(),
        }
    }
}
