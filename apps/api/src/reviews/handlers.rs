//! Axum route handlers for review CRUD.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::reviews::{store, ReviewResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReviewCreate {
    pub name: String,
    pub rating: i64,
    pub comment: String,
}

fn validate(review: &ReviewCreate) -> Result<(), AppError> {
    let name_len = review.name.trim().chars().count();
    if !(2..=50).contains(&name_len) {
        return Err(AppError::Validation(
            "Name must be between 2 and 50 characters".to_string(),
        ));
    }
    if !(1..=5).contains(&review.rating) {
        return Err(AppError::Validation(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    let comment_len = review.comment.trim().chars().count();
    if !(5..=500).contains(&comment_len) {
        return Err(AppError::Validation(
            "Comment must be between 5 and 500 characters".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/reviews
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewResponse>>, AppError> {
    let rows = store::list_reviews(&state.db).await?;
    Ok(Json(rows.into_iter().map(ReviewResponse::from).collect()))
}

/// POST /api/reviews
pub async fn handle_create(
    State(state): State<AppState>,
    Json(review): Json<ReviewCreate>,
) -> Result<Json<ReviewResponse>, AppError> {
    validate(&review)?;
    let row = store::insert_review(
        &state.db,
        review.name.trim(),
        review.rating,
        review.comment.trim(),
    )
    .await?;
    Ok(Json(row.into()))
}

/// DELETE /api/reviews/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let deleted = store::delete_review(&state.db, &review_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Review not found".to_string()));
    }
    Ok(Json(json!({"status": "success", "message": "Review deleted"})))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(name: &str, rating: i64, comment: &str) -> ReviewCreate {
        ReviewCreate {
            name: name.to_string(),
            rating,
            comment: comment.to_string(),
        }
    }

    #[test]
    fn test_valid_review_passes() {
        assert!(validate(&review("Jane", 5, "Great tool, found a job")).is_ok());
    }

    #[test]
    fn test_name_too_short_is_rejected() {
        assert!(validate(&review("J", 5, "Great tool, found a job")).is_err());
    }

    #[test]
    fn test_name_too_long_is_rejected() {
        assert!(validate(&review(&"x".repeat(51), 5, "Great tool")).is_err());
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        assert!(validate(&review("Jane", 0, "Great tool, found a job")).is_err());
        assert!(validate(&review("Jane", 6, "Great tool, found a job")).is_err());
    }

    #[test]
    fn test_comment_too_short_is_rejected() {
        assert!(validate(&review("Jane", 4, "meh")).is_err());
    }

    #[test]
    fn test_comment_too_long_is_rejected() {
        assert!(validate(&review("Jane", 4, &"x".repeat(501))).is_err());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(validate(&review("Jo", 1, "5char")).is_ok());
        assert!(validate(&review(&"x".repeat(50), 5, &"x".repeat(500))).is_ok());
    }
}
