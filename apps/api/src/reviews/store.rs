//! SQLite queries for the reviews table.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::reviews::ReviewRow;

/// Returns all reviews, newest first.
pub async fn list_reviews(pool: &SqlitePool) -> Result<Vec<ReviewRow>, sqlx::Error> {
    sqlx::query_as::<_, ReviewRow>(
        "SELECT id, name, rating, comment, created_at FROM reviews ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn insert_review(
    pool: &SqlitePool,
    name: &str,
    rating: i64,
    comment: &str,
) -> Result<ReviewRow, sqlx::Error> {
    let row = ReviewRow {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        rating,
        comment: comment.to_string(),
        created_at: Utc::now(),
    };

    sqlx::query("INSERT INTO reviews (id, name, rating, comment, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&row.id)
        .bind(&row.name)
        .bind(row.rating)
        .bind(&row.comment)
        .bind(row.created_at)
        .execute(pool)
        .await?;

    Ok(row)
}

/// Deletes a review by id; false when no row matched.
pub async fn delete_review(pool: &SqlitePool, review_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
        .bind(review_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate;
    use sqlx::sqlite::SqlitePoolOptions;

    /// In-memory SQLite gives each connection its own database, so tests pin
    /// the pool to a single connection.
    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        migrate(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_insert_and_list_roundtrip() {
        let pool = test_pool().await;
        let inserted = insert_review(&pool, "Jane", 5, "Found a job in a week!")
            .await
            .unwrap();

        let reviews = list_reviews(&pool).await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].id, inserted.id);
        assert_eq!(reviews[0].rating, 5);
        assert_eq!(reviews[0].comment, "Found a job in a week!");
    }

    #[tokio::test]
    async fn test_list_returns_newest_first() {
        let pool = test_pool().await;
        insert_review(&pool, "First", 4, "older review").await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(10));
        insert_review(&pool, "Second", 5, "newer review").await.unwrap();

        let reviews = list_reviews(&pool).await.unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].name, "Second");
        assert_eq!(reviews[1].name, "First");
    }

    #[tokio::test]
    async fn test_delete_existing_review_returns_true() {
        let pool = test_pool().await;
        let inserted = insert_review(&pool, "Jane", 3, "it was fine").await.unwrap();

        assert!(delete_review(&pool, &inserted.id).await.unwrap());
        assert!(list_reviews(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_review_returns_false() {
        let pool = test_pool().await;
        assert!(!delete_review(&pool, "no-such-id").await.unwrap());
    }
}
