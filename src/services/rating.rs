// src/services/rating.rs

use sqlx::SqliteConnection;

use crate::{
    error::AppError,
    services::{appointments, books},
};

/// Arithmetic mean rounded to one decimal place, `None` for no ratings.
pub fn mean_rating(ratings: &[i64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().sum();
    let mean = sum as f64 / ratings.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

/// Recomputes and persists a book's rating from all feedback recorded against it.
///
/// Leaves the stored rating alone when the book has no rated appointment yet.
/// Returns the rating that was written, if any.
pub async fn recompute(conn: &mut SqliteConnection, book_id: i64) -> Result<Option<f64>, AppError> {
    let ratings = appointments::ratings_for_book(conn, book_id).await?;

    let Some(rating) = mean_rating(&ratings) else {
        tracing::debug!(book_id, "No ratings recorded, keeping current rating");
        return Ok(None);
    };

    if !books::set_rating(conn, book_id, rating).await? {
        return Err(AppError::NotFound(format!("Book {} not found", book_id)));
    }

    tracing::info!(book_id, rating, samples = ratings.len(), "Book rating recomputed");
    Ok(Some(rating))
}
