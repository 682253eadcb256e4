// src/handlers/favorites.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::favorite::{FavoriteStatus, ToggleFavoriteRequest},
    utils::jwt::Claims,
};

/// Toggle a book in the caller's favorites.
pub async fn toggle_favorite(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ToggleFavoriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let mut tx = pool.begin().await?;

    // Deleting first keeps the transaction a writer from its first statement.
    let removed = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND book_id = ?")
        .bind(user_id)
        .bind(payload.book_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
        > 0;

    let fav_status = if removed {
        FavoriteStatus::Removed
    } else {
        sqlx::query("INSERT INTO favorites (user_id, book_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(payload.book_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    AppError::NotFound("Book not found".to_string())
                }
                _ => AppError::from(e),
            })?;
        FavoriteStatus::Added
    };

    tx.commit().await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "fav_status": fav_status
    })))
}

/// List the book ids the caller has favorited.
pub async fn list_favorites(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let book_ids = sqlx::query_scalar::<_, i64>(
        "SELECT book_id FROM favorites WHERE user_id = ? ORDER BY created_at DESC, book_id DESC",
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(book_ids))
}
