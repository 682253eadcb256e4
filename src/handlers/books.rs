// src/handlers/books.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::book::{BookListParams, CreateBookRequest},
    services::books,
};

/// Lists the catalog, newest first.
pub async fn list_books(
    State(pool): State<SqlitePool>,
    Query(params): Query<BookListParams>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.acquire().await?;
    let books = books::list(&mut conn, &params).await?;
    Ok(Json(books))
}

/// Retrieves a single book by ID.
pub async fn get_book(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.acquire().await?;
    let book = books::get(&mut conn, id)
        .await?
        .ok_or(AppError::NotFound("Book not found".to_string()))?;
    Ok(Json(book))
}

/// Adds a book to the catalog.
/// Admin only.
pub async fn create_book(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateBookRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut conn = pool.acquire().await?;
    let book = books::create(&mut conn, &payload).await.map_err(|e| {
        tracing::error!("Failed to create book: {}", e);
        e
    })?;

    tracing::info!(book_id = book.id, title = %book.title, "Book added");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "status": "success", "book": book })),
    ))
}

/// Deletes a book by ID. Favorites go with it; appointments keep their title snapshot.
/// Admin only.
pub async fn delete_book(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.acquire().await?;

    if !books::delete(&mut conn, id).await? {
        return Err(AppError::NotFound("Book not found".to_string()));
    }

    tracing::info!(book_id = id, "Book deleted");
    Ok(Json(serde_json::json!({ "status": "success" })))
}
