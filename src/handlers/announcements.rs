// src/handlers/announcements.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::announcement::{Announcement, CreateAnnouncementRequest},
    utils::html::clean_html,
};

/// Lists announcements by date, newest first.
pub async fn list_announcements(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let list = sqlx::query_as::<_, Announcement>(
        r#"
        SELECT id, title, content, type, date, created_at
        FROM announcements
        ORDER BY date DESC, created_at DESC, id DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(list))
}

/// Posts an announcement.
/// Admin only.
pub async fn create_announcement(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateAnnouncementRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let announcement = sqlx::query_as::<_, Announcement>(
        r#"
        INSERT INTO announcements (title, content, type, date)
        VALUES (?, ?, ?, ?)
        RETURNING id, title, content, type, date, created_at
        "#,
    )
    .bind(&payload.title)
    .bind(clean_html(&payload.content))
    .bind(payload.announcement_type)
    .bind(payload.date)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create announcement: {:?}", e);
        AppError::from(e)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "status": "success", "announcement": announcement })),
    ))
}

/// Deletes an announcement by ID.
/// Admin only.
pub async fn delete_announcement(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Announcement not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "status": "success" })))
}
