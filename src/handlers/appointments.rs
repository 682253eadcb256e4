// src/handlers/appointments.rs

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::appointment::{CreateAppointmentRequest, ReturnBookRequest, SubmitFeedbackRequest},
    services::{appointments, borrowing},
    utils::jwt::Claims,
};

/// Query parameters for the "my borrowed books" listing.
#[derive(Debug, Default, Deserialize)]
pub struct BorrowedBooksParams {
    /// Defaults to the caller's own name.
    pub student: Option<String>,
}

/// Schedules an appointment; borrows the referenced book if there is one.
pub async fn create_appointment(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = borrowing::request_borrow(&pool, &claims, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "appointment": appointment })),
    ))
}

/// Marks a borrowed book as available again.
pub async fn return_book(
    State(pool): State<SqlitePool>,
    Json(payload): Json<ReturnBookRequest>,
) -> Result<impl IntoResponse, AppError> {
    let book = borrowing::return_book(&pool, payload.id).await?;
    Ok(Json(json!({ "status": "success", "book": book })))
}

/// Rates a borrow appointment and refreshes the book's rating.
pub async fn submit_feedback(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitFeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = borrowing::submit_feedback(&pool, &claims, &payload).await?;

    Ok(Json(json!({
        "status": "success",
        "appointment": outcome.appointment,
        "book_rating": outcome.book_rating
    })))
}

/// Lists every appointment, newest first.
/// Admin only.
pub async fn list_appointments(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.acquire().await?;
    let list = appointments::list_all(&mut conn).await?;
    Ok(Json(list))
}

/// Lists the borrow appointments of a student, newest first.
/// Students only see their own; admins may ask for anyone.
pub async fn list_borrowed_books(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<BorrowedBooksParams>,
) -> Result<impl IntoResponse, AppError> {
    let student = match params.student {
        Some(student) if student != claims.name => {
            claims.require_admin()?;
            student
        }
        _ => claims.name,
    };

    let mut conn = pool.acquire().await?;
    let list = appointments::list_by_student_and_book_title(&mut conn, &student).await?;
    Ok(Json(list))
}
