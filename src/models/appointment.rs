// src/models/appointment.rs

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Represents the 'appointments' table in the database.
///
/// An appointment is either a borrow (it references a book) or a general
/// visit such as "Book Return" (no book).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Appointment {
    pub id: i64,

    /// Free-text student name as typed by the client.
    pub student_name: String,

    pub date: NaiveDate,
    pub purpose: String,

    /// Book resolved when the appointment was created.
    /// Cleared if the book is later deleted.
    pub book_id: Option<i64>,

    /// Title snapshot taken at creation, for display only.
    pub book_title: Option<String>,

    pub feedback: Option<String>,
    pub user_rating: Option<i64>,

    /// Set when the borrowed book is returned.
    pub returned_at: Option<NaiveDateTime>,

    pub created_at: NaiveDateTime,
}

/// DTO for requesting an appointment (and borrowing a book when one is given).
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAppointmentRequest {
    #[validate(length(min = 1, max = 100, message = "Student name must be between 1 and 100 chars"))]
    pub student: String,

    pub date: NaiveDate,

    #[validate(length(min = 1, max = 100, message = "Purpose must be between 1 and 100 chars"))]
    pub purpose: String,

    /// Title of the book to borrow. Only used on its own when `book_id` is absent.
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub book: Option<String>,

    #[serde(default)]
    pub book_id: Option<i64>,
}

/// DTO for returning a borrowed book.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct ReturnBookRequest {
    /// Book id.
    pub id: i64,
}

/// DTO for rating an appointment after borrowing.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitFeedbackRequest {
    /// Appointment id.
    pub id: i64,

    #[validate(length(max = 2000, message = "Feedback must be at most 2000 chars"))]
    pub feedback: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i64,

    /// Title shown to the student. Informational only; the book is taken from the appointment.
    #[serde(default)]
    pub book_title: Option<String>,
}
