// src/services/appointments.rs
//
// Appointment ledger. Rows are appended, annotated with feedback and a return
// stamp, and never deleted.

use chrono::NaiveDate;
use sqlx::SqliteConnection;

use crate::{error::AppError, models::appointment::Appointment};

const APPOINTMENT_COLUMNS: &str = "id, student_name, date, purpose, book_id, book_title, \
     feedback, user_rating, returned_at, created_at";

/// Book reference resolved by the borrowing workflow.
#[derive(Debug, Clone)]
pub struct BookRef {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct NewAppointment<'a> {
    pub student_name: &'a str,
    pub date: NaiveDate,
    pub purpose: &'a str,
    pub book: Option<BookRef>,
}

pub async fn append(conn: &mut SqliteConnection, new: &NewAppointment<'_>) -> Result<Appointment, AppError> {
    let (book_id, book_title) = match &new.book {
        Some(book) => (Some(book.id), Some(book.title.as_str())),
        None => (None, None),
    };

    let appointment = sqlx::query_as::<_, Appointment>(&format!(
        r#"
        INSERT INTO appointments (student_name, date, purpose, book_id, book_title)
        VALUES (?, ?, ?, ?, ?)
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(new.student_name)
    .bind(new.date)
    .bind(new.purpose)
    .bind(book_id)
    .bind(book_title)
    .fetch_one(&mut *conn)
    .await?;

    Ok(appointment)
}

pub async fn list_all(conn: &mut SqliteConnection) -> Result<Vec<Appointment>, AppError> {
    let appointments = sqlx::query_as::<_, Appointment>(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY id DESC"
    ))
    .fetch_all(&mut *conn)
    .await?;
    Ok(appointments)
}

/// Borrow-type appointments of one student, newest first.
/// General appointments (no book title) are left out.
pub async fn list_by_student_and_book_title(
    conn: &mut SqliteConnection,
    student_name: &str,
) -> Result<Vec<Appointment>, AppError> {
    let appointments = sqlx::query_as::<_, Appointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE student_name = ? AND book_title IS NOT NULL
        ORDER BY id DESC
        "#
    ))
    .bind(student_name)
    .fetch_all(&mut *conn)
    .await?;
    Ok(appointments)
}

pub async fn get(conn: &mut SqliteConnection, id: i64) -> Result<Option<Appointment>, AppError> {
    let appointment = sqlx::query_as::<_, Appointment>(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(appointment)
}

/// Stores feedback and rating on an appointment, overwriting earlier feedback.
/// Returns the updated row, or `None` when the id does not exist.
pub async fn record_feedback(
    conn: &mut SqliteConnection,
    id: i64,
    feedback: &str,
    rating: i64,
) -> Result<Option<Appointment>, AppError> {
    let appointment = sqlx::query_as::<_, Appointment>(&format!(
        r#"
        UPDATE appointments SET feedback = ?, user_rating = ?
        WHERE id = ?
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(feedback)
    .bind(rating)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(appointment)
}

/// Stamps the newest unreturned appointment of a book as returned.
/// Returns false when the book had no open appointment.
pub async fn close_open_borrow(conn: &mut SqliteConnection, book_id: i64) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE appointments SET returned_at = CURRENT_TIMESTAMP
        WHERE id = (
            SELECT id FROM appointments
            WHERE book_id = ? AND returned_at IS NULL
            ORDER BY id DESC
            LIMIT 1
        )
        "#,
    )
    .bind(book_id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Number of borrow appointments of a book that have not been returned.
pub async fn count_open_borrows(conn: &mut SqliteConnection, book_id: i64) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM appointments WHERE book_id = ? AND returned_at IS NULL",
    )
    .bind(book_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count)
}

/// Every non-null feedback rating recorded against a book.
pub async fn ratings_for_book(conn: &mut SqliteConnection, book_id: i64) -> Result<Vec<i64>, AppError> {
    let ratings = sqlx::query_scalar::<_, i64>(
        "SELECT user_rating FROM appointments WHERE book_id = ? AND user_rating IS NOT NULL",
    )
    .bind(book_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(ratings)
}
