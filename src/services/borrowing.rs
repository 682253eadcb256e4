// src/services/borrowing.rs
//
// Borrow/return workflow: available -> borrowed -> available.
//
// Every transition runs in one transaction that starts with its write, so the
// status flip and the ledger entry commit or roll back together and concurrent
// borrows of the same book are serialized by the store's write lock.

use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        appointment::{Appointment, CreateAppointmentRequest, SubmitFeedbackRequest},
        book::Book,
    },
    services::{
        appointments::{self, BookRef, NewAppointment},
        books, rating,
    },
    utils::{html::clean_html, jwt::Claims},
};

/// Result of a feedback submission.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackOutcome {
    pub appointment: Appointment,
    /// Rating written to the book, if it changed.
    pub book_rating: Option<f64>,
}

/// Creates an appointment and, when it names a book, borrows that book.
///
/// The book is identified by `book_id`; a title alone is accepted when it
/// matches exactly one catalog entry. Students may only book under their own
/// name.
pub async fn request_borrow(
    pool: &SqlitePool,
    caller: &Claims,
    req: &CreateAppointmentRequest,
) -> Result<Appointment, AppError> {
    req.validate()?;

    if !caller.is_admin() && req.student != caller.name {
        return Err(AppError::Forbidden(
            "Appointments can only be booked under your own name".to_string(),
        ));
    }

    let target = match (req.book_id, req.book.as_deref()) {
        (Some(id), _) => Some(id),
        (None, Some(title)) => {
            let mut conn = pool.acquire().await?;
            Some(resolve_title(&mut conn, title).await?)
        }
        (None, None) => None,
    };

    let mut tx = pool.begin().await?;

    let book = match target {
        Some(book_id) => {
            let title = borrow_book(&mut tx, book_id).await?;
            if let Some(expected) = req.book.as_deref() {
                if expected != title {
                    return Err(AppError::BadRequest(format!(
                        "Book {} is titled '{}', not '{}'",
                        book_id, title, expected
                    )));
                }
            }
            Some(BookRef { id: book_id, title })
        }
        None => None,
    };

    let appointment = appointments::append(
        &mut tx,
        &NewAppointment {
            student_name: &req.student,
            date: req.date,
            purpose: &req.purpose,
            book,
        },
    )
    .await?;

    tx.commit().await?;

    match appointment.book_id {
        Some(book_id) => tracing::info!(
            appointment_id = appointment.id,
            book_id,
            student = %appointment.student_name,
            "Book borrowed"
        ),
        None => tracing::info!(
            appointment_id = appointment.id,
            student = %appointment.student_name,
            "General appointment scheduled"
        ),
    }

    Ok(appointment)
}

/// Returns a borrowed book and closes its open appointment.
pub async fn return_book(pool: &SqlitePool, book_id: i64) -> Result<Book, AppError> {
    let mut tx = pool.begin().await?;

    if books::mark_available(&mut tx, book_id).await?.is_none() {
        return Err(match books::get(&mut tx, book_id).await? {
            Some(_) => AppError::InvalidState(format!("Book {} is not borrowed", book_id)),
            None => AppError::NotFound(format!("Book {} not found", book_id)),
        });
    }

    if !appointments::close_open_borrow(&mut tx, book_id).await? {
        tracing::warn!(book_id, "Returned book had no open appointment");
    }

    let still_open = appointments::count_open_borrows(&mut tx, book_id).await?;
    if still_open > 0 {
        tracing::warn!(book_id, still_open, "Available book still has open appointments");
    }

    let book = books::get(&mut tx, book_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book_id)))?;

    tx.commit().await?;

    tracing::info!(book_id, "Book returned");
    Ok(book)
}

/// Attaches feedback to an appointment and refreshes the book's rating.
///
/// The book is the one stored on the appointment; a title sent by the client
/// is only compared and logged. Students may only rate their own appointments.
pub async fn submit_feedback(
    pool: &SqlitePool,
    caller: &Claims,
    req: &SubmitFeedbackRequest,
) -> Result<FeedbackOutcome, AppError> {
    req.validate()?;

    // Student names never change after append, so ownership can be checked
    // before the write transaction opens.
    if !caller.is_admin() {
        let mut conn = pool.acquire().await?;
        let owner = appointments::get(&mut conn, req.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", req.id)))?;
        if owner.student_name != caller.name {
            return Err(AppError::Forbidden(
                "Feedback can only be left on your own appointments".to_string(),
            ));
        }
    }

    let feedback = clean_html(&req.feedback);

    let mut tx = pool.begin().await?;

    let appointment = appointments::record_feedback(&mut tx, req.id, &feedback, req.rating)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", req.id)))?;

    let Some(book_id) = appointment.book_id else {
        return Err(AppError::InvalidState(format!(
            "Appointment {} does not reference a book",
            appointment.id
        )));
    };

    if let (Some(claimed), Some(stored)) = (req.book_title.as_deref(), appointment.book_title.as_deref()) {
        if claimed != stored {
            tracing::warn!(
                appointment_id = appointment.id,
                claimed,
                stored,
                "Ignoring client-supplied book title"
            );
        }
    }

    let book_rating = rating::recompute(&mut tx, book_id).await?;

    tx.commit().await?;

    Ok(FeedbackOutcome {
        appointment,
        book_rating,
    })
}

/// Flips a book to borrowed, distinguishing a missing book from one already out.
async fn borrow_book(conn: &mut SqliteConnection, book_id: i64) -> Result<String, AppError> {
    if let Some(title) = books::mark_borrowed(conn, book_id).await? {
        return Ok(title);
    }

    Err(match books::get(conn, book_id).await? {
        Some(book) => AppError::InvalidState(format!("Book '{}' is already borrowed", book.title)),
        None => AppError::NotFound(format!("Book {} not found", book_id)),
    })
}

async fn resolve_title(conn: &mut SqliteConnection, title: &str) -> Result<i64, AppError> {
    let matches = books::find_by_title(conn, title).await?;
    match matches.as_slice() {
        [] => Err(AppError::NotFound(format!("No book titled '{}'", title))),
        [book] => Ok(book.id),
        _ => Err(AppError::Conflict(format!(
            "{} books share the title '{}'; borrow by id",
            matches.len(),
            title
        ))),
    }
}
