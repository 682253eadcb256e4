// src/services/books.rs
//
// Book registry. Status and rating are only changed through the borrowing
// workflow and the rating aggregator, hence the crate-private setters.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    error::AppError,
    models::book::{Book, BookListParams, BookStatus, CreateBookRequest, DEFAULT_COVER, DEFAULT_RATING},
};

const BOOK_COLUMNS: &str = "id, title, author, category, status, rating, image";

/// Lists the catalog, newest first, optionally filtered by category and title keyword.
pub async fn list(conn: &mut SqliteConnection, params: &BookListParams) -> Result<Vec<Book>, AppError> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
    builder.push(BOOK_COLUMNS);
    builder.push(" FROM books WHERE 1 = 1");

    if let Some(category) = &params.category {
        builder.push(" AND category = ");
        builder.push_bind(category.clone());
    }

    if let Some(q) = &params.q {
        builder.push(" AND title LIKE ");
        builder.push_bind(format!("%{}%", escape_like(q)));
        builder.push(" ESCAPE '\\'");
    }

    builder.push(" ORDER BY id DESC");

    let books = builder.build_query_as::<Book>().fetch_all(&mut *conn).await?;
    Ok(books)
}

/// Escapes LIKE wildcards so `q` matches literally.
fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub async fn get(conn: &mut SqliteConnection, id: i64) -> Result<Option<Book>, AppError> {
    let book = sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(book)
}

/// All books carrying exactly this title. More than one means the title is ambiguous.
pub async fn find_by_title(conn: &mut SqliteConnection, title: &str) -> Result<Vec<Book>, AppError> {
    let books = sqlx::query_as::<_, Book>(&format!(
        "SELECT {BOOK_COLUMNS} FROM books WHERE title = ? ORDER BY id"
    ))
    .bind(title)
    .fetch_all(&mut *conn)
    .await?;
    Ok(books)
}

/// Adds a book. New books are always available and rated 5.0.
pub async fn create(conn: &mut SqliteConnection, req: &CreateBookRequest) -> Result<Book, AppError> {
    let image = req.image.as_deref().unwrap_or(DEFAULT_COVER);

    let book = sqlx::query_as::<_, Book>(&format!(
        r#"
        INSERT INTO books (title, author, category, image, status, rating)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {BOOK_COLUMNS}
        "#
    ))
    .bind(&req.title)
    .bind(&req.author)
    .bind(&req.category)
    .bind(image)
    .bind(BookStatus::Available)
    .bind(DEFAULT_RATING)
    .fetch_one(&mut *conn)
    .await?;

    Ok(book)
}

/// Returns false when no book had this id.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Compare-and-swap on the status column.
///
/// Returns the book title when the row moved from `from` to `to`, `None` when
/// the book is missing or was not in `from`.
async fn transition(
    conn: &mut SqliteConnection,
    id: i64,
    from: BookStatus,
    to: BookStatus,
) -> Result<Option<String>, AppError> {
    let title = sqlx::query_scalar::<_, String>(
        "UPDATE books SET status = ? WHERE id = ? AND status = ? RETURNING title",
    )
    .bind(to)
    .bind(id)
    .bind(from)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(title)
}

pub(crate) async fn mark_borrowed(conn: &mut SqliteConnection, id: i64) -> Result<Option<String>, AppError> {
    transition(conn, id, BookStatus::Available, BookStatus::Borrowed).await
}

pub(crate) async fn mark_available(conn: &mut SqliteConnection, id: i64) -> Result<Option<String>, AppError> {
    transition(conn, id, BookStatus::Borrowed, BookStatus::Available).await
}

pub(crate) async fn set_rating(conn: &mut SqliteConnection, id: i64, rating: f64) -> Result<bool, AppError> {
    let result = sqlx::query("UPDATE books SET rating = ? WHERE id = ?")
        .bind(rating)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like(r"c:\d"), r"c:\\d");
        assert_eq!(escape_like("Dune"), "Dune");
    }
}
