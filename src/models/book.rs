// src/models/book.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;
use utoipa::ToSchema;
use validator::Validate;

/// Cover used when a book is added without an image reference.
pub const DEFAULT_COVER: &str =
    "https://images.unsplash.com/photo-1543002588-bfa74002ed7e?w=600&auto=format&fit=crop&q=60";

/// Rating every new book starts with.
pub const DEFAULT_RATING: f64 = 5.0;

/// Availability of a single catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Borrowed,
}

/// Represents the 'books' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub category: String,

    /// Only the borrow/return workflow changes this.
    pub status: BookStatus,

    /// Rounded mean of feedback ratings, one fractional digit.
    pub rating: f64,

    /// URL or path to the cover image.
    pub image: String,
}

/// DTO for adding a book to the catalog.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 chars"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "Author must be between 1 and 100 chars"))]
    pub author: String,
    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 chars"))]
    pub category: String,
    #[validate(length(max = 500), custom(function = validate_image_ref))]
    pub image: Option<String>,
}

/// Query parameters for listing books.
#[derive(Debug, Default, Deserialize)]
pub struct BookListParams {
    pub category: Option<String>,
    /// Substring match on the title.
    pub q: Option<String>,
}

/// Accepts absolute URLs and server-relative upload paths.
fn validate_image_ref(image: &str) -> Result<(), validator::ValidationError> {
    if image.starts_with("uploads/") || Url::parse(image).is_ok() {
        return Ok(());
    }
    Err(validator::ValidationError::new("invalid_image_reference"))
}
