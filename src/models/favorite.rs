// src/models/favorite.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// DTO for toggling a favorite. The user is taken from the token.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleFavoriteRequest {
    pub book_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteStatus {
    Added,
    Removed,
}
