// src/models/announcement.rs

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum AnnouncementType {
    Event,
    Update,
    #[default]
    News,
}

/// Represents the 'announcements' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub announcement_type: AnnouncementType,
    pub date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// DTO for posting an announcement.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
    #[serde(rename = "type", default)]
    pub announcement_type: AnnouncementType,
    pub date: NaiveDate,
}
