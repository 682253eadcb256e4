// src/handlers/docs.rs

use axum::{Json, response::IntoResponse};
use utoipa::OpenApi;

use crate::models::{
    announcement::{Announcement, AnnouncementType, CreateAnnouncementRequest},
    appointment::{Appointment, CreateAppointmentRequest, ReturnBookRequest, SubmitFeedbackRequest},
    book::{Book, BookStatus, CreateBookRequest},
    favorite::{FavoriteStatus, ToggleFavoriteRequest},
    user::{CreateUserRequest, LoginRequest, Role, User},
};

/// Schema document for API clients.
#[derive(OpenApi)]
#[openapi(
    info(title = "Library Backend", description = "Catalog, borrowing and rating API"),
    components(schemas(
        Book,
        BookStatus,
        CreateBookRequest,
        Appointment,
        CreateAppointmentRequest,
        ReturnBookRequest,
        SubmitFeedbackRequest,
        User,
        Role,
        CreateUserRequest,
        LoginRequest,
        Announcement,
        AnnouncementType,
        CreateAnnouncementRequest,
        ToggleFavoriteRequest,
        FavoriteStatus,
    ))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
