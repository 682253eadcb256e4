// src/handlers/action.rs
//
// Single endpoint multiplexed by `?action=`, mirroring the REST routes under
// one path. Each action forwards to the matching REST handler with the same
// typed payloads and bearer-token rules. POST bodies are parsed as JSON
// whatever their Content-Type.

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;

use crate::{
    error::AppError,
    handlers::{admin, announcements, appointments, auth, books, favorites},
    models::book::BookListParams,
    state::AppState,
    utils::jwt::{Claims, claims_from_headers},
};

#[derive(Debug, Deserialize)]
pub struct ActionParams {
    pub action: String,
    /// `get_user_borrowed_books` filter.
    pub student: Option<String>,
    /// `get_books` filters.
    pub category: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdPayload {
    id: i64,
}

/// Read-only actions.
pub async fn dispatch_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ActionParams>,
) -> Result<Response, AppError> {
    let pool = state.pool.clone();

    let response = match params.action.as_str() {
        "get_books" => {
            let filter = BookListParams {
                category: params.category,
                q: params.q,
            };
            books::list_books(State(pool), Query(filter)).await.into_response()
        }
        "get_announcements" => announcements::list_announcements(State(pool)).await.into_response(),
        "get_appointments" => {
            admin_caller(&state, &headers)?;
            appointments::list_appointments(State(pool)).await.into_response()
        }
        "get_users" => {
            admin_caller(&state, &headers)?;
            let users = admin::fetch_users(&pool).await?;
            let rows: Vec<serde_json::Value> = users
                .iter()
                .map(|user| {
                    let mut row = json!(user);
                    row["date"] = json!(user.created_at);
                    row
                })
                .collect();
            Json(rows).into_response()
        }
        "get_favorites" => {
            let claims = caller(&state, &headers)?;
            favorites::list_favorites(State(pool), Extension(claims)).await.into_response()
        }
        "get_user_borrowed_books" => {
            let claims = caller(&state, &headers)?;
            let filter = appointments::BorrowedBooksParams {
                student: params.student,
            };
            appointments::list_borrowed_books(State(pool), Extension(claims), Query(filter))
                .await
                .into_response()
        }
        other => return Err(unknown_action(other)),
    };

    Ok(response)
}

/// Mutating actions.
pub async fn dispatch_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ActionParams>,
    body: Bytes,
) -> Result<Response, AppError> {
    let pool = state.pool.clone();

    let response = match params.action.as_str() {
        "login" => auth::login(State(pool), State(state.config.clone()), Json(parse(&body)?))
            .await
            .into_response(),
        "register" => auth::register(State(pool), Json(parse(&body)?)).await.into_response(),
        "create_appointment" => {
            let claims = caller(&state, &headers)?;
            appointments::create_appointment(State(pool), Extension(claims), Json(parse(&body)?))
                .await
                .into_response()
        }
        "return_book" => {
            caller(&state, &headers)?;
            appointments::return_book(State(pool), Json(parse(&body)?))
                .await
                .into_response()
        }
        "submit_feedback" => {
            let claims = caller(&state, &headers)?;
            appointments::submit_feedback(State(pool), Extension(claims), Json(parse(&body)?))
                .await
                .into_response()
        }
        "toggle_favorite" => {
            let claims = caller(&state, &headers)?;
            favorites::toggle_favorite(State(pool), Extension(claims), Json(parse(&body)?))
                .await
                .into_response()
        }
        "add_book" => {
            admin_caller(&state, &headers)?;
            books::create_book(State(pool), Json(parse(&body)?)).await.into_response()
        }
        "delete_book" => {
            admin_caller(&state, &headers)?;
            let IdPayload { id } = parse(&body)?;
            books::delete_book(State(pool), Path(id)).await.into_response()
        }
        "add_announcement" => {
            admin_caller(&state, &headers)?;
            announcements::create_announcement(State(pool), Json(parse(&body)?))
                .await
                .into_response()
        }
        "delete_announcement" => {
            admin_caller(&state, &headers)?;
            let IdPayload { id } = parse(&body)?;
            announcements::delete_announcement(State(pool), Path(id))
                .await
                .into_response()
        }
        other => return Err(unknown_action(other)),
    };

    Ok(response)
}

fn parse<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    Ok(serde_json::from_slice(body)?)
}

fn caller(state: &AppState, headers: &HeaderMap) -> Result<Claims, AppError> {
    claims_from_headers(headers, &state.config.jwt_secret)
}

fn admin_caller(state: &AppState, headers: &HeaderMap) -> Result<Claims, AppError> {
    let claims = caller(state, headers)?;
    claims.require_admin()?;
    Ok(claims)
}

fn unknown_action(action: &str) -> AppError {
    AppError::BadRequest(format!("Unknown action '{}'", action))
}
