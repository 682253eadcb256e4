// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{action, admin, announcements, appointments, auth, books, docs, favorites},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, books, appointments, favorites, announcements, admin).
/// * Mounts the action-multiplexed endpoint at `/api`.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool and Config).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_layer = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let book_routes = Router::new()
        .route("/", get(books::list_books))
        .route("/{id}", get(books::get_book))
        // Protected catalog routes
        .merge(
            Router::new()
                .route("/", post(books::create_book))
                .route("/{id}", delete(books::delete_book))
                .layer(middleware::from_fn(admin_middleware))
                .layer(auth_layer.clone()),
        );

    let appointment_routes = Router::new()
        .route("/", post(appointments::create_appointment))
        .route("/return", post(appointments::return_book))
        .route("/feedback", post(appointments::submit_feedback))
        .route("/borrowed", get(appointments::list_borrowed_books))
        .layer(auth_layer.clone());

    let favorite_routes = Router::new()
        .route(
            "/",
            get(favorites::list_favorites).post(favorites::toggle_favorite),
        )
        .layer(auth_layer.clone());

    let announcement_routes = Router::new()
        .route("/", get(announcements::list_announcements))
        .merge(
            Router::new()
                .route("/", post(announcements::create_announcement))
                .route("/{id}", delete(announcements::delete_announcement))
                .layer(middleware::from_fn(admin_middleware))
                .layer(auth_layer.clone()),
        );

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route("/appointments", get(appointments::list_appointments))
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(auth_layer);

    Router::new()
        .route("/api", get(action::dispatch_get).post(action::dispatch_post))
        .route("/api/openapi.json", get(docs::openapi_json))
        .nest("/api/auth", auth_routes)
        .nest("/api/books", book_routes)
        .nest("/api/appointments", appointment_routes)
        .nest("/api/favorites", favorite_routes)
        .nest("/api/announcements", announcement_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
