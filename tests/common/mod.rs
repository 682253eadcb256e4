// tests/common/mod.rs

#![allow(dead_code)]

use std::net::SocketAddr;

use library_backend::{config::Config, db, routes, state::AppState};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin";

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub client: reqwest::Client,
}

/// Builds application state over a fresh, migrated in-memory database with
/// the admin account seeded.
pub async fn test_state() -> AppState {
    // A single connection that never expires keeps the in-memory database alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    db::migrate(&pool).await.expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        allowed_origins: vec!["http://localhost:3000".to_string()],
        admin_username: Some(ADMIN_USERNAME.to_string()),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
    };

    db::seed_admin_user(&pool, &config)
        .await
        .expect("Failed to seed admin");

    AppState { pool, config }
}

/// Spawns the app on a random port against a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    let state = test_state().await;
    let pool = state.pool.clone();
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        pool,
        client: reqwest::Client::new(),
    }
}

pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let resp: Value = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Login failed")
            .json()
            .await
            .expect("Failed to parse login json");

        resp["token"].as_str().expect("Token not found").to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    /// Registers a student and returns (display name, token).
    pub async fn student(&self, name: &str) -> (String, String) {
        let username = unique_username("s");
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "name": name, "username": username, "password": "password123" }))
            .send()
            .await
            .expect("Register failed");
        assert_eq!(resp.status().as_u16(), 201);

        let token = self.login(&username, "password123").await;
        (name.to_string(), token)
    }

    /// Adds a book as admin and returns its id.
    pub async fn add_book(&self, admin_token: &str, title: &str) -> i64 {
        let resp: Value = self
            .client
            .post(self.url("/api/books"))
            .bearer_auth(admin_token)
            .json(&json!({ "title": title, "author": "Anon", "category": "Fiction" }))
            .send()
            .await
            .expect("Add book failed")
            .json()
            .await
            .unwrap();

        resp["book"]["id"].as_i64().expect("book id")
    }

    pub async fn get_book(&self, id: i64) -> Value {
        self.client
            .get(self.url(&format!("/api/books/{}", id)))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    pub async fn borrow(&self, token: &str, student: &str, book_id: i64) -> reqwest::Response {
        self.client
            .post(self.url("/api/appointments"))
            .bearer_auth(token)
            .json(&json!({
                "student": student,
                "date": "2025-03-01",
                "purpose": "Borrow Book",
                "book_id": book_id
            }))
            .send()
            .await
            .unwrap()
    }

    pub async fn return_book(&self, token: &str, book_id: i64) -> reqwest::Response {
        self.client
            .post(self.url("/api/appointments/return"))
            .bearer_auth(token)
            .json(&json!({ "id": book_id }))
            .send()
            .await
            .unwrap()
    }

    pub async fn feedback(&self, token: &str, appointment_id: i64, rating: i64) -> reqwest::Response {
        self.client
            .post(self.url("/api/appointments/feedback"))
            .bearer_auth(token)
            .json(&json!({ "id": appointment_id, "feedback": "Good book", "rating": rating }))
            .send()
            .await
            .unwrap()
    }

    /// Posts to the action endpoint the way the browser client does: a JSON
    /// body sent as text/plain.
    pub async fn action_post(&self, action: &str, token: Option<&str>, body: Value) -> reqwest::Response {
        let mut req = self
            .client
            .post(self.url(&format!("/api?action={}", action)))
            .header("Content-Type", "text/plain")
            .body(body.to_string());
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req.send().await.expect("Action request failed")
    }
}
