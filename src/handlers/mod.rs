// src/handlers/mod.rs

pub mod action;
pub mod admin;
pub mod announcements;
pub mod appointments;
pub mod auth;
pub mod books;
pub mod docs;
pub mod favorites;
