// src/models/mod.rs

pub mod announcement;
pub mod appointment;
pub mod book;
pub mod favorite;
pub mod user;
