//! Minimal multi-user to-do list web application.
//!
//! Users register, log in and manage personal to-do items; every item is
//! scoped to its owner and never visible to anyone else. Handlers render
//! Askama templates, persistent state lives in SQLite behind sqlx, and the
//! authenticated identity travels in a tower-sessions cookie session.

pub mod application;
pub mod auth;
pub mod database;
pub mod error;
pub mod models;
pub mod notices;
pub mod settings;
pub mod web;

pub use application::AppState;
pub use error::AppError;
pub use settings::Settings;
