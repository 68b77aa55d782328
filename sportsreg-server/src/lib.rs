//! sportsreg-server: sports event registration backend
//!
//! Accounts with user/admin roles, admin-managed events, per-user
//! registrations with participation tracking, post-event feedback and
//! admin reports, served as a JSON API over axum + PostgreSQL.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod state;

pub use error::{Error, Result};
pub use state::AppState;
