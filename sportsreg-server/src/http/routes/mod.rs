//! Route handlers organized by resource

pub mod health;
pub mod auth;
pub mod events;
pub mod registrations;
pub mod feedback;
pub mod admin;

use serde::Serialize;

/// Plain `{message}` response body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}
