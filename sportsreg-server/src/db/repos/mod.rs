//! Repository implementations for database access
//!
//! Each repository borrows the pool and issues one statement per call.
//! Uniqueness is enforced by constraints + ON CONFLICT.

pub mod users;
pub mod events;
pub mod registrations;
pub mod feedback;
pub mod reports;

pub use users::{User, UserRepo};
pub use events::{Event, EventRepo};
pub use registrations::{AdminRegistration, MyRegistration, Registration, RegistrationRepo};
pub use feedback::{AdminFeedback, EventFeedback, FeedbackRepo, FeedbackUpsert, MyFeedback};
pub use reports::{EventParticipation, FeedbackSummary, Report, ReportRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

/// Turn a foreign-key violation (SQLSTATE 23503) into `NotFound` for the
/// referenced row. `references` lists `(constraint, resource, id)`.
pub(crate) fn missing_reference(err: sqlx::Error, references: &[(&str, &'static str, i64)]) -> DbError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_foreign_key_violation() {
            let constraint = db.constraint().unwrap_or_default();
            if let Some((_, resource, id)) = references.iter().find(|(name, _, _)| *name == constraint) {
                return DbError::NotFound {
                    resource: *resource,
                    id: id.to_string(),
                };
            }
        }
    }
    DbError::Sqlx(err)
}
