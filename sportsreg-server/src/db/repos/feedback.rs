//! Feedback repository
//!
//! Submission is one conditional upsert: the participated-registration
//! check and the insert/update happen in the same statement, so concurrent
//! submissions for the same (user, event) cannot hit a duplicate-key error.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::DbError;
use crate::models::Rating;

/// Result of a feedback submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackUpsert {
    Created { id: i64 },
    Updated { id: i64 },
}

/// Caller's feedback joined with event details
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MyFeedback {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub event_name: String,
    pub sport_type: String,
    pub event_date: DateTime<Utc>,
}

/// Feedback for one event joined with the author
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventFeedback {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
    pub event_name: String,
}

/// Feedback joined with author and event (admin listing)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminFeedback {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
    pub event_name: String,
    pub sport_type: String,
    pub event_date: DateTime<Utc>,
}

/// Feedback repository
pub struct FeedbackRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> FeedbackRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert or update the caller's feedback for an event.
    ///
    /// Returns `None` when the user has no participated registration for
    /// the event (nothing is written in that case).
    pub async fn upsert(
        &self,
        user_id: i64,
        event_id: i64,
        rating: Rating,
        comment: Option<&str>,
    ) -> Result<Option<FeedbackUpsert>, DbError> {
        // xmax = 0 only for freshly inserted tuples
        let row: Option<(i64, bool)> = sqlx::query_as(
            r#"
            INSERT INTO feedback (user_id, event_id, rating, comment)
            SELECT r.user_id, r.event_id, $3, $4
            FROM registrations r
            WHERE r.user_id = $1
              AND r.event_id = $2
              AND r.participation_status = 'participated'
            ON CONFLICT (user_id, event_id)
            DO UPDATE SET rating = EXCLUDED.rating, comment = EXCLUDED.comment
            RETURNING id, (xmax = 0) AS inserted
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .bind(rating.get())
        .bind(comment)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(id, inserted)| {
            if inserted {
                FeedbackUpsert::Created { id }
            } else {
                FeedbackUpsert::Updated { id }
            }
        }))
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<MyFeedback>, DbError> {
        let rows = sqlx::query_as::<_, MyFeedback>(
            r#"
            SELECT
                f.id, f.user_id, f.event_id, f.rating, f.comment, f.submitted_at,
                e.event_name, e.sport_type, e.event_date
            FROM feedback f
            JOIN events e ON f.event_id = e.id
            WHERE f.user_id = $1
            ORDER BY f.submitted_at DESC, f.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<EventFeedback>, DbError> {
        let rows = sqlx::query_as::<_, EventFeedback>(
            r#"
            SELECT
                f.id, f.user_id, f.event_id, f.rating, f.comment, f.submitted_at,
                u.name AS user_name, u.email AS user_email, e.event_name
            FROM feedback f
            JOIN users u ON f.user_id = u.id
            JOIN events e ON f.event_id = e.id
            WHERE f.event_id = $1
            ORDER BY f.submitted_at DESC, f.id DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_all(&self) -> Result<Vec<AdminFeedback>, DbError> {
        let rows = sqlx::query_as::<_, AdminFeedback>(
            r#"
            SELECT
                f.id, f.user_id, f.event_id, f.rating, f.comment, f.submitted_at,
                u.name AS user_name, u.email AS user_email,
                e.event_name, e.sport_type, e.event_date
            FROM feedback f
            JOIN users u ON f.user_id = u.id
            JOIN events e ON f.event_id = e.id
            ORDER BY f.submitted_at DESC, f.id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
