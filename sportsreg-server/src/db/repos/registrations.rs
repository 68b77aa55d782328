//! Registration repository

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::{missing_reference, DbError};
use crate::models::ParticipationStatus;

/// Registration record
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Registration {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub registered_at: DateTime<Utc>,
    pub participation_status: ParticipationStatus,
}

/// Caller's registration joined with event details
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MyRegistration {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub registered_at: DateTime<Utc>,
    pub participation_status: ParticipationStatus,
    pub event_name: String,
    pub sport_type: String,
    pub event_date: DateTime<Utc>,
    pub venue: String,
    pub registration_deadline: DateTime<Utc>,
}

/// Registration joined with user and event details (admin listing)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminRegistration {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub registered_at: DateTime<Utc>,
    pub participation_status: ParticipationStatus,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub event_name: String,
    pub sport_type: String,
    pub event_date: DateTime<Utc>,
    pub venue: String,
}

/// Registration repository
pub struct RegistrationRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register a user for an event. `None` if already registered.
    ///
    /// A user or event deleted since the caller last saw it is `NotFound`.
    pub async fn create(&self, user_id: i64, event_id: i64) -> Result<Option<Registration>, DbError> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (user_id, event_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, event_id) DO NOTHING
            RETURNING id, user_id, event_id, registered_at, participation_status
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            missing_reference(
                e,
                &[
                    ("registrations_user_id_fkey", "User", user_id),
                    ("registrations_event_id_fkey", "Event", event_id),
                ],
            )
        })?;

        Ok(registration)
    }

    /// A user's registrations, ordered by event date.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<MyRegistration>, DbError> {
        let rows = sqlx::query_as::<_, MyRegistration>(
            r#"
            SELECT
                r.id, r.user_id, r.event_id, r.registered_at, r.participation_status,
                e.event_name, e.sport_type, e.event_date, e.venue, e.registration_deadline
            FROM registrations r
            JOIN events e ON r.event_id = e.id
            WHERE r.user_id = $1
            ORDER BY e.event_date ASC, r.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Set status to participated. Ownership is part of the WHERE clause,
    /// so another user's registration reads as not found.
    pub async fn mark_participated(&self, id: i64, user_id: i64) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE registrations
            SET participation_status = $3
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(ParticipationStatus::Participated)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "Registration",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Every registration, newest first.
    pub async fn list_all(&self) -> Result<Vec<AdminRegistration>, DbError> {
        let rows = sqlx::query_as::<_, AdminRegistration>(
            r#"
            SELECT
                r.id, r.user_id, r.event_id, r.registered_at, r.participation_status,
                u.name AS user_name, u.email AS user_email, u.phone AS user_phone,
                e.event_name, e.sport_type, e.event_date, e.venue
            FROM registrations r
            JOIN users u ON r.user_id = u.id
            JOIN events e ON r.event_id = e.id
            ORDER BY r.registered_at DESC, r.id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
