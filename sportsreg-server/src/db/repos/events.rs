//! Event repository
//!
//! Every read joins the creator's name. Writes use a CTE so the returned
//! row carries the same shape as reads in a single round trip.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::{missing_reference, DbError};
use crate::models::{EventPatch, NewEvent};

/// Event with its creator's display name
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: i64,
    pub event_name: String,
    pub sport_type: String,
    pub event_date: DateTime<Utc>,
    pub venue: String,
    pub registration_deadline: DateTime<Utc>,
    pub description: Option<String>,
    pub created_by: Option<i64>,
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const EVENT_COLUMNS: &str = r#"
    e.id, e.event_name, e.sport_type, e.event_date, e.venue,
    e.registration_deadline, e.description, e.created_by,
    u.name AS created_by_name, e.created_at, e.updated_at
"#;

fn not_found(id: i64) -> DbError {
    DbError::NotFound {
        resource: "Event",
        id: id.to_string(),
    }
}

/// Event repository
pub struct EventRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All events, soonest first.
    pub async fn list(&self) -> Result<Vec<Event>, DbError> {
        let sql = format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events e
            LEFT JOIN users u ON e.created_by = u.id
            ORDER BY e.event_date ASC, e.id ASC
            "#
        );
        let events = sqlx::query_as::<_, Event>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(events)
    }

    pub async fn get(&self, id: i64) -> Result<Event, DbError> {
        let sql = format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events e
            LEFT JOIN users u ON e.created_by = u.id
            WHERE e.id = $1
            "#
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Registration deadline of an event, `None` if the event doesn't exist.
    pub async fn registration_deadline(&self, id: i64) -> Result<Option<DateTime<Utc>>, DbError> {
        let deadline: Option<(DateTime<Utc>,)> =
            sqlx::query_as("SELECT registration_deadline FROM events WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(deadline.map(|(d,)| d))
    }

    pub async fn create(&self, event: &NewEvent, created_by: i64) -> Result<Event, DbError> {
        let sql = format!(
            r#"
            WITH e AS (
                INSERT INTO events
                    (event_name, sport_type, event_date, venue, registration_deadline, description, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            SELECT {EVENT_COLUMNS}
            FROM e
            LEFT JOIN users u ON e.created_by = u.id
            "#
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(&event.event_name)
            .bind(&event.sport_type)
            .bind(event.event_date)
            .bind(&event.venue)
            .bind(event.registration_deadline)
            .bind(&event.description)
            .bind(created_by)
            .fetch_one(self.pool)
            .await
            .map_err(|e| missing_reference(e, &[("events_created_by_fkey", "User", created_by)]))?;

        Ok(event)
    }

    /// Overwrite the fields present in `patch`; absent fields are kept.
    pub async fn update(&self, id: i64, patch: &EventPatch) -> Result<Event, DbError> {
        let sql = format!(
            r#"
            WITH e AS (
                UPDATE events SET
                    event_name = COALESCE($2, event_name),
                    sport_type = COALESCE($3, sport_type),
                    event_date = COALESCE($4, event_date),
                    venue = COALESCE($5, venue),
                    registration_deadline = COALESCE($6, registration_deadline),
                    description = CASE WHEN $7 THEN $8 ELSE description END,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT {EVENT_COLUMNS}
            FROM e
            LEFT JOIN users u ON e.created_by = u.id
            "#
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(&patch.event_name)
            .bind(&patch.sport_type)
            .bind(patch.event_date)
            .bind(&patch.venue)
            .bind(patch.registration_deadline)
            .bind(patch.description.is_some())
            .bind(patch.description.clone().flatten())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Hard delete; registrations and feedback cascade.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}
