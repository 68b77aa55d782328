//! Aggregate reports - every figure comes from a single SQL aggregate

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::DbError;

/// Per-event participation breakdown
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventParticipation {
    pub id: i64,
    pub event_name: String,
    pub sport_type: String,
    pub total_registrations: i64,
    pub total_registered: i64,
    pub total_participated: i64,
    pub total_absent: i64,
}

/// Per-event feedback count and mean rating
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeedbackSummary {
    pub id: i64,
    pub event_name: String,
    pub total_feedback: i64,
    /// `None` when the event has no feedback
    pub average_rating: Option<f64>,
}

/// Admin report body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub total_registrations: i64,
    pub event_participation: Vec<EventParticipation>,
    pub feedback_summary: Vec<FeedbackSummary>,
}

/// Report repository
pub struct ReportRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn total_registrations(&self) -> Result<i64, DbError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM registrations")
            .fetch_one(self.pool)
            .await?;
        Ok(total)
    }

    /// Events with zero registrations are included with zero counts.
    pub async fn event_participation(&self) -> Result<Vec<EventParticipation>, DbError> {
        let rows = sqlx::query_as::<_, EventParticipation>(
            r#"
            SELECT
                e.id,
                e.event_name,
                e.sport_type,
                COUNT(r.id) AS total_registrations,
                COUNT(r.id) FILTER (WHERE r.participation_status = 'registered') AS total_registered,
                COUNT(r.id) FILTER (WHERE r.participation_status = 'participated') AS total_participated,
                COUNT(r.id) FILTER (WHERE r.participation_status = 'absent') AS total_absent
            FROM events e
            LEFT JOIN registrations r ON e.id = r.event_id
            GROUP BY e.id, e.event_name, e.sport_type, e.event_date
            ORDER BY e.event_date DESC, e.id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn feedback_summary(&self) -> Result<Vec<FeedbackSummary>, DbError> {
        let rows = sqlx::query_as::<_, FeedbackSummary>(
            r#"
            SELECT
                e.id,
                e.event_name,
                COUNT(f.id) AS total_feedback,
                AVG(f.rating)::float8 AS average_rating
            FROM events e
            LEFT JOIN feedback f ON e.id = f.event_id
            GROUP BY e.id, e.event_name, e.event_date
            ORDER BY e.event_date DESC, e.id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn report(&self) -> Result<Report, DbError> {
        Ok(Report {
            total_registrations: self.total_registrations().await?,
            event_participation: self.event_participation().await?,
            feedback_summary: self.feedback_summary().await?,
        })
    }
}
