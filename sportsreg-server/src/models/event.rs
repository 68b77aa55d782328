//! Event input validation and the registration deadline rule

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::validation::required_text;
use super::ValidationError;

const MAX_NAME_LEN: usize = 255;
const MAX_SPORT_TYPE_LEN: usize = 100;
const MAX_VENUE_LEN: usize = 255;

const REQUIRED_FIELDS_MESSAGE: &str = "All required fields must be provided";

/// Naive formats accepted besides RFC 3339; interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a client-supplied timestamp.
///
/// Accepts RFC 3339 (`2025-06-01T09:00:00+02:00`), naive date-times with a
/// `T` or space separator (UTC assumed) and bare dates (midnight UTC).
pub fn parse_timestamp(field: &'static str, s: &str) -> Result<DateTime<Utc>, ValidationError> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(ValidationError::InvalidFormat {
        field,
        reason: "must be an RFC 3339 timestamp or YYYY-MM-DD[ HH:MM[:SS]]",
    })
}

/// Registration is open up to and including the deadline instant.
pub fn registration_open(deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now <= deadline
}

/// Fully validated event for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub event_name: String,
    pub sport_type: String,
    pub event_date: DateTime<Utc>,
    pub venue: String,
    pub registration_deadline: DateTime<Utc>,
    pub description: Option<String>,
}

impl NewEvent {
    /// Validate raw request fields. All but `description` are required.
    pub fn new(
        event_name: Option<String>,
        sport_type: Option<String>,
        event_date: Option<String>,
        venue: Option<String>,
        registration_deadline: Option<String>,
        description: Option<String>,
    ) -> Result<Self, ValidationError> {
        let required = ValidationError::Required {
            message: REQUIRED_FIELDS_MESSAGE,
        };
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        if ![&event_name, &sport_type, &event_date, &venue, &registration_deadline]
            .into_iter()
            .all(present)
        {
            return Err(required);
        }

        Ok(Self {
            event_name: required_text(event_name, "event_name", MAX_NAME_LEN)?,
            sport_type: required_text(sport_type, "sport_type", MAX_SPORT_TYPE_LEN)?,
            event_date: parse_timestamp("event_date", event_date.as_deref().unwrap_or_default())?,
            venue: required_text(venue, "venue", MAX_VENUE_LEN)?,
            registration_deadline: parse_timestamp(
                "registration_deadline",
                registration_deadline.as_deref().unwrap_or_default(),
            )?,
            description: optional_description(description),
        })
    }
}

/// Partial update: `None` keeps the stored value.
///
/// `description` is two-level: `None` keeps, `Some(None)` clears,
/// `Some(Some(text))` overwrites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub event_name: Option<String>,
    pub sport_type: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub description: Option<Option<String>>,
}

impl EventPatch {
    pub fn new(
        event_name: Option<String>,
        sport_type: Option<String>,
        event_date: Option<String>,
        venue: Option<String>,
        registration_deadline: Option<String>,
        description: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            event_name: event_name
                .map(|v| required_text(Some(v), "event_name", MAX_NAME_LEN))
                .transpose()?,
            sport_type: sport_type
                .map(|v| required_text(Some(v), "sport_type", MAX_SPORT_TYPE_LEN))
                .transpose()?,
            event_date: event_date
                .map(|v| parse_timestamp("event_date", &v))
                .transpose()?,
            venue: venue
                .map(|v| required_text(Some(v), "venue", MAX_VENUE_LEN))
                .transpose()?,
            registration_deadline: registration_deadline
                .map(|v| parse_timestamp("registration_deadline", &v))
                .transpose()?,
            description: description.map(|d| optional_description(Some(d))),
        })
    }
}

fn optional_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_owned())
        .filter(|d| !d.is_empty())
}
