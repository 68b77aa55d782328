//! Registration participation status

use serde::{Deserialize, Serialize};

/// Tri-state participation status of a registration.
///
/// New registrations start as `Registered`. The registering user can move
/// it to `Participated`; `Absent` exists in the schema but no endpoint sets
/// it. Transitions are not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "participation_status", rename_all = "lowercase")]
pub enum ParticipationStatus {
    Registered,
    Participated,
    Absent,
}
