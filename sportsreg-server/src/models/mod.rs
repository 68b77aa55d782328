//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod role;
pub mod participation;
pub mod rating;
pub mod user;
pub mod event;

pub use validation::ValidationError;
pub use role::Role;
pub use participation::ParticipationStatus;
pub use rating::Rating;
pub use user::{Email, NewPassword};
pub use event::{parse_timestamp, registration_open, EventPatch, NewEvent};
