//! Caller roles
//!
//! Stored as the `user_role` enum type in PostgreSQL and carried in session
//! tokens. Admin gating compares against this enum, never raw strings.

use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_matches_wire_name() {
        for role in [Role::User, Role::Admin] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json.trim_matches('"'), role.as_str());
        }
    }

    #[test]
    fn rejects_unknown_role() {
        assert!(serde_json::from_str::<Role>(r#""superuser""#).is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        let role: Role = serde_json::from_str(r#""user""#).unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn only_admin_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }
}
