//! Auth and bootstrap configuration
//!
//! Values are resolved by the CLI (flags, environment, `.env`) and handed
//! over as these structs.

use chrono::Duration;

use crate::auth::TokenKeys;

/// Default token lifetime (7 days)
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 168;

/// Token settings
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::hours(ttl_hours.max(1)),
        }
    }

    pub fn token_keys(&self) -> TokenKeys {
        TokenKeys::new(self.jwt_secret.as_bytes(), self.token_ttl)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Administrator account seeded at first startup
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl Default for BootstrapAdmin {
    fn default() -> Self {
        Self {
            name: "Admin".to_string(),
            email: "admin@sports.com".to_string(),
            phone: "1234567890".to_string(),
            password: "admin123".to_string(),
        }
    }
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_is_clamped_to_an_hour() {
        assert_eq!(AuthConfig::new("s", 0).token_ttl, Duration::hours(1));
        assert_eq!(AuthConfig::new("s", 24).token_ttl, Duration::hours(24));
    }

    #[test]
    fn default_admin() {
        let admin = BootstrapAdmin::default();
        assert_eq!(admin.email, "admin@sports.com");
        assert_eq!(admin.name, "Admin");
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?} {:?}", AuthConfig::new("topsecret", 1), BootstrapAdmin::default());
        assert!(!rendered.contains("topsecret"));
        assert!(!rendered.contains("admin123"));
    }
}
