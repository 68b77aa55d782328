//! Account field validation - email and password

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

const MAX_EMAIL_LEN: usize = 255;
const MIN_PASSWORD_LEN: usize = 6;
const MAX_PASSWORD_LEN: usize = 128;

/// Loose address shape: something@something.tld, no whitespace
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// Validated, normalized (trimmed, lowercased) email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// # Example
    /// ```
    /// use sportsreg_server::models::Email;
    ///
    /// assert_eq!(Email::new(" Jo@Example.com ").unwrap().as_str(), "jo@example.com");
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim().to_lowercase();

        if s.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }

        if s.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }

        if !EMAIL_RE.is_match(&s) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must be a valid email address",
            });
        }

        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plaintext password accepted at signup. Never stored or logged.
pub struct NewPassword(String);

impl NewPassword {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let len = s.chars().count();
        if len < MIN_PASSWORD_LEN {
            return Err(ValidationError::TooShort {
                field: "password",
                min: MIN_PASSWORD_LEN,
            });
        }
        if len > MAX_PASSWORD_LEN {
            return Err(ValidationError::TooLong {
                field: "password",
                max: MAX_PASSWORD_LEN,
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NewPassword([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_emails() {
        assert!(Email::new("a@b.co").is_ok());
        assert!(Email::new("first.last+tag@sub.example.org").is_ok());
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        let email = Email::new("  Admin@Sports.COM\n").unwrap();
        assert_eq!(email.as_str(), "admin@sports.com");
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["plain", "a@b", "@b.com", "a b@c.com", "a@@b.com"] {
            let err = Email::new(bad).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidFormat { field: "email", .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            Email::new("   ").unwrap_err(),
            ValidationError::Empty { field: "email" }
        ));
    }

    #[test]
    fn password_length() {
        assert!(NewPassword::new("12345").is_err());
        assert!(NewPassword::new("123456").is_ok());
        assert!(NewPassword::new(&"x".repeat(129)).is_err());
    }

    #[test]
    fn password_debug_is_redacted() {
        let pw = NewPassword::new("hunter22").unwrap();
        assert!(!format!("{:?}", pw).contains("hunter22"));
    }
}
