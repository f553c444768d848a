//! Account fields: display name, email, password

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::validation::bounded_text;
use super::ValidationError;

const MAX_USER_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;
const MIN_PASSWORD_LEN: usize = 6;
const MAX_PASSWORD_LEN: usize = 128;

/// local@domain.tld, no whitespace, exactly one '@'
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex")
});

/// Validated display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "name", MAX_USER_NAME_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated, lowercased email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Create an email, normalising case and surrounding whitespace.
    ///
    /// # Example
    /// ```
    /// use campus_server::models::Email;
    ///
    /// assert_eq!(Email::new(" John@Example.com ").unwrap().as_str(), "john@example.com");
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let email = bounded_text(s, "email", MAX_EMAIL_LEN)?.to_lowercase();

        if !EMAIL_RE.is_match(&email) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must look like name@domain.tld",
            });
        }

        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Plain-text password awaiting hashing.
///
/// Deliberately has no `Display`, and `Debug` is redacted.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    /// Passwords are taken verbatim: no trimming.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let len = s.chars().count();

        if len == 0 {
            return Err(ValidationError::Empty { field: "password" });
        }
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

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}
