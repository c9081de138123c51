//! Secret string wrapper for sensitive data.
//!
//! Keeps bearer tokens out of `Debug`/`Display` output so a logged
//! [`crate::config::Config`] never leaks them.

use std::fmt;

/// A string whose value is redacted in `Debug` and `Display` output.
///
/// # Example
///
/// ```
/// use promdash::config::SecretString;
///
/// let token = SecretString::new("glsa_panel_token");
/// assert_eq!(format!("{token:?}"), "<REDACTED>");
/// assert_eq!(token.expose(), "glsa_panel_token");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap a secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The underlying value. Only call this where the secret is sent.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if the secret is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
