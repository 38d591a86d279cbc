//! Email address type and the allowed-domain check.
//!
//! Validation here is deliberately loose: `<local>@<domain-with-a-dot>` is
//! enough. The platform performs the authoritative validation; these checks
//! exist so obviously malformed input never leaves the console.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input does not contain an @ symbol.
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    /// The local part (before @) is empty.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain part (after @) has no interior dot.
    #[error("email domain must contain a dot")]
    MissingDotInDomain,
}

/// An email address.
///
/// ## Constraints
///
/// - At least one character before an `@` symbol
/// - After that `@`, a `.` with at least one character on each side
///
/// ## Examples
///
/// ```
/// use typhoonx_core::Email;
///
/// assert!(Email::parse("user@example.com").is_ok());
/// assert!(Email::parse("a@b.co").is_ok());
///
/// assert!(Email::parse("").is_err());            // empty
/// assert!(Email::parse("no-at-symbol").is_err()); // missing @
/// assert!(Email::parse("user@nodot").is_err());   // no dot in domain
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Does not contain an @ symbol
    /// - Has an empty local part
    /// - Has no dot with a character on each side after the @
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        let at_pos = s.find('@').ok_or(EmailError::MissingAtSymbol)?;

        // The @ that matters for the shape check is the first one with a
        // non-empty local part.
        let at_pos = if at_pos == 0 {
            match s.get(1..).and_then(|rest| rest.find('@')) {
                Some(i) => i + 1,
                None => return Err(EmailError::EmptyLocalPart),
            }
        } else {
            at_pos
        };

        let tail = s.get(at_pos + 1..).unwrap_or("");
        if !has_interior_dot(tail) {
            return Err(EmailError::MissingDotInDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// Shape check without constructing an `Email`. Never panics.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the local part of the email (before the last @).
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(local, _)| local)
    }

    /// Returns the domain part of the email (after the last @).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }

    /// Whether this email's domain matches the single allowed domain,
    /// case-insensitively.
    #[must_use]
    pub fn is_allowed_domain(&self, allowed: &str) -> bool {
        is_allowed_domain(&self.0, allowed)
    }
}

/// Whether the suffix after the *last* `@` of `value` equals `allowed`,
/// case-insensitively.
///
/// A string with no `@` is not allowed; this never errors.
#[must_use]
pub fn is_allowed_domain(value: &str, allowed: &str) -> bool {
    value
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.eq_ignore_ascii_case(allowed))
}

/// Whether `s` contains a `.` with at least one character on each side.
fn has_interior_dot(s: &str) -> bool {
    s.char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < s.len())
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
