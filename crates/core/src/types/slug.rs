//! Public username slug for menu URLs.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum UsernameError {
    /// The input is shorter than the minimum length.
    #[error("username must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input is longer than the maximum length.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9-]`.
    #[error("username may only contain lowercase letters, digits and hyphens")]
    InvalidCharacter,
    /// The input starts or ends with a hyphen.
    #[error("username cannot start or end with a hyphen")]
    EdgeHyphen,
    /// The slug collides with a reserved route.
    #[error("username '{0}' is reserved")]
    Reserved(String),
}

/// Route segments that can never be claimed as usernames.
///
/// The public site mounts the menu at `/{username}`, so anything that is also
/// a top-level storefront route must be rejected at registration time.
const RESERVED: &[&str] = &[
    "health", "static", "cart", "checkout", "orders", "api", "auth", "admin",
];

/// A restaurant's public URL slug.
///
/// The published menu lives at `/{username}`, so the slug is restricted to
/// lowercase URL-safe characters and checked against reserved routes.
///
/// ```
/// use menulane_core::Username;
///
/// assert!(Username::parse("mamas-kitchen").is_ok());
/// assert!(Username::parse("Mamas Kitchen").is_err()); // uppercase + space
/// assert!(Username::parse("-mamas").is_err());        // edge hyphen
/// assert!(Username::parse("cart").is_err());          // reserved route
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Minimum slug length.
    pub const MIN_LENGTH: usize = 3;
    /// Maximum slug length.
    pub const MAX_LENGTH: usize = 30;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is outside the length bounds, contains
    /// a character other than `[a-z0-9-]`, starts or ends with a hyphen, or
    /// collides with a reserved route.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if s.len() < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(UsernameError::InvalidCharacter);
        }

        if s.starts_with('-') || s.ends_with('-') {
            return Err(UsernameError::EdgeHyphen);
        }

        if RESERVED.contains(&s) {
            return Err(UsernameError::Reserved(s.to_owned()));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Username::parse("mamas-kitchen").is_ok());
        assert!(Username::parse("suya-spot-42").is_ok());
        assert!(Username::parse("abc").is_ok());
    }

    #[test]
    fn test_length_bounds() {
        assert!(matches!(
            Username::parse("ab"),
            Err(UsernameError::TooShort { .. })
        ));
        assert!(matches!(
            Username::parse(&"a".repeat(31)),
            Err(UsernameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_invalid_characters() {
        assert!(matches!(
            Username::parse("Mamas"),
            Err(UsernameError::InvalidCharacter)
        ));
        assert!(matches!(
            Username::parse("mamas kitchen"),
            Err(UsernameError::InvalidCharacter)
        ));
        assert!(matches!(
            Username::parse("mamas_kitchen"),
            Err(UsernameError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_edge_hyphen() {
        assert!(matches!(
            Username::parse("-mamas"),
            Err(UsernameError::EdgeHyphen)
        ));
        assert!(matches!(
            Username::parse("mamas-"),
            Err(UsernameError::EdgeHyphen)
        ));
    }

    #[test]
    fn test_reserved_routes() {
        for reserved in ["cart", "checkout", "health", "api"] {
            assert!(matches!(
                Username::parse(reserved),
                Err(UsernameError::Reserved(_))
            ));
        }
    }
}
