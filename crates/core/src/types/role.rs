//! Account role type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Role`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RoleError {
    /// The input string does not fit the `users.role` column.
    #[error("role must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Free-form account role chosen at registration (e.g. `farmer`, `consumer`).
///
/// Roles are stored and returned in the session but never used for
/// authorization decisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Maximum length of a role.
    pub const MAX_LENGTH: usize = 20;

    /// Parse a `Role` from a string.
    ///
    /// # Errors
    ///
    /// Returns `RoleError::TooLong` if the input is longer than 20 characters.
    pub fn parse(s: &str) -> Result<Self, RoleError> {
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(RoleError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the role as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_any_short_value() {
        assert_eq!(Role::parse("farmer").map(|r| r.to_string()).ok().as_deref(), Some("farmer"));
        assert!(Role::parse("").is_ok());
    }

    #[test]
    fn test_parse_too_long() {
        assert_eq!(
            Role::parse(&"x".repeat(21)),
            Err(RoleError::TooLong { max: 20 })
        );
    }
}
