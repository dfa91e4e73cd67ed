//! Authentication error types.

use thiserror::Error;

use farm_market_core::{EmailError, RoleError, UsernameError};

use crate::db::RepositoryError;

/// Errors that can occur during registration and login.
///
/// Every variant except `Repository` is a form-level outcome with a
/// human-readable message (see [`AuthError::form_message`]).
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username already registered.
    #[error("account already exists")]
    AccountExists,

    /// Email does not look like `name@domain.tld`.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Username is empty, too long, or not alphanumeric.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Role does not fit the `users.role` column.
    #[error("invalid role: {0}")]
    InvalidRole(#[from] RoleError),

    /// A required field is empty.
    #[error("missing required field")]
    MissingFields,

    /// Username/password pair does not match any account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Message shown on the form for this outcome, or `None` for server faults.
    #[must_use]
    pub const fn form_message(&self) -> Option<&'static str> {
        match self {
            Self::AccountExists => Some("Account already exists!"),
            Self::InvalidEmail(_) => Some("Invalid email address!"),
            Self::InvalidUsername(UsernameError::TooLong { .. }) => {
                Some("Username must be at most 50 characters!")
            }
            Self::InvalidUsername(_) => {
                Some("Username must contain only characters and numbers!")
            }
            Self::InvalidRole(_) => Some("Role must be at most 20 characters!"),
            Self::MissingFields => Some("Please fill out the form!"),
            Self::InvalidCredentials => Some("Incorrect username/password!"),
            Self::Repository(_) => None,
        }
    }
}
