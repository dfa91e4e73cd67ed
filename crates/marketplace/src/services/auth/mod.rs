//! Authentication service.
//!
//! Provides registration and username/password login. Passwords are stored as
//! `hex(SHA-1(password || secret_key))`, the scheme existing accounts were
//! created with.

mod error;

pub use error::AuthError;

use secrecy::{ExposeSecret, SecretString};
use sha1::{Digest, Sha1};
use sqlx::PgPool;

use farm_market_core::{Email, Role, Username};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::{NewUser, User};

/// Message rendered after a successful registration.
pub const REGISTERED_MESSAGE: &str = "You have successfully registered!";

/// Body returned after a successful login.
pub const LOGGED_IN_MESSAGE: &str = "Logged in successfully!";

/// Raw registration form values.
#[derive(Debug, Clone, Copy)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
    pub role: &'a str,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    secret_key: &'a SecretString,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, secret_key: &'a SecretString) -> Self {
        Self {
            users: UserRepository::new(pool),
            secret_key,
        }
    }

    /// Register a new account.
    ///
    /// The existing-username check runs before field validation so that a
    /// taken username is always reported first. The unique index on
    /// `users.username` settles concurrent registrations.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccountExists` if the username is taken.
    /// Returns a validation variant (see [`validate_registration`]) for bad input.
    /// Returns `AuthError::Repository` if the database fails.
    pub async fn register(&self, form: Registration<'_>) -> Result<User, AuthError> {
        if self.users.username_exists(form.username).await? {
            return Err(AuthError::AccountExists);
        }

        let new_user = validate_registration(form, self.secret_key)?;

        self.users.create(&new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::AccountExists,
            other => AuthError::Repository(other),
        })
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no account matches.
    /// Returns `AuthError::Repository` if the database fails.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let password_hash = hash_password(password, self.secret_key);

        self.users
            .find_by_credentials(username, &password_hash)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }
}

/// Validate registration fields and hash the password.
///
/// Checks run in a fixed order and the first failure wins: email format,
/// username format, empty password, role length.
///
/// # Errors
///
/// Returns `AuthError::InvalidEmail`, `AuthError::InvalidUsername`,
/// `AuthError::MissingFields` or `AuthError::InvalidRole`.
pub fn validate_registration(
    form: Registration<'_>,
    secret_key: &SecretString,
) -> Result<NewUser, AuthError> {
    let email = Email::parse(form.email)?;
    let username = Username::parse(form.username)?;

    if form.password.is_empty() {
        return Err(AuthError::MissingFields);
    }

    let role = Role::parse(form.role)?;

    Ok(NewUser {
        username,
        email,
        password_hash: hash_password(form.password, secret_key),
        role,
    })
}

/// Hash a password with the application secret appended.
#[must_use]
pub fn hash_password(password: &str, secret_key: &SecretString) -> String {
    let mut hasher = Sha1::new();
    hasher.update(password.as_bytes());
    hasher.update(secret_key.expose_secret().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("bc")
    }

    fn form<'a>(username: &'a str, password: &'a str, email: &'a str) -> Registration<'a> {
        Registration {
            username,
            password,
            email,
            role: "consumer",
        }
    }

    fn message(result: Result<NewUser, AuthError>) -> Option<&'static str> {
        result.err().and_then(|e| e.form_message())
    }

    #[test]
    fn test_hash_appends_secret_before_hashing() {
        // SHA-1("abc")
        assert_eq!(
            hash_password("a", &secret()),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_hash_fits_password_column() {
        assert_eq!(hash_password("pw1", &secret()).len(), 40);
    }

    #[test]
    fn test_hash_depends_on_secret() {
        let other = SecretString::from("another-key");
        assert_ne!(hash_password("pw1", &secret()), hash_password("pw1", &other));
    }

    #[test]
    fn test_valid_registration() {
        let user = validate_registration(form("alice", "pw1", "alice@x.com"), &secret()).unwrap();
        assert_eq!(user.username.as_str(), "alice");
        assert_eq!(user.email.as_str(), "alice@x.com");
        assert_eq!(user.role.as_str(), "consumer");
        assert_eq!(user.password_hash, hash_password("pw1", &secret()));
    }

    #[test]
    fn test_email_without_domain_is_rejected() {
        for email in ["alice", "alice@", "alice@x", "@x.com", ""] {
            assert_eq!(
                message(validate_registration(form("alice", "pw1", email), &secret())),
                Some("Invalid email address!"),
                "{email:?}"
            );
        }
    }

    #[test]
    fn test_non_alphanumeric_username_is_rejected() {
        for username in ["alice!", "al ice", "alice-b", ""] {
            assert_eq!(
                message(validate_registration(form(username, "pw1", "a@x.com"), &secret())),
                Some("Username must contain only characters and numbers!"),
                "{username:?}"
            );
        }
    }

    #[test]
    fn test_email_is_checked_before_username() {
        assert_eq!(
            message(validate_registration(form("alice!", "pw1", "bad"), &secret())),
            Some("Invalid email address!")
        );
    }

    #[test]
    fn test_empty_password_asks_to_fill_form() {
        assert_eq!(
            message(validate_registration(form("alice", "", "a@x.com"), &secret())),
            Some("Please fill out the form!")
        );
    }

    #[test]
    fn test_oversized_username_and_role() {
        let long_name = "a".repeat(51);
        assert_eq!(
            message(validate_registration(form(&long_name, "pw1", "a@x.com"), &secret())),
            Some("Username must be at most 50 characters!")
        );

        let long_role = "r".repeat(21);
        let registration = Registration {
            role: &long_role,
            ..form("alice", "pw1", "a@x.com")
        };
        assert_eq!(
            message(validate_registration(registration, &secret())),
            Some("Role must be at most 20 characters!")
        );
    }

    #[test]
    fn test_repository_errors_have_no_form_message() {
        let err = AuthError::Repository(RepositoryError::Database(sqlx::Error::RowNotFound));
        assert_eq!(err.form_message(), None);
        assert_eq!(
            AuthError::InvalidCredentials.form_message(),
            Some("Incorrect username/password!")
        );
    }
}
