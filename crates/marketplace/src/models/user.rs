//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use farm_market_core::{Email, Role, UserId, Username};

/// A registered account as read back from the database.
///
/// Fields are kept as stored; rows written before username validation was
/// tightened may not satisfy [`Username`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Role chosen at registration.
    pub role: String,
}

/// A validated account ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    /// Hex digest produced by [`crate::services::auth::hash_password`].
    pub password_hash: String,
    pub role: Role,
}
