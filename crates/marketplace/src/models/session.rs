//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use farm_market_core::UserId;

use super::user::User;

/// Session-stored account identity.
///
/// Written on successful login and never removed; there is no logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Always `true` for a stored value.
    pub loggedin: bool,
    /// User's database ID.
    pub id: UserId,
    /// User's login name.
    pub username: String,
    /// User's role.
    pub role: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            loggedin: true,
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
