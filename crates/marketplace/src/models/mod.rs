//! Domain models for the marketplace.

pub mod product;
pub mod session;
pub mod user;

pub use session::{CurrentUser, keys as session_keys};
