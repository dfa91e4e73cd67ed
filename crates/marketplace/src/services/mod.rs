//! Business logic services.
//!
//! - [`auth`] - Registration, login and password hashing
//! - [`disease`] - Image preprocessing and the crop disease classifier
//! - [`recommend`] - Crop recommendation from soil and weather features

pub mod auth;
pub mod disease;
pub mod recommend;
