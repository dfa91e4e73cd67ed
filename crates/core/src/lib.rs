//! Farm Market Core - Shared domain types.
//!
//! This crate provides the validated types used by the marketplace server,
//! the CLI and the integration tests:
//! - `marketplace` - HTTP server for accounts, products, orders and predictions
//! - `cli` - Command-line tools for migrations and model checks
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Database encoding is available behind the `postgres`
//! feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, usernames, emails, roles and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
