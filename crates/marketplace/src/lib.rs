//! Farm Market library.
//!
//! Accounts, a product catalog, orders, and two prediction endpoints (crop
//! disease from a leaf photo, crop recommendation from soil and weather)
//! served as server-rendered pages. The binary in `main.rs` wires these
//! modules together; the CLI reuses them for migrations and model checks.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
