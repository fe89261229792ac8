//! Domain types shared across the Ancora services and the login-flow client.
//!
//! This crate contains only pure types with no framework dependencies
//! and no I/O.

pub mod contract;
pub mod identifier;
pub mod pagination;
pub mod user;
