//! Token types shared between the auth service and its consumers.
//!
//! Provides JWT validation and the `BearerToken` extractor.

pub mod bearer;
pub mod token;
