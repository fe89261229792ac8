//! Shared service plumbing: health endpoints, middleware, tracing, serde helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
