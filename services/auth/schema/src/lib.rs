//! SeaORM entities for the auth service tables.

pub mod access_events;
pub mod accounts;
pub mod authorizations;
pub mod verification_challenges;
