//! Client-side login flow: step controller, form validation, session
//! persistence and the background token refresh driver.
//!
//! The crate is transport-agnostic. UI code renders from [`controller::LoginStep`],
//! validates input through [`forms`], calls the auth service however it likes,
//! and feeds the typed outcomes back into the controller. [`refresh::RefreshDriver`]
//! keeps a persisted session alive through the [`refresh::SessionApi`] port.

pub mod controller;
pub mod forms;
pub mod refresh;
pub mod session;
