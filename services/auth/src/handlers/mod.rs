pub mod authorization;
pub mod login;
pub mod register;
pub mod token;
