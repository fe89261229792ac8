pub mod authorization;
pub mod initiate;
pub mod password;
pub mod register;
pub mod token;
pub mod verify;
