pub mod db;
pub mod delivery;
pub mod provider;
