pub mod auth;
pub mod spots;
