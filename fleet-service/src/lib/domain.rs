pub mod address;
pub mod auth;
pub mod client;
pub mod tenant;
