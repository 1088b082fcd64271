pub mod classify;
pub mod config;
pub mod platform;
pub mod protocol;
