pub mod client;
pub mod controller;
pub mod enqueue;
pub mod logging;
pub mod notify;
pub mod session;
