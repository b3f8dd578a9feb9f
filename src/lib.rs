pub mod error;
pub mod extract;
pub mod models;
pub mod persist;
pub mod resolve;
pub mod server;
