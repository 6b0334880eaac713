pub mod client;
pub mod models;

pub use client::StreamClient;
pub use models::*;
