//! Middleware modules for HTTP request processing

pub mod error;

pub use error::{AppError, ErrorResponse};
