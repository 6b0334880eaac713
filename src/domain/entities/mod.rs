pub mod annotation;
pub mod upload_event;

pub use annotation::*;
pub use upload_event::*;
