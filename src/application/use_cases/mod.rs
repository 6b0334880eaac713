mod moderate_image;
mod moderate_video;
mod moderation;
mod replace_with_placeholder;

pub use moderate_image::ModerateImageUseCase;
pub use moderate_video::ModerateVideoUseCase;
pub use moderation::{PlaceholderAssets, accept_event};
pub use replace_with_placeholder::PlaceholderReplacer;
