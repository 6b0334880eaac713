pub mod likelihood;
pub mod media_kind;

pub use likelihood::Likelihood;
pub use media_kind::MediaKind;
