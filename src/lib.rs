#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(warnings)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]

//! Upload Moderation Service
//!
//! Reacts to "object finalized" events from a storage bucket. Images and
//! videos are checked with remote content-safety classifiers; flagged
//! uploads are overwritten with a fixed placeholder, and clean videos are
//! handed to a transcoding service through a time-limited signed URL.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

#[cfg(test)]
pub mod test_utils;

pub use application::dto::{ModerationOutcome, StorageObjectData};
pub use domain::entities::*;
