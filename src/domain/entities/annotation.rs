use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Likelihood;

/// Safe-search verdict for a single image
///
/// Only `adult` and `violence` take part in the moderation decision; the
/// remaining categories are kept for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeSearchAnnotation {
    pub adult: Likelihood,
    pub violence: Likelihood,
    pub racy: Likelihood,
    pub medical: Likelihood,
    pub spoof: Likelihood,
}

impl SafeSearchAnnotation {
    pub fn new(adult: Likelihood, violence: Likelihood) -> Self {
        Self { adult, violence, ..Self::default() }
    }

    #[must_use]
    pub fn is_flagged(&self) -> bool {
        self.adult.is_flagged() || self.violence.is_flagged()
    }
}

/// A single sampled frame from explicit-content detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitFrame {
    pub time_offset: Option<String>,
    pub pornography_likelihood: Likelihood,
}

/// Explicit-content verdict for a video, one entry per sampled frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitContentAnnotation {
    pub frames: Vec<ExplicitFrame>,
}

impl ExplicitContentAnnotation {
    pub fn new(frames: Vec<ExplicitFrame>) -> Self {
        Self { frames }
    }

    /// Flagged when any frame reaches the threshold; no frames means not flagged
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        self.frames.iter().any(|frame| frame.pornography_likelihood.is_flagged())
    }

    /// Highest likelihood across all frames
    pub fn peak(&self) -> Likelihood {
        self.frames.iter().map(|frame| frame.pornography_likelihood).max().unwrap_or_default()
    }

    pub fn flagged_frames(&self) -> usize {
        self.frames.iter().filter(|frame| frame.pornography_likelihood.is_flagged()).count()
    }
}
