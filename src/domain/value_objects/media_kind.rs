use serde::{Deserialize, Serialize};

/// Category of upload a moderation pipeline is responsible for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// MIME category prefix the declared content type must start with
    #[must_use]
    pub fn content_type_marker(self) -> &'static str {
        match self {
            Self::Image => "image/",
            Self::Video => "video/",
        }
    }

    /// Check whether a declared content type belongs to this kind
    ///
    /// A plain prefix match: `Image/WebP` or ` image/png` are not images.
    #[must_use]
    pub fn accepts(self, content_type: Option<&str>) -> bool {
        content_type.is_some_and(|ct| ct.starts_with(self.content_type_marker()))
    }

    /// Message logged when an event is ignored by this pipeline
    #[must_use]
    pub fn skip_message(self) -> &'static str {
        match self {
            Self::Image => "Only format images",
            Self::Video => "Only transcode videos",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
