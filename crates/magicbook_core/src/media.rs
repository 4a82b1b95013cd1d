//! Kinds of generated media.

use serde::{Deserialize, Serialize};

/// What a cached payload holds. The cache itself does not care; this is
/// used for logging and for file extensions on export.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Page illustration
    Image,
    /// Paragraph narration
    Audio,
}

impl MediaKind {
    /// File extension used when exporting payloads of this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Image => "png",
            MediaKind::Audio => "mp3",
        }
    }
}
