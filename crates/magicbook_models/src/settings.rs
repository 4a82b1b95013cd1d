//! Per-service request settings.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Settings for book text generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_", into)]
pub struct WriterSettings {
    /// Chat model identifier
    #[serde(default = "default_writer_model")]
    model: String,

    /// Maximum tokens in the reply
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
}

fn default_writer_model() -> String {
    "gpt-4-0125-preview".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self {
            model: default_writer_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Settings for page illustration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_", into)]
pub struct IllustratorSettings {
    /// Image model identifier
    #[serde(default = "default_image_model")]
    model: String,

    /// Image dimensions, e.g. `1024x1024`
    #[serde(default = "default_size")]
    size: String,
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_size() -> String {
    "1024x1024".to_string()
}

impl Default for IllustratorSettings {
    fn default() -> Self {
        Self {
            model: default_image_model(),
            size: default_size(),
        }
    }
}

/// Settings for paragraph narration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_", into)]
pub struct NarratorSettings {
    /// Speech model identifier
    #[serde(default = "default_speech_model")]
    model: String,

    /// Playback speed multiplier sent to the service
    #[serde(default = "default_speed")]
    speed: f32,
}

fn default_speech_model() -> String {
    "tts-1".to_string()
}

fn default_speed() -> f32 {
    1.0
}

impl Default for NarratorSettings {
    fn default() -> Self {
        Self {
            model: default_speech_model(),
            speed: default_speed(),
        }
    }
}
