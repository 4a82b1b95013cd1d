//! Layered configuration.

use config::{Config, File, FileFormat};
use derive_getters::Getters;
use magicbook_core::Voice;
use magicbook_error::{ConfigError, MagicBookError, MagicBookResult};
use magicbook_models::{DEFAULT_BASE_URL, IllustratorSettings, NarratorSettings, WriterSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = include_str!("../../../magicbook.toml");

/// Media cache location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct CacheSection {
    /// Blob table root; platform cache directory when unset
    #[serde(default)]
    directory: Option<PathBuf>,
}

/// Stored book location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct LibrarySection {
    /// Bookshelf root; platform data directory when unset
    #[serde(default)]
    directory: Option<PathBuf>,
}

/// Remote service endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ApiSection {
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    base_url: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    api_key_env: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Narration settings, including the voice given to new books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct NarratorSection {
    /// Speech model identifier
    #[serde(default = "default_speech_model")]
    model: String,
    /// Default voice for books
    #[serde(default)]
    voice: Voice,
    /// Speed multiplier
    #[serde(default = "default_speed")]
    speed: f32,
}

fn default_speech_model() -> String {
    NarratorSettings::default().model().clone()
}

fn default_speed() -> f32 {
    *NarratorSettings::default().speed()
}

impl Default for NarratorSection {
    fn default() -> Self {
        Self {
            model: default_speech_model(),
            voice: Voice::default(),
            speed: default_speed(),
        }
    }
}

impl NarratorSection {
    /// Request settings for the speech service.
    pub fn settings(&self) -> NarratorSettings {
        NarratorSettings::default()
            .with_model(self.model.clone())
            .with_speed(self.speed)
    }
}

/// Complete Magicbook configuration.
///
/// # TOML Format
///
/// ```toml
/// [cache]
/// directory = "/tmp/magicbook/media"
///
/// [api]
/// base_url = "https://api.openai.com/v1"
/// api_key_env = "OPENAI_API_KEY"
///
/// [writer]
/// model = "gpt-4-0125-preview"
/// max_tokens = 2048
///
/// [narrator]
/// voice = "nova"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct MagicBookConfig {
    /// Media cache
    #[serde(default)]
    cache: CacheSection,
    /// Stored books
    #[serde(default)]
    library: LibrarySection,
    /// Remote endpoint
    #[serde(default)]
    api: ApiSection,
    /// Book text generation
    #[serde(default)]
    writer: WriterSettings,
    /// Page illustration
    #[serde(default)]
    illustrator: IllustratorSettings,
    /// Paragraph narration
    #[serde(default)]
    narrator: NarratorSection,
}

impl MagicBookConfig {
    /// Load configuration from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> MagicBookResult<Self> {
        tracing::debug!(path = %path.as_ref().display(), "Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                MagicBookError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                MagicBookError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: current dir > home dir > bundled
    /// defaults.
    ///
    /// 1. Bundled defaults (`magicbook.toml` shipped with the binary)
    /// 2. `~/.config/magicbook/magicbook.toml`
    /// 3. `./magicbook.toml`
    ///
    /// Missing user files are skipped.
    ///
    /// # Errors
    ///
    /// Returns error if a present file cannot be parsed.
    pub fn load() -> MagicBookResult<Self> {
        tracing::debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/magicbook/magicbook.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("magicbook").required(false));

        builder
            .build()
            .map_err(|e| {
                MagicBookError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                MagicBookError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Blob table root: the configured directory or
    /// `{platform cache dir}/magicbook/media`.
    pub fn cache_directory(&self) -> PathBuf {
        self.cache.directory.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("magicbook")
                .join("media")
        })
    }

    /// Bookshelf root: the configured directory or
    /// `{platform data dir}/magicbook/books`.
    pub fn library_directory(&self) -> PathBuf {
        self.library.directory.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("magicbook")
                .join("books")
        })
    }
}
