//! Command-line interface module.

mod books;
mod cache;
mod commands;
mod generate;

pub use books::{list_books, render_book};
pub use cache::evict_entry;
pub use commands::{Cli, Commands};
pub use generate::generate_book;

use magicbook::{
    Bookshelf, FileSystemBlobTable, GenerationCache, Library, MagicBookConfig, MagicBookResult,
    OpenAiClient, OpenAiIllustrator, OpenAiNarrator, OpenAiWriter, ReadingSurface, Sequencer,
};
use std::sync::Arc;

/// Library wired to the OpenAI services and the filesystem cache.
pub type OpenAiLibrary = Library<OpenAiWriter, FileSystemBlobTable, OpenAiIllustrator, OpenAiNarrator>;

/// Media cache backed by the configured directory.
pub fn open_cache(config: &MagicBookConfig) -> Arc<GenerationCache<FileSystemBlobTable>> {
    Arc::new(GenerationCache::new(FileSystemBlobTable::new(
        config.cache_directory(),
    )))
}

/// Build a library from configuration.
///
/// # Errors
///
/// Returns error if the API key is missing or the bookshelf directory cannot
/// be created.
pub fn open_library(config: &MagicBookConfig, voice: Option<String>) -> MagicBookResult<OpenAiLibrary> {
    let client = OpenAiClient::from_env(config.api().api_key_env())?
        .with_base_url(config.api().base_url().clone());

    let writer = OpenAiWriter::new(client.clone(), config.writer().clone());
    let illustrator = OpenAiIllustrator::new(client.clone(), config.illustrator().clone());
    let narrator = OpenAiNarrator::new(client, config.narrator().settings());

    let sequencer = Arc::new(Sequencer::new(
        open_cache(config),
        illustrator,
        narrator,
        ReadingSurface::new(),
    ));
    let shelf = Bookshelf::new(config.library_directory())?;

    let voice = voice.map_or_else(|| config.narrator().voice().clone(), Into::into);
    tracing::debug!(
        model = %config.writer().model(),
        voice = %voice,
        "Opened library"
    );
    Ok(Library::new(writer, shelf, sequencer).with_voice(voice))
}
