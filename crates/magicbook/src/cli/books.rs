//! `list` and `render` command handlers.

use super::commands::OutputFormat;
use super::generate::print_report;
use super::open_library;
use magicbook::{
    BookError, BookErrorKind, BookKey, Bookshelf, JsonError, MagicBookConfig, MagicBookResult,
    MediaKind, PlaybackError, PlaybackErrorKind, StorageError, StorageErrorKind,
};
use std::path::Path;

/// Print every stored book.
pub async fn list_books(config: &MagicBookConfig, format: OutputFormat) -> MagicBookResult<()> {
    let shelf = Bookshelf::new(config.library_directory())?;
    let books = shelf.list().await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&books)
                .map_err(|e| JsonError::new(e.to_string()))?;
            println!("{}", json);
        }
        OutputFormat::Human => {
            println!("Books in {}:", shelf.directory().display());
            println!("{:-<80}", "");
            for book in &books {
                println!(
                    "{}  {}  {} ({} pages)",
                    book.key(),
                    book.created_at().format("%Y-%m-%d %H:%M"),
                    book.title().as_deref().unwrap_or(book.prompt()),
                    book.pages().len()
                );
            }
            println!("{:-<80}", "");
            println!("Total: {} books", books.len());
        }
        OutputFormat::KeysOnly => {
            for book in &books {
                println!("{}", book.key());
            }
        }
    }

    Ok(())
}

/// Generate a stored book's media and write it to `output` in document
/// order: `NN-image.png` per figure, `NN-PP-audio.mp3` per narrated paragraph.
pub async fn render_book(
    config: &MagicBookConfig,
    key: &str,
    output: &Path,
    voice: Option<String>,
) -> MagicBookResult<()> {
    let key = BookKey::parse(key).ok_or_else(|| {
        BookError::new(BookErrorKind::Parse(format!("not a book key: {}", key)))
    })?;

    let library = open_library(config, voice)?;
    let opened = library.open_book(&key).await?.ok_or_else(|| {
        StorageError::new(StorageErrorKind::NotFound(format!("no stored book {}", key)))
    })?;

    let report = opened
        .processing
        .await
        .map_err(|e| PlaybackError::new(PlaybackErrorKind::TaskFailed(e.to_string())))?;

    tokio::fs::create_dir_all(output).await.map_err(|e| {
        StorageError::new(StorageErrorKind::DirectoryCreation(format!(
            "{}: {}",
            output.display(),
            e
        )))
    })?;

    let surface = library.surface();
    let mut written = 0usize;
    for figure in opened.view.figures() {
        let index = figure.id().index;

        if let Some(image) = figure.image().source() {
            let name = format!("{:02}-{}.{}", index, MediaKind::Image, MediaKind::Image.extension());
            write_media(&output.join(name), image).await?;
            written += 1;
        }

        for paragraph in figure.paragraphs() {
            let Some(clip) = paragraph.clip() else {
                continue;
            };
            let Some(clip) = surface.clip(clip).await else {
                continue;
            };
            let name = format!(
                "{:02}-{:02}-{}.{}",
                index,
                paragraph.index(),
                MediaKind::Audio,
                MediaKind::Audio.extension()
            );
            write_media(&output.join(name), clip.audio()).await?;
            written += 1;
        }
    }

    println!("Rendered {} to {}", key, output.display());
    print_report(&report);
    println!("  files:     {}", written);
    Ok(())
}

async fn write_media(path: &Path, bytes: &[u8]) -> MagicBookResult<()> {
    tokio::fs::write(path, bytes).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!("{}: {}", path.display(), e)))
    })?;
    tracing::debug!(path = %path.display(), size = bytes.len(), "Wrote media file");
    Ok(())
}
