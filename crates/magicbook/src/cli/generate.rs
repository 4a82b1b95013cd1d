//! `generate` command handler.

use super::open_library;
use magicbook::{MagicBookConfig, MagicBookResult, PlaybackError, PlaybackErrorKind, ProcessReport};

/// Create a book from `prompt`, wait for its media, and print a summary.
pub async fn generate_book(
    config: &MagicBookConfig,
    prompt: &str,
    voice: Option<String>,
) -> MagicBookResult<()> {
    let library = open_library(config, voice)?;
    let opened = library.create_book(prompt).await?;
    let book = &opened.book;

    println!(
        "Created {} {}({} pages)",
        book.key(),
        book.title()
            .as_ref()
            .map(|t| format!("\"{}\" ", t))
            .unwrap_or_default(),
        book.pages().len()
    );

    let report = opened
        .processing
        .await
        .map_err(|e| PlaybackError::new(PlaybackErrorKind::TaskFailed(e.to_string())))?;
    print_report(&report);
    Ok(())
}

pub(super) fn print_report(report: &ProcessReport) {
    println!(
        "  images:    {} generated, {} failed",
        report.images(),
        report.image_failures()
    );
    println!(
        "  narration: {} clips, {} failed, {} blank",
        report.clips(),
        report.clip_failures(),
        report.skipped()
    );
}
