//! Fills a book view with images and narration, one item at a time.

use crate::{BookView, Figure, Paragraph, ReadingSurface};
use derive_getters::Getters;
use magicbook_cache::GenerationCache;
use magicbook_error::{MagicBookErrorKind, PlaybackErrorKind};
use magicbook_interface::{Illustrator, Narrator};
use magicbook_storage::BlobTable;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Outcome counts for one pass over a book view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters)]
pub struct ProcessReport {
    /// Image slots filled
    images: usize,
    /// Image requests that failed
    image_failures: usize,
    /// Narration clips attached
    clips: usize,
    /// Narration requests that failed
    clip_failures: usize,
    /// Blank paragraphs with nothing to narrate
    skipped: usize,
    /// Results discarded because the view was unmounted
    discarded: usize,
}

enum Outcome {
    Done,
    Failed,
    Skipped,
    Discarded,
}

/// Drives media generation for rendered books.
///
/// Figures are handled strictly in document order: a figure's image first,
/// then each paragraph's narration, before the next figure starts. One
/// request is in flight at a time, which keeps clips attached in reading
/// order. A failed item is logged and left empty; the pass carries on.
///
/// Unmounting a view does not stop its pass. Later requests still go
/// through the cache so their results are stored, but nothing is attached
/// to the detached view.
pub struct Sequencer<T, I, N> {
    cache: Arc<GenerationCache<T>>,
    illustrator: I,
    narrator: N,
    surface: ReadingSurface,
}

impl<T, I, N> Sequencer<T, I, N>
where
    T: BlobTable,
    I: Illustrator,
    N: Narrator,
{
    /// Create a sequencer that attaches clips to `surface`.
    pub fn new(
        cache: Arc<GenerationCache<T>>,
        illustrator: I,
        narrator: N,
        surface: ReadingSurface,
    ) -> Self {
        Self {
            cache,
            illustrator,
            narrator,
            surface,
        }
    }

    /// The surface clips are attached to.
    pub fn surface(&self) -> &ReadingSurface {
        &self.surface
    }

    /// The shared media cache.
    pub fn cache(&self) -> &Arc<GenerationCache<T>> {
        &self.cache
    }

    /// Generate every image and narration clip of `view`, in order.
    #[tracing::instrument(skip(self, view), fields(book = %view.key(), figures = view.figures().len()))]
    pub async fn process_content(&self, view: &BookView) -> ProcessReport {
        let mut report = ProcessReport::default();

        for figure in view.figures() {
            match self.process_image(view, figure).await {
                Outcome::Done => report.images += 1,
                Outcome::Failed => report.image_failures += 1,
                Outcome::Skipped => {}
                Outcome::Discarded => report.discarded += 1,
            }

            for paragraph in figure.paragraphs() {
                match self.process_paragraph(view, figure, paragraph).await {
                    Outcome::Done => report.clips += 1,
                    Outcome::Failed => report.clip_failures += 1,
                    Outcome::Skipped => report.skipped += 1,
                    Outcome::Discarded => report.discarded += 1,
                }
            }
        }

        tracing::info!(
            images = report.images,
            clips = report.clips,
            failures = report.image_failures + report.clip_failures,
            "Processed book content"
        );
        report
    }

    async fn process_image(&self, view: &BookView, figure: &Figure) -> Outcome {
        let caption = figure.caption().trim();
        if caption.is_empty() || figure.image().source().is_some() {
            return Outcome::Skipped;
        }

        let result = {
            let _generating = figure.image().begin_generating();
            self.cache
                .fetch_or_generate(caption, || self.illustrator.illustrate(caption))
                .await
        };

        match result {
            Ok(_) if view.is_detached() => {
                tracing::debug!(figure = %figure.id(), "Discarding image for detached view");
                Outcome::Discarded
            }
            Ok(bytes) => {
                if !figure.image().assign(bytes) {
                    tracing::debug!(figure = %figure.id(), "Image already assigned");
                }
                Outcome::Done
            }
            Err(e) => {
                tracing::warn!(figure = %figure.id(), error = %e, "Error creating image");
                Outcome::Failed
            }
        }
    }

    async fn process_paragraph(
        &self,
        view: &BookView,
        figure: &Figure,
        paragraph: &Paragraph,
    ) -> Outcome {
        let Some(text) = paragraph.narration_text() else {
            return Outcome::Skipped;
        };
        if paragraph.clip().is_some() {
            return Outcome::Skipped;
        }

        let voice = view.voice();
        let audio = match self
            .cache
            .fetch_or_generate(text, || self.narrator.narrate(text, voice))
            .await
        {
            Ok(audio) => audio,
            Err(e) => {
                tracing::warn!(
                    figure = %figure.id(),
                    paragraph = paragraph.index(),
                    error = %e,
                    "Error creating audio clip"
                );
                return Outcome::Failed;
            }
        };

        match self
            .surface
            .attach_clip(view, figure.id(), paragraph, audio)
            .await
        {
            Ok(_) => Outcome::Done,
            Err(e) => match e.kind() {
                MagicBookErrorKind::Playback(p) if matches!(p.kind, PlaybackErrorKind::Detached(_)) => {
                    tracing::debug!(figure = %figure.id(), "Discarding clip for detached view");
                    Outcome::Discarded
                }
                _ => {
                    tracing::warn!(figure = %figure.id(), error = %e, "Error attaching audio clip");
                    Outcome::Failed
                }
            },
        }
    }
}

impl<T, I, N> Sequencer<T, I, N>
where
    T: BlobTable + 'static,
    I: Illustrator + 'static,
    N: Narrator + 'static,
{
    /// Mount `view` at the front of the surface and process it in the
    /// background.
    pub async fn present(self: &Arc<Self>, view: Arc<BookView>) -> JoinHandle<ProcessReport> {
        self.surface.mount_front(Arc::clone(&view)).await;
        self.spawn_processing(view)
    }

    /// Process an already mounted view in the background.
    pub fn spawn_processing(self: &Arc<Self>, view: Arc<BookView>) -> JoinHandle<ProcessReport> {
        let sequencer = Arc::clone(self);
        tokio::spawn(async move { sequencer.process_content(&view).await })
    }
}
