//! Rendered projection of a book.

use derive_getters::Getters;
use magicbook_core::{Book, BookKey, Voice};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::sync::atomic::{AtomicBool, Ordering};

/// Stable identity of a figure: its book and position within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("{}#{}", book, index)]
pub struct FigureId {
    /// Owning book
    pub book: BookKey,
    /// Zero-based figure position, cover included
    pub index: usize,
}

/// A figure's image placeholder.
///
/// The image source is assigned at most once. While a request is in flight
/// the slot is marked as generating.
#[derive(Debug, Default)]
pub struct ImageSlot {
    generating: AtomicBool,
    source: OnceLock<Vec<u8>>,
}

impl ImageSlot {
    /// Whether an image request is in flight.
    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }

    /// Assigned image bytes, if any.
    pub fn source(&self) -> Option<&[u8]> {
        self.source.get().map(Vec::as_slice)
    }

    /// Mark the slot as generating until the returned guard is dropped.
    pub(crate) fn begin_generating(&self) -> GeneratingGuard<'_> {
        self.generating.store(true, Ordering::SeqCst);
        GeneratingGuard { slot: self }
    }

    /// Assign the image. Returns `false` if one was already assigned.
    pub(crate) fn assign(&self, bytes: Vec<u8>) -> bool {
        self.source.set(bytes).is_ok()
    }
}

/// Clears the generating marker on drop, whether the request succeeded,
/// failed or was abandoned.
pub(crate) struct GeneratingGuard<'a> {
    slot: &'a ImageSlot,
}

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        self.slot.generating.store(false, Ordering::SeqCst);
    }
}

/// One paragraph of a figure.
#[derive(Debug, Getters)]
pub struct Paragraph {
    /// Position within the figure
    index: usize,
    /// Paragraph text as written
    text: String,
    #[getter(skip)]
    clip: Mutex<Option<crate::ClipId>>,
}

impl Paragraph {
    fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            clip: Mutex::new(None),
        }
    }

    /// Text used for narration: trimmed, `None` if blank.
    pub fn narration_text(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }

    fn clip_slot(&self) -> MutexGuard<'_, Option<crate::ClipId>> {
        self.clip.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Narration clip attached to this paragraph, if any.
    pub fn clip(&self) -> Option<crate::ClipId> {
        *self.clip_slot()
    }

    /// Attach `clip` unless the paragraph already has one.
    pub(crate) fn set_clip(&self, clip: crate::ClipId) -> bool {
        let mut slot = self.clip_slot();
        if slot.is_some() {
            return false;
        }
        *slot = Some(clip);
        true
    }

    /// Forget the attached clip once it leaves the surface.
    pub(crate) fn clear_clip(&self) {
        *self.clip_slot() = None;
    }
}

/// Rendered unit for one page: a caption, an image slot and paragraphs.
#[derive(Debug, Getters)]
pub struct Figure {
    /// Stable identity
    id: FigureId,
    /// Image description, also the image cache key source
    caption: String,
    /// Whether this is the title cover
    is_cover: bool,
    /// Image placeholder
    image: ImageSlot,
    /// Paragraphs in reading order
    paragraphs: Vec<Paragraph>,
}

/// Rendered book: its figures in document order.
///
/// A view is detached once it is unmounted from the reading surface; late
/// media results for a detached view are discarded.
#[derive(Debug, Getters)]
pub struct BookView {
    /// Book key
    key: BookKey,
    /// Narration voice
    voice: Voice,
    /// Figures in document order
    figures: Vec<Figure>,
    #[getter(skip)]
    detached: AtomicBool,
}

impl BookView {
    /// Render a book. A titled book gets a leading cover figure whose
    /// caption and single paragraph are the title; a blank title counts as
    /// no title.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use magicbook_core::{Book, BookDraft};
    /// use magicbook_playback::BookView;
    ///
    /// let draft = BookDraft::builder()
    ///     .title("Tides")
    ///     .page("Waves on a breakwater", &["Salt.", "Foam."])
    ///     .build()
    ///     .unwrap();
    /// let view = BookView::render(&Book::from_draft("tides", draft, Utc::now()));
    ///
    /// assert_eq!(view.figures().len(), 2);
    /// assert!(view.figures()[0].is_cover());
    /// assert_eq!(view.figures()[1].paragraphs().len(), 2);
    /// ```
    pub fn render(book: &Book) -> Self {
        let key = book.key();
        let mut figures = Vec::with_capacity(book.pages().len() + 1);

        if let Some(title) = book.title().as_ref().filter(|t| !t.trim().is_empty()) {
            figures.push(Figure {
                id: FigureId {
                    book: key.clone(),
                    index: 0,
                },
                caption: title.clone(),
                is_cover: true,
                image: ImageSlot::default(),
                paragraphs: vec![Paragraph::new(0, title.clone())],
            });
        }

        for page in book.pages() {
            let index = figures.len();
            figures.push(Figure {
                id: FigureId {
                    book: key.clone(),
                    index,
                },
                caption: page.image_description().clone(),
                is_cover: false,
                image: ImageSlot::default(),
                paragraphs: page
                    .paragraphs()
                    .iter()
                    .enumerate()
                    .map(|(i, text)| Paragraph::new(i, text.clone()))
                    .collect(),
            });
        }

        Self {
            key,
            voice: Voice::default(),
            figures,
            detached: AtomicBool::new(false),
        }
    }

    /// Use a different narration voice.
    pub fn with_voice(mut self, voice: impl Into<Voice>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Look up a figure.
    pub fn figure(&self, id: &FigureId) -> Option<&Figure> {
        if id.book != self.key {
            return None;
        }
        self.figures.get(id.index)
    }

    /// Whether the view has been removed from the surface.
    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    pub(crate) fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
        for paragraph in self.figures.iter().flat_map(|f| f.paragraphs.iter()) {
            paragraph.clear_clip();
        }
    }

    pub(crate) fn reattach(&self) {
        self.detached.store(false, Ordering::SeqCst);
    }
}
