//! From prompt to a stored book on the reading surface.

use chrono::Utc;
use magicbook_core::{Book, BookKey, Voice};
use magicbook_error::{GenerationError, GenerationErrorKind, MagicBookResult};
use magicbook_interface::{BookWriter, Illustrator, Narrator};
use magicbook_playback::{BookView, ProcessReport, ReadingSurface, Sequencer};
use magicbook_storage::{BlobTable, Bookshelf};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A book placed on the reading surface, with its media still generating.
#[derive(Debug)]
pub struct OpenedBook {
    /// The stored book
    pub book: Book,
    /// Its rendered view, as mounted
    pub view: Arc<BookView>,
    /// Background media pass; resolves once every item has been tried
    pub processing: JoinHandle<ProcessReport>,
}

/// Ties the book writer, the bookshelf and the playback sequencer together.
pub struct Library<W, T, I, N> {
    writer: W,
    shelf: Bookshelf,
    sequencer: Arc<Sequencer<T, I, N>>,
    voice: Voice,
}

impl<W, T, I, N> Library<W, T, I, N>
where
    W: BookWriter,
    T: BlobTable + 'static,
    I: Illustrator + 'static,
    N: Narrator + 'static,
{
    /// Create a library.
    pub fn new(writer: W, shelf: Bookshelf, sequencer: Arc<Sequencer<T, I, N>>) -> Self {
        Self {
            writer,
            shelf,
            sequencer,
            voice: Voice::default(),
        }
    }

    /// Narrate opened books with `voice`.
    pub fn with_voice(mut self, voice: impl Into<Voice>) -> Self {
        self.voice = voice.into();
        self
    }

    /// The bookshelf.
    pub fn shelf(&self) -> &Bookshelf {
        &self.shelf
    }

    /// The reading surface books are mounted on.
    pub fn surface(&self) -> &ReadingSurface {
        self.sequencer.surface()
    }

    /// The playback sequencer.
    pub fn sequencer(&self) -> &Arc<Sequencer<T, I, N>> {
        &self.sequencer
    }

    fn render(&self, book: &Book) -> Arc<BookView> {
        Arc::new(BookView::render(book).with_voice(self.voice.clone()))
    }

    /// Generate a book for `prompt`, store it, and show it alone at the top
    /// of the surface.
    ///
    /// # Errors
    ///
    /// Returns error if the prompt is blank, the writer fails or returns a
    /// malformed book, or the book cannot be stored. Nothing is stored or
    /// mounted in that case.
    #[tracing::instrument(skip(self), fields(writer = self.writer.provider_name()))]
    pub async fn create_book(&self, prompt: &str) -> MagicBookResult<OpenedBook> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::InvalidRequest(
                "prompt is empty".to_string(),
            ))
            .into());
        }

        let draft = self.writer.write_book(prompt).await?;
        let book = Book::from_draft(prompt, draft, Utc::now());
        let key = self.shelf.put(&book).await?;
        tracing::info!(key = %key, pages = book.pages().len(), "Created book");

        self.surface().clear().await;
        let view = self.render(&book);
        let processing = self.sequencer.present(Arc::clone(&view)).await;

        Ok(OpenedBook {
            book,
            view,
            processing,
        })
    }

    /// Mount every stored book, newest first, below anything already shown.
    ///
    /// # Errors
    ///
    /// Returns error if the shelf cannot be read.
    #[tracing::instrument(skip(self))]
    pub async fn open_shelf(&self) -> MagicBookResult<Vec<OpenedBook>> {
        let books = self.shelf.list().await?;
        let mut opened = Vec::with_capacity(books.len());

        for book in books {
            let view = self.render(&book);
            self.surface().mount_back(Arc::clone(&view)).await;
            let processing = self.sequencer.spawn_processing(Arc::clone(&view));
            opened.push(OpenedBook {
                book,
                view,
                processing,
            });
        }

        tracing::info!(count = opened.len(), "Opened bookshelf");
        Ok(opened)
    }

    /// Mount one stored book at the end of the surface.
    ///
    /// # Errors
    ///
    /// Returns error if the book exists but cannot be read.
    #[tracing::instrument(skip(self), fields(key = %key))]
    pub async fn open_book(&self, key: &BookKey) -> MagicBookResult<Option<OpenedBook>> {
        let Some(book) = self.shelf.get(key).await? else {
            return Ok(None);
        };

        let view = self.render(&book);
        self.surface().mount_back(Arc::clone(&view)).await;
        let processing = self.sequencer.spawn_processing(Arc::clone(&view));
        Ok(Some(OpenedBook {
            book,
            view,
            processing,
        }))
    }
}
