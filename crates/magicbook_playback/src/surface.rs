//! Ordered registry of narration clips across every mounted book.
//!
//! Global clip order is the order of books on the surface, then the order in
//! which clips were attached within a book. Because the sequencer attaches a
//! book's clips strictly in document order, attach order is document order.

use crate::{BookView, FigureId, Paragraph};
use magicbook_core::BookKey;
use magicbook_error::{MagicBookResult, PlaybackError, PlaybackErrorKind};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;

const EVENT_CAPACITY: usize = 64;

/// Identifier of a narration clip on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("clip-{}", _0)]
pub struct ClipId(u64);

impl ClipId {
    /// Raw numeric id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Playback state of a clip.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum ClipState {
    /// Attached, never started
    #[default]
    Idle,
    /// Currently playing
    Playing,
    /// Paused by the reader
    Paused,
    /// Played to the end
    Ended,
}

/// A narration clip as registered on the surface.
#[derive(Debug, Clone)]
pub struct Clip {
    id: ClipId,
    figure: FigureId,
    paragraph: usize,
    audio: Arc<[u8]>,
    state: ClipState,
}

impl Clip {
    /// Clip id.
    pub fn id(&self) -> ClipId {
        self.id
    }

    /// Figure the clip belongs to.
    pub fn figure(&self) -> &FigureId {
        &self.figure
    }

    /// Paragraph index within the figure.
    pub fn paragraph(&self) -> usize {
        self.paragraph
    }

    /// Encoded audio.
    pub fn audio(&self) -> &[u8] {
        &self.audio
    }

    /// State at the time of the snapshot.
    pub fn state(&self) -> ClipState {
        self.state
    }
}

/// Notifications published by a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A book view was mounted
    BookMounted(BookKey),
    /// A book view was unmounted
    BookUnmounted(BookKey),
    /// A clip was attached to a paragraph
    ClipAttached {
        /// New clip
        clip: ClipId,
        /// Figure holding the paragraph
        figure: FigureId,
    },
    /// A clip changed state
    ClipStateChanged {
        /// Clip
        clip: ClipId,
        /// New state
        state: ClipState,
    },
    /// A figure should be brought into view
    ScrollIntoView(FigureId),
}

#[derive(Debug)]
struct MountedBook {
    view: Arc<BookView>,
    clips: Vec<ClipId>,
}

#[derive(Debug, Default)]
struct SurfaceState {
    books: Vec<MountedBook>,
    clips: HashMap<ClipId, Clip>,
    next_clip: u64,
}

impl SurfaceState {
    fn position(&self, key: &BookKey) -> Option<usize> {
        self.books.iter().position(|b| b.view.key() == key)
    }

    fn clip_mut(&mut self, id: ClipId) -> MagicBookResult<&mut Clip> {
        self.clips
            .get_mut(&id)
            .ok_or_else(|| PlaybackError::new(PlaybackErrorKind::UnknownClip(id.get())).into())
    }

    fn ordered(&self) -> impl Iterator<Item = ClipId> + '_ {
        self.books.iter().flat_map(|b| b.clips.iter().copied())
    }

    fn successor(&self, id: ClipId) -> Option<ClipId> {
        let mut order = self.ordered();
        order.by_ref().find(|c| *c == id)?;
        order.next()
    }

    fn remove_book(&mut self, index: usize) -> Arc<BookView> {
        let book = self.books.remove(index);
        for clip in &book.clips {
            self.clips.remove(clip);
        }
        book.view.detach();
        book.view
    }
}

fn invalid(from: ClipState, action: &str) -> PlaybackError {
    PlaybackError::new(PlaybackErrorKind::InvalidTransition {
        from: from.to_string(),
        action: action.to_string(),
    })
}

/// Shared reading surface.
///
/// Cloning is cheap; clones share the same registry and event channel.
///
/// Clip lifecycle: `Idle -> Playing -> (Paused <-> Playing) -> Ended`. Playing
/// an ended clip restarts it. When a clip ends, the next clip in surface
/// order starts on the following scheduler tick and its figure is scrolled
/// into view; the last clip simply ends.
#[derive(Debug, Clone)]
pub struct ReadingSurface {
    state: Arc<Mutex<SurfaceState>>,
    events: broadcast::Sender<SurfaceEvent>,
}

impl Default for ReadingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(SurfaceState::default())),
            events,
        }
    }

    /// Receive surface events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SurfaceEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: SurfaceEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Mount a view before every other book.
    pub async fn mount_front(&self, view: Arc<BookView>) {
        self.mount(view, true).await
    }

    /// Mount a view after every other book.
    pub async fn mount_back(&self, view: Arc<BookView>) {
        self.mount(view, false).await
    }

    #[tracing::instrument(skip(self, view), fields(book = %view.key()))]
    async fn mount(&self, view: Arc<BookView>, front: bool) {
        let key = view.key().clone();
        let mut state = self.state.lock().await;

        // The same view moves and keeps its clips; a new view for the same
        // key replaces the old one
        let existing = match state.position(&key) {
            Some(index) if Arc::ptr_eq(&state.books[index].view, &view) => {
                Some(state.books.remove(index))
            }
            Some(index) => {
                state.remove_book(index);
                None
            }
            None => None,
        };

        view.reattach();
        let book = existing.unwrap_or(MountedBook {
            view,
            clips: Vec::new(),
        });
        if front {
            state.books.insert(0, book);
        } else {
            state.books.push(book);
        }
        drop(state);

        tracing::debug!(front, "Mounted book");
        self.emit(SurfaceEvent::BookMounted(key));
    }

    /// Remove a book and its clips. The view is marked detached so late
    /// media results for it are discarded.
    #[tracing::instrument(skip(self), fields(book = %key))]
    pub async fn unmount(&self, key: &BookKey) -> Option<Arc<BookView>> {
        let mut state = self.state.lock().await;
        let index = state.position(key)?;
        let view = state.remove_book(index);
        drop(state);

        tracing::debug!("Unmounted book");
        self.emit(SurfaceEvent::BookUnmounted(key.clone()));
        Some(view)
    }

    /// Unmount every book.
    pub async fn clear(&self) {
        let keys = self.books().await;
        for key in keys {
            self.unmount(&key).await;
        }
    }

    /// Keys of mounted books in surface order.
    pub async fn books(&self) -> Vec<BookKey> {
        let state = self.state.lock().await;
        state.books.iter().map(|b| b.view.key().clone()).collect()
    }

    /// Whether a book is mounted.
    pub async fn is_mounted(&self, key: &BookKey) -> bool {
        self.state.lock().await.position(key).is_some()
    }

    /// Register `audio` as the narration clip of `paragraph`.
    ///
    /// The clip is appended to the book's clip sequence and starts idle.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackErrorKind::Detached`] if the view is not mounted.
    #[tracing::instrument(skip(self, view, paragraph, audio), fields(figure = %figure, size = audio.len()))]
    pub async fn attach_clip(
        &self,
        view: &BookView,
        figure: &FigureId,
        paragraph: &Paragraph,
        audio: Vec<u8>,
    ) -> MagicBookResult<ClipId> {
        let mut state = self.state.lock().await;
        let index = match state.position(view.key()) {
            Some(index) if !view.is_detached() => index,
            _ => {
                return Err(PlaybackError::new(PlaybackErrorKind::Detached(
                    view.key().to_string(),
                ))
                .into());
            }
        };

        let id = ClipId(state.next_clip);
        state.next_clip += 1;
        state.books[index].clips.push(id);
        state.clips.insert(
            id,
            Clip {
                id,
                figure: figure.clone(),
                paragraph: *paragraph.index(),
                audio: audio.into(),
                state: ClipState::Idle,
            },
        );
        drop(state);

        if !paragraph.set_clip(id) {
            tracing::warn!(clip = %id, "Paragraph already had a clip");
        }
        tracing::debug!(clip = %id, "Attached clip");
        self.emit(SurfaceEvent::ClipAttached {
            clip: id,
            figure: figure.clone(),
        });
        Ok(id)
    }

    /// Every clip id in global order.
    pub async fn clip_order(&self) -> Vec<ClipId> {
        self.state.lock().await.ordered().collect()
    }

    /// Snapshot of a clip.
    pub async fn clip(&self, id: ClipId) -> Option<Clip> {
        self.state.lock().await.clips.get(&id).cloned()
    }

    /// Current state of a clip.
    pub async fn clip_state(&self, id: ClipId) -> Option<ClipState> {
        self.state.lock().await.clips.get(&id).map(|c| c.state)
    }

    /// The clip after `id` in global order, if any.
    pub async fn successor(&self, id: ClipId) -> Option<ClipId> {
        self.state.lock().await.successor(id)
    }

    fn set_state(&self, clip: &mut Clip, state: ClipState) {
        clip.state = state;
        tracing::debug!(clip = %clip.id, state = %state, "Clip state changed");
        self.emit(SurfaceEvent::ClipStateChanged {
            clip: clip.id,
            state,
        });
    }

    /// Start or resume a clip. Playing an ended clip restarts it; playing a
    /// clip that is already playing does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackErrorKind::UnknownClip`] if the clip is not registered.
    pub async fn play(&self, id: ClipId) -> MagicBookResult<()> {
        let mut state = self.state.lock().await;
        let clip = state.clip_mut(id)?;
        if clip.state != ClipState::Playing {
            self.set_state(clip, ClipState::Playing);
        }
        Ok(())
    }

    /// Pause a playing clip. Pausing a paused clip does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackErrorKind::InvalidTransition`] for idle or ended
    /// clips.
    pub async fn pause(&self, id: ClipId) -> MagicBookResult<()> {
        let mut state = self.state.lock().await;
        let clip = state.clip_mut(id)?;
        match clip.state {
            ClipState::Playing => self.set_state(clip, ClipState::Paused),
            ClipState::Paused => {}
            from => return Err(invalid(from, "pause").into()),
        }
        Ok(())
    }

    /// Mark a playing clip as ended and schedule its successor.
    ///
    /// The successor is started by a spawned task after yielding once to the
    /// scheduler, so the ended notification is fully delivered first. The
    /// returned handle resolves once the successor has started. `None` means
    /// the clip was last in order.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackErrorKind::InvalidTransition`] unless the clip is
    /// playing.
    #[tracing::instrument(skip(self), fields(clip = %id))]
    pub async fn finish(&self, id: ClipId) -> MagicBookResult<Option<JoinHandle<()>>> {
        let mut state = self.state.lock().await;
        let clip = state.clip_mut(id)?;
        if clip.state != ClipState::Playing {
            return Err(invalid(clip.state, "finish").into());
        }
        self.set_state(clip, ClipState::Ended);

        let Some(next) = state.successor(id) else {
            tracing::debug!("Last clip ended");
            return Ok(None);
        };
        drop(state);

        let surface = self.clone();
        Ok(Some(tokio::spawn(async move {
            tokio::task::yield_now().await;
            if let Err(e) = surface.advance_to(next).await {
                // Successor unmounted between the end and the next tick
                tracing::warn!(clip = %next, error = %e, "Auto-advance skipped");
            }
        })))
    }

    async fn advance_to(&self, id: ClipId) -> MagicBookResult<()> {
        let mut state = self.state.lock().await;
        let clip = state.clip_mut(id)?;
        if clip.state != ClipState::Playing {
            self.set_state(clip, ClipState::Playing);
        }
        let figure = clip.figure.clone();
        drop(state);

        tracing::debug!(clip = %id, figure = %figure, "Advanced to next clip");
        self.emit(SurfaceEvent::ScrollIntoView(figure));
        Ok(())
    }

    /// Start the clip attached to `paragraph`, if any. Returns whether a
    /// clip was started.
    pub async fn click(&self, paragraph: &Paragraph) -> MagicBookResult<bool> {
        match paragraph.clip() {
            Some(id) => {
                self.play(id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
