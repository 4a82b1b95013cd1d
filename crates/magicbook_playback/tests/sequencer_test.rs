//! Tests for ordered media generation over a rendered book.

use async_trait::async_trait;
use chrono::Utc;
use magicbook_cache::GenerationCache;
use magicbook_core::{Book, BookDraft, BookKey, Voice};
use magicbook_error::{GenerationError, GenerationErrorKind, MagicBookResult};
use magicbook_interface::{Illustrator, Narrator};
use magicbook_playback::{BookView, ClipState, ReadingSurface, Sequencer};
use magicbook_storage::MemoryBlobTable;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared record of every request in the order it started.
#[derive(Clone, Default)]
struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct MockIllustrator {
    log: CallLog,
    failing: HashSet<String>,
}

#[async_trait]
impl Illustrator for MockIllustrator {
    async fn illustrate(&self, description: &str) -> MagicBookResult<Vec<u8>> {
        self.log.push(format!("image:{}", description));
        if self.failing.contains(description) {
            return Err(GenerationError::new(GenerationErrorKind::Api {
                status: 400,
                message: "content policy".to_string(),
            })
            .into());
        }
        Ok(format!("png:{}", description).into_bytes())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Narrator whose latency shrinks with each call, so later requests would
/// finish first if they ever overlapped.
struct MockNarrator {
    log: CallLog,
    failing: HashSet<String>,
    delay_ms: Mutex<u64>,
    unmount_on: Option<(String, ReadingSurface, BookKey)>,
}

#[async_trait]
impl Narrator for MockNarrator {
    async fn narrate(&self, text: &str, voice: &Voice) -> MagicBookResult<Vec<u8>> {
        self.log.push(format!("audio:{}", text));
        let delay = {
            let mut delay = self.delay_ms.lock().unwrap();
            let current = *delay;
            *delay = delay.saturating_sub(10);
            current
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;

        if let Some((trigger, surface, key)) = &self.unmount_on
            && trigger == text
        {
            surface.unmount(key).await;
        }
        if self.failing.contains(text) {
            return Err(GenerationError::new(GenerationErrorKind::Http(
                "connection reset".to_string(),
            ))
            .into());
        }
        Ok(format!("mp3:{}:{}", voice, text).into_bytes())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

struct Harness {
    log: CallLog,
    surface: ReadingSurface,
    sequencer: Arc<Sequencer<MemoryBlobTable, MockIllustrator, MockNarrator>>,
}

fn harness_with(
    failing_images: &[&str],
    failing_audio: &[&str],
    unmount_on: Option<(&str, BookKey)>,
) -> Harness {
    let log = CallLog::default();
    let surface = ReadingSurface::new();
    let illustrator = MockIllustrator {
        log: log.clone(),
        failing: failing_images.iter().map(|s| s.to_string()).collect(),
    };
    let narrator = MockNarrator {
        log: log.clone(),
        failing: failing_audio.iter().map(|s| s.to_string()).collect(),
        delay_ms: Mutex::new(40),
        unmount_on: unmount_on.map(|(text, key)| (text.to_string(), surface.clone(), key)),
    };
    let cache = Arc::new(GenerationCache::new(MemoryBlobTable::new()));
    let sequencer = Arc::new(Sequencer::new(cache, illustrator, narrator, surface.clone()));
    Harness {
        log,
        surface,
        sequencer,
    }
}

fn harness() -> Harness {
    harness_with(&[], &[], None)
}

fn book(prompt: &str, title: Option<&str>, pages: &[(&str, &[&str])]) -> Book {
    let mut builder = BookDraft::builder();
    if let Some(title) = title {
        builder = builder.title(title);
    }
    for (description, paragraphs) in pages {
        builder = builder.page(*description, paragraphs);
    }
    Book::from_draft(prompt, builder.build().unwrap(), Utc::now())
}

async fn clip_texts(surface: &ReadingSurface) -> Vec<String> {
    let mut texts = Vec::new();
    for id in surface.clip_order().await {
        let clip = surface.clip(id).await.unwrap();
        texts.push(String::from_utf8(clip.audio().to_vec()).unwrap());
    }
    texts
}

#[tokio::test]
async fn test_items_are_processed_in_document_order() {
    let h = harness();
    let view = Arc::new(BookView::render(&book(
        "tides",
        None,
        &[("Waves", &["One", "Two"]), ("Gulls", &["Three"])],
    )));
    h.surface.mount_front(Arc::clone(&view)).await;

    let report = h.sequencer.process_content(&view).await;

    assert_eq!(
        h.log.entries(),
        vec!["image:Waves", "audio:One", "audio:Two", "image:Gulls", "audio:Three"]
    );
    assert_eq!(
        clip_texts(&h.surface).await,
        vec!["mp3:alloy:One", "mp3:alloy:Two", "mp3:alloy:Three"]
    );
    assert_eq!(*report.images(), 2);
    assert_eq!(*report.clips(), 3);
    assert_eq!(view.figures()[0].image().source(), Some(&b"png:Waves"[..]));
}

#[tokio::test]
async fn test_processed_book_auto_advances_in_reading_order() {
    let h = harness();
    let view = Arc::new(BookView::render(&book(
        "tides",
        None,
        &[("Waves", &["A", "B"]), ("Gulls", &["C"])],
    )));
    h.surface.mount_front(Arc::clone(&view)).await;
    h.sequencer.process_content(&view).await;

    let order = h.surface.clip_order().await;
    h.surface.play(order[0]).await.unwrap();
    for pair in order.windows(2) {
        h.surface.finish(pair[0]).await.unwrap().unwrap().await.unwrap();
        assert_eq!(h.surface.clip_state(pair[1]).await, Some(ClipState::Playing));
    }
    assert!(h.surface.finish(order[2]).await.unwrap().is_none());
}

#[tokio::test]
async fn test_blank_paragraphs_are_skipped() {
    let h = harness();
    let view = Arc::new(BookView::render(&book(
        "tides",
        None,
        &[("Waves", &["  Spoken  ", "   ", ""])],
    )));
    h.surface.mount_front(Arc::clone(&view)).await;

    let report = h.sequencer.process_content(&view).await;

    assert_eq!(*report.clips(), 1);
    assert_eq!(*report.skipped(), 2);
    let paragraphs = view.figures()[0].paragraphs();
    assert!(paragraphs[0].clip().is_some());
    assert!(paragraphs[1].clip().is_none());
    assert!(paragraphs[2].clip().is_none());
    // Narration uses the trimmed text; blank paragraphs never reach the cache
    assert_eq!(h.log.entries(), vec!["image:Waves", "audio:Spoken"]);
    assert_eq!(*h.sequencer.cache().stats().misses(), 2);
}

#[tokio::test]
async fn test_failures_do_not_stop_the_pass() {
    let h = harness_with(&["Waves"], &["Two"], None);
    let view = Arc::new(BookView::render(&book(
        "tides",
        None,
        &[("Waves", &["One", "Two"]), ("Gulls", &["Three"])],
    )));
    h.surface.mount_front(Arc::clone(&view)).await;

    let report = h.sequencer.process_content(&view).await;

    assert_eq!(*report.image_failures(), 1);
    assert_eq!(*report.clip_failures(), 1);
    assert_eq!(*report.images(), 1);
    assert_eq!(*report.clips(), 2);

    let first = &view.figures()[0];
    assert!(first.image().source().is_none());
    assert!(!first.image().is_generating());
    assert!(first.paragraphs()[1].clip().is_none());
    assert!(view.figures()[1].image().source().is_some());

    // A failed paragraph is not part of the advance chain
    assert_eq!(
        clip_texts(&h.surface).await,
        vec!["mp3:alloy:One", "mp3:alloy:Three"]
    );
}

#[tokio::test]
async fn test_failed_items_are_retried_on_next_pass() {
    let h = harness_with(&[], &["Two"], None);
    let story = book("tides", None, &[("Waves", &["One", "Two"])]);

    let view = Arc::new(BookView::render(&story));
    h.surface.mount_front(Arc::clone(&view)).await;
    h.sequencer.process_content(&view).await;

    // Reopening the book renders a fresh view; cached items are not regenerated
    let reopened = Arc::new(BookView::render(&story));
    h.surface.mount_front(Arc::clone(&reopened)).await;
    assert!(view.is_detached());
    h.sequencer.process_content(&reopened).await;

    let entries = h.log.entries();
    assert_eq!(entries.iter().filter(|e| *e == "image:Waves").count(), 1);
    assert_eq!(entries.iter().filter(|e| *e == "audio:One").count(), 1);
    assert_eq!(entries.iter().filter(|e| *e == "audio:Two").count(), 2);
}

#[tokio::test]
async fn test_titled_book_starts_with_cover() {
    let h = harness();
    let view = Arc::new(BookView::render(&book(
        "tides",
        Some("The Sea"),
        &[("Waves", &["One"])],
    )));
    h.surface.mount_front(Arc::clone(&view)).await;

    h.sequencer.process_content(&view).await;

    assert!(*view.figures()[0].is_cover());
    assert_eq!(
        h.log.entries(),
        vec!["image:The Sea", "audio:The Sea", "image:Waves", "audio:One"]
    );
    assert_eq!(h.surface.clip_order().await.len(), 2);
}

#[tokio::test]
async fn test_results_for_unmounted_view_are_discarded() {
    let story = book("tides", None, &[("Waves", &["One", "Two"]), ("Gulls", &["Three"])]);
    let h = harness_with(&[], &[], Some(("One", story.key())));
    let view = Arc::new(BookView::render(&story));
    h.surface.mount_front(Arc::clone(&view)).await;

    let report = h.sequencer.process_content(&view).await;

    assert!(view.is_detached());
    assert_eq!(*report.clips(), 0);
    assert_eq!(*report.images(), 1);
    // One, Two, the Gulls image and Three all arrive after the unmount
    assert_eq!(*report.discarded(), 4);
    assert!(h.surface.clip_order().await.is_empty());
    assert!(view.figures()[1].image().source().is_none());
    assert!(view.figures()[1].paragraphs()[0].clip().is_none());

    // The pass keeps walking so later results still land in the cache
    let entries = h.log.entries();
    assert!(entries.contains(&"image:Gulls".to_string()));
    assert!(entries.contains(&"audio:Three".to_string()));
    assert!(h.sequencer.cache().contains("Gulls").await.unwrap());
    assert!(h.sequencer.cache().contains("Three").await.unwrap());
}

#[tokio::test]
async fn test_blank_title_renders_no_cover() {
    let h = harness();
    let view = Arc::new(BookView::render(&book(
        "tides",
        Some("   "),
        &[("Waves", &["One"])],
    )));
    assert_eq!(view.figures().len(), 1);
    assert!(!view.figures()[0].is_cover());
    h.surface.mount_front(Arc::clone(&view)).await;

    let report = h.sequencer.process_content(&view).await;

    assert_eq!(*report.images(), 1);
    assert_eq!(clip_texts(&h.surface).await, vec!["mp3:alloy:One"]);
    assert_eq!(h.log.entries(), vec!["image:Waves", "audio:One"]);
}

/// Illustrator that looks at the figure it is drawing for while the request
/// is in flight.
struct WatchingIllustrator {
    view: Arc<Mutex<Option<Arc<BookView>>>>,
    seen: Arc<Mutex<Vec<(String, bool)>>>,
}

#[async_trait]
impl Illustrator for WatchingIllustrator {
    async fn illustrate(&self, description: &str) -> MagicBookResult<Vec<u8>> {
        let view = self.view.lock().unwrap().clone();
        if let Some(view) = view {
            for figure in view.figures() {
                if figure.caption() == description {
                    self.seen
                        .lock()
                        .unwrap()
                        .push((description.to_string(), figure.image().is_generating()));
                }
            }
        }
        tokio::task::yield_now().await;
        Ok(description.as_bytes().to_vec())
    }

    fn provider_name(&self) -> &'static str {
        "watching"
    }
}

#[tokio::test]
async fn test_image_slot_is_generating_while_request_is_in_flight() {
    let slot = Arc::new(Mutex::new(None));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let illustrator = WatchingIllustrator {
        view: Arc::clone(&slot),
        seen: Arc::clone(&seen),
    };
    let narrator = MockNarrator {
        log: CallLog::default(),
        failing: HashSet::new(),
        delay_ms: Mutex::new(0),
        unmount_on: None,
    };
    let surface = ReadingSurface::new();
    let cache = Arc::new(GenerationCache::new(MemoryBlobTable::new()));
    let sequencer = Sequencer::new(cache, illustrator, narrator, surface.clone());

    let view = Arc::new(BookView::render(&book(
        "tides",
        Some("Tides"),
        &[("Waves", &["One"]), ("Gulls", &["Two"])],
    )));
    *slot.lock().unwrap() = Some(Arc::clone(&view));
    surface.mount_front(Arc::clone(&view)).await;

    for figure in view.figures() {
        assert!(!figure.image().is_generating());
    }
    sequencer.process_content(&view).await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ("Tides".to_string(), true),
            ("Waves".to_string(), true),
            ("Gulls".to_string(), true),
        ]
    );
    for figure in view.figures() {
        assert!(!figure.image().is_generating());
        assert!(figure.image().source().is_some());
    }
}

#[tokio::test]
async fn test_voice_is_passed_to_narrator() {
    let h = harness();
    let view = Arc::new(
        BookView::render(&book("tides", None, &[("Waves", &["One"])])).with_voice("nova"),
    );
    h.surface.mount_front(Arc::clone(&view)).await;

    h.sequencer.process_content(&view).await;

    assert_eq!(clip_texts(&h.surface).await, vec!["mp3:nova:One"]);
}

#[tokio::test]
async fn test_present_mounts_new_book_first() {
    let h = harness();
    let older = Arc::new(BookView::render(&book("older", None, &[("Old", &["Old text"])])));
    h.surface.mount_back(Arc::clone(&older)).await;

    let newer = Arc::new(BookView::render(&book("newer", None, &[("New", &["New text"])])));
    let report = h.sequencer.present(Arc::clone(&newer)).await.await.unwrap();

    assert_eq!(*report.clips(), 1);
    assert_eq!(
        h.surface.books().await,
        vec![newer.key().clone(), older.key().clone()]
    );
}
