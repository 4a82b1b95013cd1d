//! Stored book documents.

use crate::{BookDraft, BookKey};
use chrono::{DateTime, SubsecRound, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One page of a book: an image description and its paragraphs.
///
/// # Examples
///
/// ```
/// use magicbook_core::Page;
///
/// let page = Page::new("A lighthouse at dusk", vec!["The keeper waits.".to_string()]);
/// assert_eq!(page.paragraphs().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Self-contained prompt for the page illustration
    image_description: String,
    /// Narrated paragraphs, in reading order
    #[serde(default)]
    paragraphs: Vec<String>,
}

impl Page {
    /// Creates a page.
    pub fn new(image_description: impl Into<String>, paragraphs: Vec<String>) -> Self {
        Self {
            image_description: image_description.into(),
            paragraphs,
        }
    }
}

/// A generated illustrated document.
///
/// Serialized as `{ "prompt", "time", "title"?, "pages": [...] }` where
/// `time` is milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Book {
    /// Prompt the book was generated from
    prompt: String,
    /// Creation time
    #[serde(rename = "time", with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
    /// Optional title, rendered as a cover figure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    /// Pages in presentation and playback order
    pages: Vec<Page>,
}

impl Book {
    /// Stamps a validated draft with its source prompt and creation time.
    ///
    /// The time is truncated to milliseconds, the stored precision.
    pub fn from_draft(prompt: impl Into<String>, draft: BookDraft, created_at: DateTime<Utc>) -> Self {
        let (title, pages) = draft.into_parts();
        Self {
            prompt: prompt.into(),
            created_at: created_at.trunc_subsecs(3),
            title,
            pages,
        }
    }

    /// Storage key derived from the source prompt.
    pub fn key(&self) -> BookKey {
        BookKey::from_prompt(&self.prompt)
    }

    /// Total number of non-blank paragraphs across all pages.
    pub fn paragraph_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|page| page.paragraphs.iter())
            .filter(|p| !p.trim().is_empty())
            .count()
    }
}
