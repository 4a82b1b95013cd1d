//! Boundary type for documents returned by the text-generation service.

use crate::Page;
use derive_builder::Builder;
use derive_getters::Getters;
use magicbook_error::{BookError, BookErrorKind};
use serde::{Deserialize, Serialize};

/// A book as returned by the text-generation service, before it is stamped
/// with a prompt and timestamp.
///
/// Construct one with [`BookDraft::parse`] (which validates) or the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(pattern = "owned", build_fn(private, name = "build_fields"))]
pub struct BookDraft {
    /// Optional title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    title: Option<String>,
    /// Pages in order
    #[builder(default, setter(each(name = "push_page", into)))]
    pages: Vec<Page>,
}

impl BookDraft {
    /// Creates a new builder.
    pub fn builder() -> BookDraftBuilder {
        BookDraftBuilder::default()
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `BookErrorKind::Parse` if the text is not a JSON object of the
    /// expected shape, and the [`BookDraft::validate`] errors otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use magicbook_core::BookDraft;
    ///
    /// let json = r#"{"title":"Tides","pages":[{"imageDescription":"Waves","paragraphs":["Salt."]}]}"#;
    /// let draft = BookDraft::parse(json).unwrap();
    /// assert_eq!(draft.title().as_deref(), Some("Tides"));
    ///
    /// assert!(BookDraft::parse(r#"{"pages":"nope"}"#).is_err());
    /// ```
    pub fn parse(json: &str) -> Result<Self, BookError> {
        let draft: Self = serde_json::from_str(json)
            .map_err(|e| BookError::new(BookErrorKind::Parse(e.to_string())))?;
        draft.validate()?;
        Ok(draft)
    }

    /// Checks that the draft has at least one page and that every page has
    /// an image description.
    pub fn validate(&self) -> Result<(), BookError> {
        if self.pages.is_empty() {
            return Err(BookError::new(BookErrorKind::NoPages));
        }
        if let Some(page) = self
            .pages
            .iter()
            .position(|p| p.image_description().trim().is_empty())
        {
            return Err(BookError::new(BookErrorKind::EmptyImageDescription { page }));
        }
        Ok(())
    }

    pub(crate) fn into_parts(self) -> (Option<String>, Vec<Page>) {
        (self.title, self.pages)
    }
}

impl BookDraftBuilder {
    /// Appends a page from its image description and paragraphs.
    pub fn page(self, image_description: impl Into<String>, paragraphs: &[&str]) -> Self {
        self.push_page(Page::new(
            image_description,
            paragraphs.iter().map(|p| p.to_string()).collect(),
        ))
    }

    /// Builds and validates the draft.
    ///
    /// # Errors
    ///
    /// Returns the [`BookDraft::validate`] errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use magicbook_core::BookDraft;
    ///
    /// let draft = BookDraft::builder()
    ///     .title("Tides")
    ///     .page("Waves on a breakwater", &["Salt."])
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(draft.pages().len(), 1);
    ///
    /// assert!(BookDraft::builder().title("Empty").build().is_err());
    /// ```
    pub fn build(self) -> Result<BookDraft, BookError> {
        let draft = self
            .build_fields()
            .map_err(|e| BookError::new(BookErrorKind::Parse(e.to_string())))?;
        draft.validate()?;
        Ok(draft)
    }
}
