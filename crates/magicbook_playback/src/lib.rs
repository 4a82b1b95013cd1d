//! Ordered narration playback for rendered books.
//!
//! A [`Book`](magicbook_core::Book) is rendered into a [`BookView`]: one
//! [`Figure`] per page (plus a cover figure when the book has a title), each
//! with an image slot and its [`Paragraph`]s. The [`Sequencer`] walks the
//! figures strictly in order, filling image slots and attaching narration
//! clips through the generation cache. Clips live on the
//! [`ReadingSurface`], an ordered registry spanning every mounted book; when
//! a clip finishes, the next clip in surface order starts on the next tick
//! and its figure is scrolled into view.

#![warn(missing_docs)]

mod sequencer;
mod surface;
mod view;

pub use sequencer::{ProcessReport, Sequencer};
pub use surface::{Clip, ClipId, ClipState, ReadingSurface, SurfaceEvent};
pub use view::{BookView, Figure, FigureId, ImageSlot, Paragraph};
