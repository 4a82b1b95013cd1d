//! Trait definitions for the remote services Magicbook depends on.
//!
//! Each trait covers one service. Implementations live in
//! `magicbook_models`; tests use hand-written mocks.

mod traits;

pub use traits::{BookWriter, Illustrator, Narrator};
