//! Resource collaborators
//!
//! A resource owns one or more indirect objects that it writes itself when
//! the document asks it to finalize. Some can do so right away; others wait
//! for data that arrives later and report [`Completion::Pending`] until then.

mod embedded;
mod font;

pub use embedded::{EmbeddedStream, StreamFeeder};
pub use font::StandardFont;

use crate::error::Result;
use crate::objects::ObjectId;
use crate::writer::ObjectWriter;

/// Outcome of one [`Resource::finalize`] attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every object the resource owns has been written.
    Complete,
    /// Still waiting for data; call `finalize` again later.
    Pending,
}

pub trait Resource {
    /// Object referenced from page resource dictionaries.
    fn id(&self) -> ObjectId;

    /// Writes whatever is ready. Must be safe to call again after it
    /// returned [`Completion::Complete`].
    fn finalize(&mut self, writer: &mut dyn ObjectWriter) -> Result<Completion>;
}
