//! Document structure: the page buffer, the outline tree and destinations
//! according to ISO 32000-1

mod destination;
mod outline;
mod page_buffer;

pub use destination::{Destination, DestinationType, PageDestination};
pub use outline::{LevelItem, OutlineFlags, OutlineOptions, OutlineTree};
pub use page_buffer::{PageBuffer, PageRange};
