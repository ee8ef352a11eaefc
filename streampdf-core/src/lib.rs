//! # streampdf
//!
//! A PDF writer that streams each indirect object to its output the moment
//! the object is complete, and writes the cross-reference section and
//! trailer only once nothing is left outstanding.
//!
//! ## Features
//!
//! - **Incremental output**: objects reach the [`Sink`] as soon as they are
//!   ready; byte offsets are captured as they are written
//! - **Deferred finalization**: resources that complete later (such as
//!   images fed from another thread) hold the trailer back until they are done
//! - **Back-pressure**: sinks report [`Flow::Backpressure`] and the writer
//!   waits for them to drain
//! - **Page buffer**: optionally keep pages in memory and revisit them by
//!   index before they are committed
//! - **Outlines**: multi-level bookmarks linked as they are added
//! - **Text and graphics**: the standard 14 fonts, paths, colors and
//!   transforms
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use streampdf::{Color, Document, DocumentConfig, Font, GraphicsContext, PageOptions, Result};
//!
//! # fn main() -> Result<()> {
//! let mut doc = Document::create("output.pdf", DocumentConfig::default())?;
//! doc.set_title("My PDF");
//!
//! doc.add_page(PageOptions::a4())?;
//! doc.add_outline("Cover", None, Default::default())?;
//! doc.font(Font::Helvetica, 24.0).text("Hello, PDF!", 50.0, 700.0)?;
//!
//! let mut graphics = GraphicsContext::new();
//! graphics
//!     .set_fill_color(Color::rgb(0.0, 0.5, 1.0))
//!     .circle(300.0, 400.0, 50.0)
//!     .fill();
//! doc.draw(&graphics)?;
//!
//! doc.end()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod graphics;
pub mod objects;
pub mod page;
pub mod resources;
pub mod structure;
pub mod text;
pub mod writer;

pub use config::DocumentConfig;
pub use document::{Document, DocumentEvent, DocumentMetadata, DocumentState};
pub use error::{PdfError, Result};
pub use graphics::{Color, GraphicsContext, LineCap, LineJoin};
pub use page::{Layout, Margins, Page, PageOptions, PageSize};
pub use resources::{Completion, Resource, StreamFeeder};
pub use structure::{
    Destination, OutlineFlags, OutlineOptions, PageDestination, PageRange,
};
pub use text::{Font, TextEncoding, TextState};
pub use writer::{BoundedSink, Flow, Reference, Sink, WriteSink};

/// Current version of streampdf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// PDF versions this writer can put in the header
pub mod pdf_version {
    pub const SUPPORTED_VERSIONS: &[&str] =
        &["1.0", "1.1", "1.2", "1.3", "1.4", "1.5", "1.6", "1.7"];
}
