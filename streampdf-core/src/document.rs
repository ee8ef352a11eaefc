use crate::config::DocumentConfig;
use crate::error::{PdfError, Result};
use crate::graphics::GraphicsContext;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::page::{Page, PageOptions};
use crate::resources::{Completion, EmbeddedStream, Resource, StandardFont, StreamFeeder};
use crate::structure::{
    Destination, OutlineOptions, OutlineTree, PageBuffer, PageDestination, PageRange,
};
use crate::text::{Font, TextState};
use crate::writer::{ObjectStore, ObjectWriter, Reference, Sink, WriteSink};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lifecycle of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// Accepting pages, outlines and content.
    Open,
    /// `end()` has run; waiting for outstanding objects to be written.
    Ending,
    /// Cross-reference section and trailer written, sink closed.
    Finalized,
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentState::Open => "open",
            DocumentState::Ending => "ending",
            DocumentState::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// Notifications delivered to [`Document::subscribe`] listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    PageAdded {
        index: usize,
        id: ObjectId,
    },
    OutlineAdded {
        title: String,
        id: ObjectId,
        depth: usize,
    },
}

/// Metadata for a PDF document, written as the Info dictionary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    /// Software that created the original content
    pub creator: Option<String>,
    /// Software that produced the PDF
    pub producer: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub modification_date: Option<DateTime<Utc>>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            title: None,
            author: None,
            subject: None,
            keywords: None,
            creator: Some("streampdf".to_string()),
            producer: Some(format!("streampdf v{}", crate::VERSION)),
            creation_date: Some(now),
            modification_date: Some(now),
        }
    }
}

impl DocumentMetadata {
    pub fn to_dictionary(&self) -> Dictionary {
        let mut info = Dictionary::new();
        let text_entries = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Keywords", &self.keywords),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        for (key, value) in text_entries {
            if let Some(value) = value {
                info.set(key, value.as_str());
            }
        }
        if let Some(date) = self.creation_date {
            info.set("CreationDate", format_pdf_date(date));
        }
        if let Some(date) = self.modification_date {
            info.set("ModDate", format_pdf_date(date));
        }
        info
    }
}

/// Formats a UTC timestamp as a PDF date string, `D:YYYYMMDDHHmmSS+00'00`.
pub fn format_pdf_date(date: DateTime<Utc>) -> String {
    let formatted = date.format("D:%Y%m%d%H%M%S");
    format!("{formatted}+00'00")
}

type Listener = Box<dyn FnMut(&DocumentEvent)>;

/// A PDF document streamed to a [`Sink`] as it is built.
///
/// Objects are written as soon as their owner is done with them. `end()`
/// flushes what is left; the cross-reference section and trailer follow
/// the moment the last outstanding object has been written, which may be
/// during `end()` itself or on a later [`poll`](Document::poll) or
/// [`write_reference`](Document::write_reference).
///
/// # Example
///
/// ```rust
/// use streampdf::{Document, DocumentConfig, DocumentState, Font, PageOptions};
///
/// # fn main() -> streampdf::Result<()> {
/// let mut doc = Document::new(Vec::<u8>::new(), DocumentConfig::default())?;
/// doc.set_title("Report");
/// doc.add_page(PageOptions::a4())?;
/// doc.font(Font::Helvetica, 18.0).text("Hello, PDF!", 72.0, 760.0)?;
/// doc.add_outline("Start", None, Default::default())?;
///
/// assert_eq!(doc.end()?, DocumentState::Finalized);
/// let bytes = doc.into_sink();
/// assert!(bytes.ends_with(b"%%EOF\n"));
/// # Ok(())
/// # }
/// ```
pub struct Document<S: Sink> {
    config: DocumentConfig,
    store: ObjectStore<S>,
    state: DocumentState,
    catalog_id: ObjectId,
    catalog: Option<Reference>,
    pages_id: ObjectId,
    pages_root: Option<Reference>,
    outlines: Option<OutlineTree>,
    buffer: PageBuffer<Page>,
    current: Option<usize>,
    kids: Vec<ObjectId>,
    metadata: DocumentMetadata,
    info_id: Option<ObjectId>,
    text_state: TextState,
    fonts: IndexMap<Font, (String, ObjectId)>,
    images: IndexMap<String, ObjectId>,
    resources: Vec<Box<dyn Resource>>,
    listeners: Vec<Listener>,
}

impl Document<WriteSink<BufWriter<File>>> {
    /// Streams a new document into a file.
    pub fn create(path: impl AsRef<Path>, config: DocumentConfig) -> Result<Self> {
        let sink = WriteSink::create(path)?;
        Self::new(sink, config)
    }
}

impl<S: Sink> Document<S> {
    /// Writes the header and allocates the catalog, pages root and (when
    /// enabled) outlines root, in that order.
    pub fn new(sink: S, config: DocumentConfig) -> Result<Self> {
        config.validate()?;

        let mut store = ObjectStore::new(sink, config.compress_streams);
        store.write_header(&config.pdf_version)?;

        let mut catalog = store.create(Dictionary::typed("Catalog"));
        let pages_root = store.create(Dictionary::typed("Pages"));
        catalog.dictionary_mut().set("Pages", pages_root.id());

        let outlines = if config.outlines {
            let root = store.create(Dictionary::typed("Outlines"));
            catalog.dictionary_mut().set("Outlines", root.id());
            Some(OutlineTree::new(root))
        } else {
            None
        };

        debug!(version = %config.pdf_version, buffer_pages = config.buffer_pages, "document opened");

        let mut document = Self {
            catalog_id: catalog.id(),
            catalog: Some(catalog),
            pages_id: pages_root.id(),
            pages_root: Some(pages_root),
            outlines,
            store,
            state: DocumentState::Open,
            buffer: PageBuffer::new(),
            current: None,
            kids: Vec::new(),
            metadata: DocumentMetadata::default(),
            info_id: None,
            text_state: TextState::default(),
            fonts: IndexMap::new(),
            images: IndexMap::new(),
            resources: Vec::new(),
            listeners: Vec::new(),
            config,
        };

        if document.config.auto_first_page {
            let options = document.config.default_page;
            document.add_page(options)?;
        }
        Ok(document)
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.state == DocumentState::Finalized
    }

    /// Registers a listener for page and outline events.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&DocumentEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    // Pages

    /// Adds a page and makes it the current page.
    ///
    /// Unless pages are buffered, every page added before it is written out
    /// first.
    pub fn add_page(&mut self, options: PageOptions) -> Result<&mut Self> {
        self.ensure_open()?;
        if !self.config.buffer_pages {
            self.flush_pages()?;
        }

        let page = Page::new(&mut self.store, self.pages_id, options);
        let id = page.id();
        let index = self.buffer.push(page);
        self.kids.push(id);
        self.current = Some(index);

        debug!(index, object = id.number(), "page added");
        self.emit(DocumentEvent::PageAdded { index, id });
        Ok(self)
    }

    /// Makes a buffered page current again.
    pub fn switch_to_page(&mut self, index: usize) -> Result<&mut Self> {
        self.ensure_open()?;
        self.buffer.get_mut(index)?;
        self.current = Some(index);
        Ok(self)
    }

    pub fn buffered_page_range(&self) -> PageRange {
        self.buffer.range()
    }

    /// Global index of the current page, if any.
    pub fn current_page(&self) -> Option<usize> {
        self.current
    }

    /// Pages added so far, flushed or not.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Object id of the page at a global index.
    pub fn page_id(&self, index: usize) -> Option<ObjectId> {
        self.kids.get(index).copied()
    }

    /// Writes every buffered page. No page is current afterwards.
    pub fn flush_pages(&mut self) -> Result<()> {
        let pages = self.buffer.take_all();
        if pages.is_empty() {
            return Ok(());
        }
        self.current = None;

        let count = pages.len();
        for page in pages {
            page.finalize(&mut self.store)?;
        }
        debug!(
            count,
            next_index = self.buffer.range().start,
            "flushed pages"
        );
        Ok(())
    }

    // Content

    /// Appends raw content-stream bytes to the current page.
    pub fn add_content(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        self.ensure_open()?;
        self.current_page_mut()?.write(bytes);
        Ok(self)
    }

    /// Appends the operators built in `graphics` to the current page.
    pub fn draw(&mut self, graphics: &GraphicsContext) -> Result<&mut Self> {
        self.add_content(graphics.operations().as_bytes())
    }

    /// Selects the font used by subsequent [`text`](Document::text) calls.
    pub fn font(&mut self, font: Font, size: f64) -> &mut Self {
        self.text_state = TextState::new(font, size);
        self
    }

    pub fn text_state(&self) -> TextState {
        self.text_state
    }

    /// Shows a single line of text at (x, y) on the current page.
    pub fn text(&mut self, text: &str, x: f64, y: f64) -> Result<&mut Self> {
        self.ensure_open()?;
        let index = self.current.ok_or(PdfError::NoCurrentPage)?;
        let state = self.text_state;
        let (name, id) = self.font_resource(state.font);

        let page = self.buffer.get_mut(index)?;
        page.add_font(&name, id);
        page.write(&state.show(&name, text, x, y));
        Ok(self)
    }

    /// Creates an image XObject whose samples arrive through the returned
    /// feeder, and registers it on the current page as `name`.
    ///
    /// The document cannot finalize until the feeder is finished or dropped.
    pub fn embed_image(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        color_space: &str,
        bits_per_component: u8,
    ) -> Result<StreamFeeder> {
        self.ensure_open()?;
        let index = self.current.ok_or(PdfError::NoCurrentPage)?;
        if self.images.contains_key(name) {
            return Err(PdfError::InvalidStructure(format!(
                "image {name} is already embedded"
            )));
        }

        let (stream, feeder) = EmbeddedStream::image(
            &mut self.store,
            width,
            height,
            color_space,
            bits_per_component,
        );
        let id = stream.id();
        self.buffer.get_mut(index)?.add_xobject(name, id);
        self.images.insert(name.to_string(), id);
        self.resources.push(Box::new(stream));
        debug!(name, object = id.number(), "image embedded");
        Ok(feeder)
    }

    /// Paints a previously embedded image on the current page.
    pub fn place_image(&mut self, name: &str, x: f64, y: f64, width: f64, height: f64) -> Result<&mut Self> {
        self.ensure_open()?;
        let id = self
            .images
            .get(name)
            .copied()
            .ok_or_else(|| PdfError::InvalidStructure(format!("no image named {name}")))?;

        let mut graphics = GraphicsContext::new();
        graphics.draw_image(name, x, y, width, height);

        let page = self.current_page_mut()?;
        page.add_xobject(name, id);
        page.write(graphics.operations().as_bytes());
        Ok(self)
    }

    // Outlines

    /// Adds an outline entry at the current outline level.
    ///
    /// Without a destination the entry points at the top of the current page.
    /// Does nothing when outlines are disabled.
    pub fn add_outline(
        &mut self,
        title: &str,
        destination: Option<Destination>,
        options: OutlineOptions,
    ) -> Result<&mut Self> {
        self.ensure_open()?;
        if self.outlines.is_none() {
            return Ok(self);
        }

        let dest = self.resolve_destination(destination)?;
        if let Some(tree) = self.outlines.as_mut() {
            let id = tree.add(&mut self.store, title, dest, &options)?;
            let depth = tree.depth();
            self.emit(DocumentEvent::OutlineAdded {
                title: title.to_string(),
                id,
                depth,
            });
        }
        Ok(self)
    }

    /// Nests subsequent outline entries under the last one added.
    pub fn enter_outline_level(&mut self) -> Result<&mut Self> {
        self.ensure_open()?;
        if let Some(tree) = self.outlines.as_mut() {
            tree.enter_level()?;
        }
        Ok(self)
    }

    pub fn exit_outline_level(&mut self) -> Result<&mut Self> {
        self.ensure_open()?;
        if let Some(tree) = self.outlines.as_mut() {
            tree.exit_level()?;
        }
        Ok(self)
    }

    pub fn outlines(&self) -> Option<&OutlineTree> {
        self.outlines.as_ref()
    }

    // Metadata

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: DocumentMetadata) {
        self.metadata = metadata;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.metadata.title = Some(title.into());
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.metadata.author = Some(author.into());
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.metadata.subject = Some(subject.into());
    }

    pub fn set_keywords(&mut self, keywords: impl Into<String>) {
        self.metadata.keywords = Some(keywords.into());
    }

    pub fn set_creator(&mut self, creator: impl Into<String>) {
        self.metadata.creator = Some(creator.into());
    }

    pub fn set_producer(&mut self, producer: impl Into<String>) {
        self.metadata.producer = Some(producer.into());
    }

    pub fn set_creation_date(&mut self, date: DateTime<Utc>) {
        self.metadata.creation_date = Some(date);
    }

    pub fn set_modification_date(&mut self, date: DateTime<Utc>) {
        self.metadata.modification_date = Some(date);
    }

    // Caller-owned objects

    /// Allocates an object the caller fills in and writes with
    /// [`write_reference`](Document::write_reference). Allowed until the
    /// document is finalized, including after `end()`.
    pub fn create_reference(&mut self, dictionary: Dictionary) -> Result<Reference> {
        if self.is_finalized() {
            return Err(PdfError::AlreadyFinalized);
        }
        Ok(self.store.create(dictionary))
    }

    /// Writes a caller-owned object. If `end()` has already run and this was
    /// the last outstanding object, the document finalizes here.
    pub fn write_reference(&mut self, reference: Reference) -> Result<DocumentState> {
        if self.is_finalized() {
            return Err(PdfError::AlreadyFinalized);
        }
        self.store.write(reference)?;
        self.try_finalize()
    }

    // End of document

    /// Stops accepting input and writes everything that is ready.
    ///
    /// Returns [`DocumentState::Finalized`] if nothing was left outstanding,
    /// [`DocumentState::Ending`] otherwise. Calling it again only reports the
    /// current state.
    pub fn end(&mut self) -> Result<DocumentState> {
        if self.state != DocumentState::Open {
            debug!(state = %self.state, "end() called again");
            return Ok(self.state);
        }
        self.transition(DocumentState::Ending);

        self.flush_pages()?;

        let info = self.store.create(self.metadata.to_dictionary());
        self.info_id = Some(info.id());
        self.store.write(info)?;

        self.drive_resources()?;

        if let Some(mut pages_root) = self.pages_root.take() {
            let kids: Vec<Object> = self.kids.iter().map(|id| Object::Reference(*id)).collect();
            let dict = pages_root.dictionary_mut();
            dict.set("Kids", kids);
            dict.set("Count", self.kids.len());
            self.store.write(pages_root)?;
        }

        let mut has_outline_entries = false;
        if let Some(tree) = self.outlines.as_mut() {
            tree.finalize_all(&mut self.store)?;
            has_outline_entries = !tree.is_empty();
        }

        if let Some(mut catalog) = self.catalog.take() {
            if has_outline_entries {
                catalog
                    .dictionary_mut()
                    .set("PageMode", Object::name("UseOutlines"));
            }
            self.store.write(catalog)?;
        }

        self.try_finalize()
    }

    /// Collects data for deferred resources and finalizes once nothing is
    /// pending. Only does work in the [`DocumentState::Ending`] state.
    pub fn poll(&mut self) -> Result<DocumentState> {
        if self.state != DocumentState::Ending {
            return Ok(self.state);
        }
        self.drive_resources()?;
        self.try_finalize()
    }

    /// Objects allocated but not written yet.
    pub fn pending(&self) -> usize {
        self.store.pending()
    }

    /// Objects allocated so far.
    pub fn object_count(&self) -> usize {
        self.store.table().len()
    }

    pub fn bytes_written(&self) -> u64 {
        self.store.offset()
    }

    /// Times a write had to wait for the sink to drain.
    pub fn stalls(&self) -> u64 {
        self.store.emitter().stalls()
    }

    pub fn catalog_id(&self) -> ObjectId {
        self.catalog_id
    }

    pub fn pages_id(&self) -> ObjectId {
        self.pages_id
    }

    pub fn info_id(&self) -> Option<ObjectId> {
        self.info_id
    }

    pub fn into_sink(self) -> S {
        self.store.into_sink()
    }

    // Deprecated surface

    #[deprecated(since = "0.3.0", note = "documents stream as they are built; use Document::create")]
    pub fn save(&mut self, _path: impl AsRef<Path>) -> Result<()> {
        Err(PdfError::Deprecated(
            "save(path) is no longer supported; open the document with Document::create(path, config) and call end()",
        ))
    }

    #[deprecated(since = "0.3.0", note = "documents stream as they are built; use Document::new with a Vec<u8> sink")]
    pub fn write(&mut self, _buffer: &mut Vec<u8>) -> Result<()> {
        Err(PdfError::Deprecated(
            "write(buffer) is no longer supported; open the document with Document::new(Vec::new(), config) and take the bytes with into_sink()",
        ))
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            DocumentState::Open => Ok(()),
            DocumentState::Ending | DocumentState::Finalized => Err(PdfError::DocumentEnded),
        }
    }

    fn transition(&mut self, next: DocumentState) {
        debug!(from = %self.state, to = %next, "document state");
        self.state = next;
    }

    fn emit(&mut self, event: DocumentEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    fn current_page_mut(&mut self) -> Result<&mut Page> {
        let index = self.current.ok_or(PdfError::NoCurrentPage)?;
        self.buffer.get_mut(index)
    }

    fn font_resource(&mut self, font: Font) -> (String, ObjectId) {
        if let Some((name, id)) = self.fonts.get(&font) {
            return (name.clone(), *id);
        }
        let resource = StandardFont::new(&mut self.store, font);
        let name = format!("F{}", self.fonts.len() + 1);
        let id = resource.id();
        self.fonts.insert(font, (name.clone(), id));
        self.resources.push(Box::new(resource));
        (name, id)
    }

    fn resolve_destination(&self, destination: Option<Destination>) -> Result<Option<Vec<Object>>> {
        let destination = match destination {
            Some(destination) => destination,
            None => {
                let page = self.current.or_else(|| self.kids.len().checked_sub(1));
                match page.and_then(|index| self.kids.get(index)) {
                    Some(id) => Destination::page_top(PageDestination::PageRef(*id)),
                    None => return Ok(None),
                }
            }
        };

        let page = match destination.page {
            PageDestination::PageRef(id) => id,
            PageDestination::PageIndex(index) => self
                .kids
                .get(index)
                .copied()
                .ok_or(PdfError::InvalidPageNumber(index))?,
        };
        Ok(Some(destination.to_array(page)))
    }

    fn drive_resources(&mut self) -> Result<()> {
        let mut waiting = Vec::new();
        for mut resource in std::mem::take(&mut self.resources) {
            if resource.finalize(&mut self.store)? == Completion::Pending {
                waiting.push(resource);
            }
        }
        self.resources = waiting;
        Ok(())
    }

    fn try_finalize(&mut self) -> Result<DocumentState> {
        if self.state == DocumentState::Ending && self.store.pending() == 0 {
            let xref_offset = self.store.finish(self.catalog_id, self.info_id)?;
            debug!(
                objects = self.store.table().len(),
                xref_offset,
                stalls = self.stalls(),
                "trailer written"
            );
            self.transition(DocumentState::Finalized);
        }
        Ok(self.state)
    }
}
