use crate::error::Result;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::writer::{ObjectWriter, Reference};
use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Page sizes in points (1/72 inch), portrait orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PageSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Custom { width: f64, height: f64 },
}

impl PageSize {
    /// (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match *self {
            PageSize::A3 => (842.0, 1191.0),
            PageSize::A4 => (595.0, 842.0),
            PageSize::A5 => (420.0, 595.0),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (width, height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Layout {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins in points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(72.0)
    }
}

impl Margins {
    pub fn uniform(value: f64) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }
}

/// How a new page is laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageOptions {
    pub size: PageSize,
    pub layout: Layout,
    pub margins: Margins,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            layout: Layout::Portrait,
            margins: Margins::default(),
        }
    }
}

impl PageOptions {
    pub fn new(size: PageSize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn a4() -> Self {
        Self::new(PageSize::A4)
    }

    pub fn letter() -> Self {
        Self::new(PageSize::Letter)
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// (width, height) after applying the layout.
    pub fn dimensions(&self) -> (f64, f64) {
        let (width, height) = self.size.dimensions();
        match self.layout {
            Layout::Portrait => (width, height),
            Layout::Landscape => (height, width),
        }
    }
}

/// Content stream of one page. Bytes accumulate until the page is flushed.
#[derive(Debug)]
pub struct ContentStream {
    reference: Reference,
}

impl ContentStream {
    fn new(reference: Reference) -> Self {
        Self { reference }
    }

    pub fn id(&self) -> ObjectId {
        self.reference.id()
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.reference.append_data(bytes);
    }

    pub fn len(&self) -> usize {
        self.reference.declared_length().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes the stream object.
    pub fn end(mut self, writer: &mut dyn ObjectWriter) -> Result<u64> {
        if self.reference.data().is_none() {
            self.reference.append_data(b"");
        }
        writer.write(self.reference)
    }
}

/// A buffered page: its dictionary, its content stream and the resources
/// its content uses.
#[derive(Debug)]
pub struct Page {
    dictionary: Reference,
    content: ContentStream,
    options: PageOptions,
    fonts: IndexMap<String, ObjectId>,
    xobjects: IndexMap<String, ObjectId>,
}

impl Page {
    /// Allocates the page dictionary and its content stream, in that order.
    pub fn new(writer: &mut dyn ObjectWriter, parent: ObjectId, options: PageOptions) -> Self {
        let (width, height) = options.dimensions();
        let mut dict = Dictionary::typed("Page");
        dict.set("Parent", parent);
        dict.set(
            "MediaBox",
            vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width),
                Object::Real(height),
            ],
        );
        let mut dictionary = writer.create(dict);
        let content = ContentStream::new(writer.create(Dictionary::new()));
        dictionary.dictionary_mut().set("Contents", content.id());

        Self {
            dictionary,
            content,
            options,
            fonts: IndexMap::new(),
            xobjects: IndexMap::new(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.dictionary.id()
    }

    pub fn options(&self) -> &PageOptions {
        &self.options
    }

    pub fn width(&self) -> f64 {
        self.options.dimensions().0
    }

    pub fn height(&self) -> f64 {
        self.options.dimensions().1
    }

    pub fn margins(&self) -> &Margins {
        &self.options.margins
    }

    /// (left, bottom, right, top) inside the margins.
    pub fn content_area(&self) -> (f64, f64, f64, f64) {
        let (width, height) = self.options.dimensions();
        let m = &self.options.margins;
        (m.left, m.bottom, width - m.right, height - m.top)
    }

    pub fn content(&self) -> &ContentStream {
        &self.content
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.content.write(bytes);
    }

    pub fn add_font(&mut self, name: &str, id: ObjectId) {
        self.fonts.insert(name.to_string(), id);
    }

    pub fn add_xobject(&mut self, name: &str, id: ObjectId) {
        self.xobjects.insert(name.to_string(), id);
    }

    pub fn fonts(&self) -> &IndexMap<String, ObjectId> {
        &self.fonts
    }

    pub fn xobjects(&self) -> &IndexMap<String, ObjectId> {
        &self.xobjects
    }

    /// Writes the content stream, then the page dictionary with its
    /// `Resources`.
    pub fn finalize(self, writer: &mut dyn ObjectWriter) -> Result<()> {
        let Page {
            mut dictionary,
            content,
            fonts,
            xobjects,
            ..
        } = self;

        content.end(writer)?;

        let mut proc_set = vec![Object::name("PDF"), Object::name("Text")];
        if !xobjects.is_empty() {
            proc_set.extend(["ImageB", "ImageC", "ImageI"].map(Object::name));
        }
        let resources = dictionary.dictionary_mut().dict_entry("Resources");
        resources.set("ProcSet", proc_set);
        if !fonts.is_empty() {
            resources.set("Font", resource_dictionary(fonts));
        }
        if !xobjects.is_empty() {
            resources.set("XObject", resource_dictionary(xobjects));
        }

        writer.write(dictionary)?;
        Ok(())
    }
}

fn resource_dictionary(entries: IndexMap<String, ObjectId>) -> Dictionary {
    entries
        .into_iter()
        .map(|(name, id)| (name, Object::Reference(id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ObjectStore;

    #[test]
    fn test_page_sizes() {
        assert_eq!(PageSize::A4.dimensions(), (595.0, 842.0));
        assert_eq!(PageSize::Letter.dimensions(), (612.0, 792.0));
        assert_eq!(
            PageOptions::new(PageSize::A5)
                .with_layout(Layout::Landscape)
                .dimensions(),
            (595.0, 420.0)
        );
        assert_eq!(
            PageSize::Custom {
                width: 100.0,
                height: 50.0
            }
            .dimensions(),
            (100.0, 50.0)
        );
    }

    #[test]
    fn test_content_area() {
        let mut store = ObjectStore::new(Vec::<u8>::new(), false);
        let options = PageOptions::letter().with_margins(Margins {
            left: 50.0,
            right: 40.0,
            top: 30.0,
            bottom: 20.0,
        });
        let page = Page::new(&mut store, ObjectId::new(2, 0), options);
        assert_eq!(page.content_area(), (50.0, 20.0, 572.0, 762.0));
        assert_eq!(page.margins().left, 50.0);
    }

    #[test]
    fn test_page_creates_two_references() {
        let mut store = ObjectStore::new(Vec::<u8>::new(), false);
        let page = Page::new(&mut store, ObjectId::new(2, 0), PageOptions::a4());
        assert_eq!(store.pending(), 2);
        assert_eq!(page.id(), ObjectId::new(1, 0));
        assert_eq!(page.content().id(), ObjectId::new(2, 0));
        assert!(page.content().is_empty());
    }

    #[test]
    fn test_finalize_writes_content_then_dictionary() {
        let mut store = ObjectStore::new(Vec::<u8>::new(), false);
        let mut page = Page::new(&mut store, ObjectId::new(9, 0), PageOptions::a4());
        page.write(b"0 0 m 10 10 l S\n");
        page.add_font("F1", ObjectId::new(5, 0));
        page.add_xobject("Im1", ObjectId::new(6, 0));
        assert_eq!(page.content().len(), 16);

        page.finalize(&mut store).unwrap();
        assert_eq!(store.pending(), 0);

        let output = String::from_utf8(store.into_sink()).unwrap();
        let content_at = output.find("2 0 obj").unwrap();
        let page_at = output.find("1 0 obj").unwrap();
        assert!(content_at < page_at);
        assert!(output.contains("/Length 16"));
        assert!(output.contains("/MediaBox [0 0 595 842]"));
        assert!(output.contains("/Contents 2 0 R"));
        assert!(output.contains("/Font <<\n/F1 5 0 R\n>>"));
        assert!(output.contains("/XObject <<\n/Im1 6 0 R\n>>"));
        assert!(output.contains("/ProcSet [/PDF /Text /ImageB /ImageC /ImageI]"));
    }

    #[test]
    fn test_empty_page_still_has_content_stream() {
        let mut store = ObjectStore::new(Vec::<u8>::new(), false);
        let page = Page::new(&mut store, ObjectId::new(9, 0), PageOptions::a4());
        page.finalize(&mut store).unwrap();

        let output = String::from_utf8(store.into_sink()).unwrap();
        assert!(output.contains("/Length 0\n>>\nstream\n\nendstream"));
        assert!(!output.contains("/Font"));
    }
}
