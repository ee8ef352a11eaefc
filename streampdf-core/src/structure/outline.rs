//! Document outline (bookmarks) according to ISO 32000-1 Section 12.3.3
//!
//! Entries are linked as they are added: by the time an entry exists, its
//! `Parent`, `Prev`, and the parent's `First`, `Last` and `Count` are already
//! in place. Writing the tree out only has to visit every entry once.

use crate::error::{PdfError, Result};
use crate::graphics::Color;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::writer::{ObjectWriter, Reference};
use bitflags::bitflags;
use tracing::debug;

bitflags! {
    /// Outline item text style (`/F`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct OutlineFlags: u32 {
        const ITALIC = 1;
        const BOLD = 1 << 1;
    }
}

/// Per-entry presentation options.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineOptions {
    /// Whether the entry's children are shown. Closed entries write a
    /// negative `Count`.
    pub expanded: bool,
    /// Title color (`/C`)
    pub color: Option<Color>,
    pub flags: OutlineFlags,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            expanded: true,
            color: None,
            flags: OutlineFlags::empty(),
        }
    }
}

impl OutlineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn closed(mut self) -> Self {
        self.expanded = false;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.flags |= OutlineFlags::BOLD;
        self
    }

    pub fn italic(mut self) -> Self {
        self.flags |= OutlineFlags::ITALIC;
        self
    }
}

/// Element of one outline level: either an entry of that level or a nested
/// level anchored under the entry that precedes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelItem {
    Entry(usize),
    SubLevel(Vec<LevelItem>),
}

#[derive(Debug)]
struct Entry {
    id: ObjectId,
    reference: Option<Reference>,
    expanded: bool,
}

#[derive(Debug)]
struct Level {
    items: Vec<LevelItem>,
    /// Entry owning this level; `None` for the top level, whose parent is the
    /// outlines root.
    head: Option<usize>,
}

impl Level {
    fn last_entry(&self) -> Option<usize> {
        self.items.iter().rev().find_map(|item| match item {
            LevelItem::Entry(index) => Some(*index),
            LevelItem::SubLevel(_) => None,
        })
    }
}

/// Outline tree rooted at the document's `/Outlines` dictionary.
#[derive(Debug)]
pub struct OutlineTree {
    root_id: ObjectId,
    root: Option<Reference>,
    entries: Vec<Entry>,
    levels: Vec<Level>,
}

impl OutlineTree {
    /// Takes ownership of the outlines root dictionary.
    pub fn new(root: Reference) -> Self {
        Self {
            root_id: root.id(),
            root: Some(root),
            entries: Vec::new(),
            levels: vec![Level {
                items: Vec::new(),
                head: None,
            }],
        }
    }

    pub fn root_id(&self) -> ObjectId {
        self.root_id
    }

    /// Nesting depth of the current level; 0 is the top level.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Total number of entries at every level.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_written(&self) -> bool {
        self.root.is_none()
    }

    /// Items of the top level, including nested levels already closed.
    pub fn root_items(&self) -> &[LevelItem] {
        &self.levels[0].items
    }

    /// Dictionary of an entry or of the root, while it is still unwritten.
    pub fn dictionary(&self, id: ObjectId) -> Option<&Dictionary> {
        if id == self.root_id {
            return self.root.as_ref().map(Reference::dictionary);
        }
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .and_then(|entry| entry.reference.as_ref())
            .map(Reference::dictionary)
    }

    /// Creates an entry at the current level and links it into the tree.
    pub fn add(
        &mut self,
        writer: &mut dyn ObjectWriter,
        title: &str,
        destination: Option<Vec<Object>>,
        options: &OutlineOptions,
    ) -> Result<ObjectId> {
        if self.is_written() {
            return Err(PdfError::DocumentEnded);
        }

        let level = self.current();
        let head = level.head;
        let prev = level.last_entry();
        let parent_id = match head {
            Some(index) => self.entries[index].id,
            None => self.root_id,
        };

        let mut dict = Dictionary::new();
        dict.set("Title", title);
        dict.set("Parent", parent_id);
        if let Some(dest) = destination {
            dict.set("Dest", dest);
        }
        if let Some(color) = options.color {
            let (r, g, b) = color.to_rgb();
            dict.set("C", vec![Object::Real(r), Object::Real(g), Object::Real(b)]);
        }
        if !options.flags.is_empty() {
            dict.set("F", options.flags.bits() as i64);
        }

        let mut reference = writer.create(dict);
        let id = reference.id();

        if let Some(prev) = prev {
            reference.dictionary_mut().set("Prev", self.entries[prev].id);
            self.pending_dict(Some(prev))?.set("Next", id);
        }

        let parent = self.pending_dict(head)?;
        if !parent.contains_key("First") {
            parent.set("First", id);
        }
        parent.set("Last", id);
        parent.increment("Count", 1);

        self.entries.push(Entry {
            id,
            reference: Some(reference),
            expanded: options.expanded,
        });
        let index = self.entries.len() - 1;
        self.current_mut().items.push(LevelItem::Entry(index));
        Ok(id)
    }

    /// Opens a sub-level under the last entry of the current level.
    pub fn enter_level(&mut self) -> Result<()> {
        let head = self.current().last_entry().ok_or_else(|| {
            PdfError::InvalidStructure(
                "cannot open an outline level before adding an entry to nest it under".to_string(),
            )
        })?;
        self.levels.push(Level {
            items: Vec::new(),
            head: Some(head),
        });
        debug!(depth = self.depth(), "entered outline level");
        Ok(())
    }

    /// Closes the current sub-level and returns to its parent level.
    pub fn exit_level(&mut self) -> Result<()> {
        if self.levels.len() == 1 {
            return Err(PdfError::InvalidStructure(
                "already at the top outline level".to_string(),
            ));
        }
        if let Some(level) = self.levels.pop() {
            if !level.items.is_empty() {
                self.current_mut().items.push(LevelItem::SubLevel(level.items));
            }
        }
        debug!(depth = self.depth(), "exited outline level");
        Ok(())
    }

    /// Writes every entry, level by level, then the root.
    ///
    /// Levels still open are closed first. Calling this again after the tree
    /// was written does nothing.
    pub fn finalize_all(&mut self, writer: &mut dyn ObjectWriter) -> Result<()> {
        if self.is_written() {
            return Ok(());
        }
        while self.levels.len() > 1 {
            self.exit_level()?;
        }

        let items = std::mem::take(&mut self.levels[0].items);
        let written = self.write_level(writer, &items);
        self.levels[0].items = items;
        written?;

        if let Some(root) = self.root.take() {
            writer.write(root)?;
        }
        debug!(entries = self.entries.len(), "outline tree written");
        Ok(())
    }

    fn write_level(&mut self, writer: &mut dyn ObjectWriter, items: &[LevelItem]) -> Result<()> {
        for item in items {
            match item {
                LevelItem::Entry(index) => {
                    let entry = &mut self.entries[*index];
                    if let Some(mut reference) = entry.reference.take() {
                        if !entry.expanded {
                            let dict = reference.dictionary_mut();
                            if let Some(count) = dict.get_integer("Count").filter(|c| *c > 0) {
                                dict.set("Count", -count);
                            }
                        }
                        writer.write(reference)?;
                    }
                }
                LevelItem::SubLevel(level) => self.write_level(writer, level)?,
            }
        }
        Ok(())
    }

    fn current(&self) -> &Level {
        &self.levels[self.levels.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Level {
        let last = self.levels.len() - 1;
        &mut self.levels[last]
    }

    fn pending_dict(&mut self, owner: Option<usize>) -> Result<&mut Dictionary> {
        let reference = match owner {
            Some(index) => self.entries[index].reference.as_mut(),
            None => self.root.as_mut(),
        };
        reference
            .map(Reference::dictionary_mut)
            .ok_or_else(|| PdfError::InvalidStructure("outline entry already written".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ObjectStore;
    use pretty_assertions::assert_eq;

    fn tree() -> (ObjectStore<Vec<u8>>, OutlineTree) {
        let mut store = ObjectStore::new(Vec::<u8>::new(), false);
        let root = store.create(Dictionary::typed("Outlines"));
        (store, OutlineTree::new(root))
    }

    fn add(store: &mut ObjectStore<Vec<u8>>, tree: &mut OutlineTree, title: &str) -> ObjectId {
        tree.add(store, title, None, &OutlineOptions::default()).unwrap()
    }

    fn link(tree: &OutlineTree, id: ObjectId, key: &str) -> Option<ObjectId> {
        tree.dictionary(id)
            .and_then(|dict| dict.get(key))
            .and_then(Object::as_reference)
    }

    fn count(tree: &OutlineTree, id: ObjectId) -> Option<i64> {
        tree.dictionary(id).and_then(|dict| dict.get_integer("Count"))
    }

    #[test]
    fn test_siblings_are_doubly_linked() {
        let (mut store, mut tree) = tree();
        let root = tree.root_id();
        let a = add(&mut store, &mut tree, "A");
        let b = add(&mut store, &mut tree, "B");
        let c = add(&mut store, &mut tree, "C");

        assert_eq!(link(&tree, a, "Next"), Some(b));
        assert_eq!(link(&tree, b, "Prev"), Some(a));
        assert_eq!(link(&tree, b, "Next"), Some(c));
        assert_eq!(link(&tree, c, "Prev"), Some(b));
        assert_eq!(link(&tree, c, "Next"), None);
        assert_eq!(link(&tree, a, "Prev"), None);

        assert_eq!(link(&tree, root, "First"), Some(a));
        assert_eq!(link(&tree, root, "Last"), Some(c));
        assert_eq!(count(&tree, root), Some(3));
        for id in [a, b, c] {
            assert_eq!(link(&tree, id, "Parent"), Some(root));
        }
    }

    #[test]
    fn test_sub_level_links_to_head_entry() {
        let (mut store, mut tree) = tree();
        let root = tree.root_id();
        let chapter = add(&mut store, &mut tree, "Chapter 1");
        tree.enter_level().unwrap();
        assert_eq!(tree.depth(), 1);
        let s1 = add(&mut store, &mut tree, "1.1");
        let s2 = add(&mut store, &mut tree, "1.2");
        tree.exit_level().unwrap();
        let next = add(&mut store, &mut tree, "Chapter 2");

        assert_eq!(link(&tree, chapter, "First"), Some(s1));
        assert_eq!(link(&tree, chapter, "Last"), Some(s2));
        assert_eq!(count(&tree, chapter), Some(2));
        assert_eq!(link(&tree, s1, "Parent"), Some(chapter));

        // the sub-level does not count as a sibling at the top
        assert_eq!(link(&tree, chapter, "Next"), Some(next));
        assert_eq!(link(&tree, next, "Prev"), Some(chapter));
        assert_eq!(count(&tree, root), Some(2));

        assert_eq!(
            tree.root_items(),
            &[
                LevelItem::Entry(0),
                LevelItem::SubLevel(vec![LevelItem::Entry(1), LevelItem::Entry(2)]),
                LevelItem::Entry(3),
            ]
        );
    }

    #[test]
    fn test_level_misuse() {
        let (mut store, mut tree) = tree();
        assert!(matches!(tree.enter_level(), Err(PdfError::InvalidStructure(_))));
        assert!(matches!(tree.exit_level(), Err(PdfError::InvalidStructure(_))));

        add(&mut store, &mut tree, "A");
        tree.enter_level().unwrap();
        tree.exit_level().unwrap();
        assert_eq!(tree.root_items(), &[LevelItem::Entry(0)]);
    }

    #[test]
    fn test_options_written_to_entry() {
        let (mut store, mut tree) = tree();
        let options = OutlineOptions::new()
            .with_color(Color::rgb(1.0, 0.0, 0.0))
            .bold()
            .italic();
        let id = tree
            .add(&mut store, "Styled", None, &options)
            .unwrap();

        let dict = tree.dictionary(id).unwrap();
        assert_eq!(dict.get_integer("F"), Some(3));
        assert_eq!(
            dict.get("C"),
            Some(&Object::Array(vec![
                Object::Real(1.0),
                Object::Real(0.0),
                Object::Real(0.0)
            ]))
        );
    }

    #[test]
    fn test_finalize_writes_everything_once() {
        let (mut store, mut tree) = tree();
        let closed = tree
            .add(&mut store, "Closed", None, &OutlineOptions::new().closed())
            .unwrap();
        tree.enter_level().unwrap();
        add(&mut store, &mut tree, "Hidden 1");
        add(&mut store, &mut tree, "Hidden 2");
        // level left open on purpose

        assert_eq!(store.pending(), 4);
        tree.finalize_all(&mut store).unwrap();
        assert_eq!(store.pending(), 0);
        assert!(tree.is_written());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.dictionary(closed), None);

        tree.finalize_all(&mut store).unwrap();
        assert!(matches!(
            tree.add(&mut store, "Late", None, &OutlineOptions::default()),
            Err(PdfError::DocumentEnded)
        ));

        let output = String::from_utf8_lossy(&store.into_sink()).into_owned();
        assert!(output.contains("/Count -2"));
        assert_eq!(output.matches("endobj").count(), 4);
    }
}
