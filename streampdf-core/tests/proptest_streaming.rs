//! Property-based tests for the streaming writer
//!
//! Checks the ordering guarantees of incremental output: recorded offsets
//! always match where an object starts, the trailer appears exactly when
//! `end()` has run and nothing is pending, and the page window only admits
//! buffered pages.

use proptest::prelude::*;
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use streampdf::objects::Dictionary;
use streampdf::writer::{ObjectStore, ObjectWriter, XREF_ENTRY_LEN};
use streampdf::{
    BoundedSink, Document, DocumentConfig, DocumentState, PageOptions, PdfError, WriteSink,
};

fn config() -> DocumentConfig {
    DocumentConfig::default().with_compression(false)
}

// Output that stays readable while the document still owns the sink
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn trailers(&self) -> usize {
        String::from_utf8_lossy(&self.0.borrow()).matches("trailer\n").count()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// Object indices in a random write order
fn write_order(max: usize) -> impl Strategy<Value = Vec<usize>> {
    (0..=max).prop_flat_map(|n| Just((0..n).collect::<Vec<usize>>()).prop_shuffle())
}

prop_compose! {
    fn payloads()(sizes in prop::collection::vec(0usize..512, 1..12)) -> Vec<Vec<u8>> {
        sizes
            .into_iter()
            .enumerate()
            .map(|(i, size)| vec![b'a' + (i % 26) as u8; size])
            .collect()
    }
}

proptest! {
    #[test]
    fn test_finalizes_only_after_last_reference(order in write_order(8)) {
        let mut doc = Document::new(Vec::<u8>::new(), config()).unwrap();
        doc.add_page(PageOptions::a4()).unwrap();

        let mut held: Vec<Option<_>> = (0..order.len())
            .map(|_| Some(doc.create_reference(Dictionary::typed("Custom")).unwrap()))
            .collect();

        let state = doc.end().unwrap();
        if order.is_empty() {
            prop_assert_eq!(state, DocumentState::Finalized);
        } else {
            prop_assert_eq!(state, DocumentState::Ending);
        }

        for (step, index) in order.iter().enumerate() {
            let reference = held[*index].take().unwrap();
            let state = doc.write_reference(reference).unwrap();
            if step + 1 == order.len() {
                prop_assert_eq!(state, DocumentState::Finalized);
            } else {
                prop_assert_eq!(state, DocumentState::Ending);
                prop_assert_eq!(doc.pending(), order.len() - step - 1);
            }
        }

        let bytes = doc.into_sink();
        let text = String::from_utf8_lossy(&bytes);
        prop_assert_eq!(text.matches("trailer").count(), 1);
    }

    #[test]
    fn test_resolving_everything_while_open_waits_for_end(
        total in 1usize..8,
        written_before_end in 0usize..8,
    ) {
        let written_before_end = written_before_end.min(total);
        let buffer = SharedBuffer::default();
        let mut doc = Document::new(WriteSink::new(buffer.clone()), config()).unwrap();
        doc.add_page(PageOptions::a4()).unwrap();

        let mut held: Vec<_> = (0..total)
            .map(|_| doc.create_reference(Dictionary::typed("Custom")).unwrap())
            .collect();
        let after_end = held.split_off(written_before_end);

        for reference in held {
            prop_assert_eq!(doc.write_reference(reference).unwrap(), DocumentState::Open);
        }
        prop_assert_eq!(doc.state(), DocumentState::Open);
        prop_assert_eq!(buffer.trailers(), 0);

        let state = doc.end().unwrap();
        if after_end.is_empty() {
            prop_assert_eq!(state, DocumentState::Finalized);
        } else {
            prop_assert_eq!(state, DocumentState::Ending);
            prop_assert_eq!(buffer.trailers(), 0);
            for reference in after_end {
                doc.write_reference(reference).unwrap();
            }
            prop_assert_eq!(doc.state(), DocumentState::Finalized);
        }

        prop_assert_eq!(doc.end().unwrap(), DocumentState::Finalized);
        prop_assert_eq!(buffer.trailers(), 1);
        let bytes = buffer.0.borrow();
        prop_assert!(bytes.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn test_offset_is_byte_position(data in payloads(), rotation in any::<usize>()) {
        let mut store = ObjectStore::new(Vec::<u8>::new(), false);
        store.write_header("1.7").unwrap();

        let mut references: Vec<_> = data
            .iter()
            .map(|_| store.create(Dictionary::new()))
            .collect();

        // rotate by a random amount so objects are not written in number order
        let shift = rotation % references.len();
        references.rotate_left(shift);

        let mut written = Vec::new();
        for mut reference in references {
            let payload = &data[reference.id().number() as usize - 1];
            reference.append_data(payload);
            let number = reference.id().number();
            let before = store.offset();
            let offset = store.write(reference).unwrap();
            prop_assert_eq!(offset, before);
            written.push((number, offset));
        }

        let output = store.into_sink();
        for (number, offset) in written {
            let header = format!("{number} 0 obj\n");
            prop_assert!(output[offset as usize..].starts_with(header.as_bytes()));
        }
    }

    #[test]
    fn test_xref_has_one_line_per_object(pages in 0usize..6, outlines in any::<bool>()) {
        let mut doc = Document::new(Vec::<u8>::new(), config().with_outlines(outlines)).unwrap();
        for _ in 0..pages {
            doc.add_page(PageOptions::a4()).unwrap();
        }
        doc.end().unwrap();
        let total = doc.object_count();

        let bytes = doc.into_sink();
        let text = String::from_utf8_lossy(&bytes);
        let section = &text[text.rfind("\nxref\n").unwrap() + 1..text.rfind("trailer\n").unwrap()];
        let mut lines = section.split_inclusive('\n');
        prop_assert_eq!(lines.next(), Some("xref\n"));
        let header = format!("0 {}\n", total + 1);
        prop_assert_eq!(lines.next(), Some(header.as_str()));

        let entries: Vec<&str> = lines.collect();
        prop_assert_eq!(entries.len(), total + 1);
        for entry in entries {
            prop_assert_eq!(entry.len(), XREF_ENTRY_LEN);
        }
        let size = format!("/Size {}\n", total + 1);
        prop_assert!(text.contains(&size));
    }

    #[test]
    fn test_switch_to_page_admits_only_buffered(
        before_flush in 0usize..5,
        after_flush in 0usize..5,
        buffer in any::<bool>(),
        target in 0usize..12,
    ) {
        let mut doc = Document::new(Vec::<u8>::new(), config().with_buffer_pages(buffer)).unwrap();
        for _ in 0..before_flush {
            doc.add_page(PageOptions::a4()).unwrap();
        }
        doc.flush_pages().unwrap();
        for _ in 0..after_flush {
            doc.add_page(PageOptions::a4()).unwrap();
        }

        let window = doc.buffered_page_range();
        prop_assert_eq!(window.start + window.count, before_flush + after_flush);
        let result = doc.switch_to_page(target).map(|_| ());
        match result {
            Ok(()) => {
                prop_assert!(window.contains(target));
                prop_assert_eq!(doc.current_page(), Some(target));
            }
            Err(PdfError::PageOutOfRange { index, buffered }) => {
                prop_assert!(!window.contains(target));
                prop_assert_eq!(index, target);
                prop_assert_eq!(buffered, window);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn test_bounded_sink_output_matches_unbounded(pages in 1usize..5, high_water_mark in 1usize..256) {
        let mut plain = Document::new(Vec::<u8>::new(), config()).unwrap();
        let mut bounded = Document::new(BoundedSink::new(Vec::<u8>::new(), high_water_mark), config()).unwrap();
        let metadata = plain.metadata().clone();
        bounded.set_metadata(metadata);

        for i in 0..pages {
            plain.add_page(PageOptions::a4()).unwrap();
            bounded.add_page(PageOptions::a4()).unwrap();
            let line = format!("line {i}");
            plain.text(&line, 72.0, 700.0).unwrap();
            bounded.text(&line, 72.0, 700.0).unwrap();
        }
        plain.end().unwrap();
        bounded.end().unwrap();

        prop_assert_eq!(bounded.into_sink().into_inner(), plain.into_sink());
    }
}
