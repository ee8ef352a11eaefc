//! Incremental PDF writing
//!
//! Objects are numbered when they are created and written the moment their
//! owner is done with them. [`ObjectStore`] is the only path from a
//! [`Reference`] to the output: it captures the emitter offset right before
//! the first byte of each object and records it in the [`ReferenceTable`],
//! so the cross-reference section can be produced once nothing is pending.

mod emitter;
mod reference;
mod sink;
mod table;
mod xref;

pub use emitter::ByteEmitter;
pub use reference::Reference;
pub use sink::{BoundedSink, Flow, Sink, WriteSink};
pub use table::ReferenceTable;
pub use xref::{trailer_dictionary, write_xref_and_trailer, xref_section, XREF_ENTRY_LEN};

use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, ObjectId};
use tracing::trace;

/// Binary marker line recommended after the header so transports treat the
/// file as binary.
pub const BINARY_MARKER: [u8; 6] = [b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'];

/// Creates and writes indirect objects.
///
/// Resources receive a `&mut dyn ObjectWriter` when they are finalized so
/// they can add objects of their own.
pub trait ObjectWriter {
    /// Allocates a new object number with `dictionary` as its payload.
    fn create(&mut self, dictionary: Dictionary) -> Reference;

    /// Writes the object and returns the offset it was written at.
    fn write(&mut self, reference: Reference) -> Result<u64>;
}

/// Reference table and byte emitter bound together.
pub struct ObjectStore<S: Sink> {
    emitter: ByteEmitter<S>,
    table: ReferenceTable,
    compress: bool,
}

impl<S: Sink> ObjectStore<S> {
    pub fn new(sink: S, compress: bool) -> Self {
        Self {
            emitter: ByteEmitter::new(sink),
            table: ReferenceTable::new(),
            compress,
        }
    }

    /// Writes `%PDF-<version>` and the binary marker line.
    pub fn write_header(&mut self, version: &str) -> Result<()> {
        self.emitter.write_line(&format!("%PDF-{version}"))?;
        self.emitter.write(&BINARY_MARKER)
    }

    /// Writes raw bytes that are not part of any object.
    pub fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.emitter.write(data)
    }

    pub fn pending(&self) -> usize {
        self.table.pending()
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    pub fn emitter(&self) -> &ByteEmitter<S> {
        &self.emitter
    }

    pub fn offset(&self) -> u64 {
        self.emitter.offset()
    }

    /// Writes the cross-reference section and trailer, then closes the sink.
    ///
    /// Fails if any allocated object is still unwritten.
    pub fn finish(&mut self, root: ObjectId, info: Option<ObjectId>) -> Result<u64> {
        if let Some(id) = self.table.unresolved().next() {
            return Err(PdfError::InvalidStructure(format!(
                "cannot write trailer: object {} is still pending",
                id.number()
            )));
        }
        let xref_offset = write_xref_and_trailer(&mut self.emitter, &self.table, root, info)?;
        self.emitter.close()?;
        Ok(xref_offset)
    }

    pub fn into_sink(self) -> S {
        self.emitter.into_sink()
    }
}

impl<S: Sink> ObjectWriter for ObjectStore<S> {
    fn create(&mut self, dictionary: Dictionary) -> Reference {
        Reference::new(self.table.allocate(), dictionary)
    }

    fn write(&mut self, reference: Reference) -> Result<u64> {
        let id = reference.id();
        self.table.check_pending(id)?;

        let offset = self.emitter.offset();
        let bytes = reference.serialize(self.compress)?;
        self.emitter.write(&bytes)?;
        self.table.resolve(id, offset)?;

        trace!(object = id.number(), offset, len = bytes.len(), "wrote object");
        Ok(offset)
    }
}
