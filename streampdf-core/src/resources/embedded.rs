use super::{Completion, Resource};
use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Object, ObjectId};
use crate::writer::{ObjectWriter, Reference};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use tracing::debug;

/// Stream object whose body is delivered through a [`StreamFeeder`],
/// possibly from another thread and possibly after the document has ended.
///
/// The object is written once the feeder has been finished or dropped and
/// every chunk sent before that has been collected.
#[derive(Debug)]
pub struct EmbeddedStream {
    id: ObjectId,
    reference: Option<Reference>,
    receiver: Receiver<Vec<u8>>,
}

/// Sending half of an [`EmbeddedStream`].
#[derive(Debug)]
pub struct StreamFeeder {
    id: ObjectId,
    sender: Sender<Vec<u8>>,
}

impl EmbeddedStream {
    pub fn new(reference: Reference) -> (Self, StreamFeeder) {
        let (sender, receiver) = mpsc::channel();
        let id = reference.id();
        (
            Self {
                id,
                reference: Some(reference),
                receiver,
            },
            StreamFeeder { id, sender },
        )
    }

    /// Image XObject of `width` x `height` samples.
    pub fn image(
        writer: &mut dyn ObjectWriter,
        width: u32,
        height: u32,
        color_space: &str,
        bits_per_component: u8,
    ) -> (Self, StreamFeeder) {
        let mut dict = Dictionary::typed("XObject");
        dict.set("Subtype", Object::name("Image"));
        dict.set("Width", width as i64);
        dict.set("Height", height as i64);
        dict.set("ColorSpace", Object::name(color_space));
        dict.set("BitsPerComponent", bits_per_component as i64);
        Self::new(writer.create(dict))
    }

    pub fn is_written(&self) -> bool {
        self.reference.is_none()
    }
}

impl Resource for EmbeddedStream {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn finalize(&mut self, writer: &mut dyn ObjectWriter) -> Result<Completion> {
        let Some(reference) = self.reference.as_mut() else {
            return Ok(Completion::Complete);
        };

        loop {
            match self.receiver.try_recv() {
                Ok(chunk) => reference.append_data(&chunk),
                Err(TryRecvError::Empty) => return Ok(Completion::Pending),
                Err(TryRecvError::Disconnected) => break,
            }
        }

        if let Some(mut reference) = self.reference.take() {
            if reference.data().is_none() {
                reference.append_data(b"");
            }
            debug!(
                object = self.id.number(),
                len = reference.declared_length(),
                "embedded stream complete"
            );
            writer.write(reference)?;
        }
        Ok(Completion::Complete)
    }
}

impl StreamFeeder {
    /// Object the data is written into.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Queues a chunk of the stream body.
    pub fn feed(&self, chunk: impl Into<Vec<u8>>) -> Result<()> {
        self.sender
            .send(chunk.into())
            .map_err(|_| PdfError::StreamClosed)
    }

    /// Marks the body complete.
    pub fn finish(self) {}
}
