use crate::error::{PdfError, Result};
use crate::writer::sink::{Flow, Sink};
use tracing::warn;

/// Append-only byte writer that owns the running output offset.
///
/// The offset is the number of bytes handed to the sink so far; object
/// positions in the cross-reference table are read from it and never
/// computed any other way.
pub struct ByteEmitter<S: Sink> {
    sink: S,
    offset: u64,
    backpressured: bool,
    stalls: u64,
    closed: bool,
}

impl<S: Sink> ByteEmitter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            offset: 0,
            backpressured: false,
            stalls: 0,
            closed: false,
        }
    }

    /// Total bytes written so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Whether the last write left the sink over its high-water mark.
    pub fn is_backpressured(&self) -> bool {
        self.backpressured
    }

    /// Number of times a write had to wait for the sink to drain.
    pub fn stalls(&self) -> u64 {
        self.stalls
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        if self.closed {
            return Err(PdfError::StreamClosed);
        }
        if self.backpressured {
            self.stalls += 1;
            self.sink.wait_ready()?;
            self.backpressured = false;
        }
        if self.sink.try_write(data)? == Flow::Backpressure {
            warn!(offset = self.offset, "output sink is over its high-water mark");
            self.backpressured = true;
        }
        self.offset += data.len() as u64;
        Ok(())
    }

    /// Writes `text` followed by a line feed.
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        let mut line = Vec::with_capacity(text.len() + 1);
        line.extend_from_slice(text.as_bytes());
        line.push(b'\n');
        self.write(&line)
    }

    /// Signals end of stream to the sink.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(PdfError::StreamClosed);
        }
        self.closed = true;
        self.sink.close()?;
        Ok(())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
