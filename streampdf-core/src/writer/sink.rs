//! Output sinks with explicit flow control
//!
//! A [`Sink`] accepts every write it is given, but reports through [`Flow`]
//! whether the consumer wants the producer to wait before the next one.

use std::io::{self, Write};

/// Flow-control signal returned by [`Sink::try_write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// The sink can take more data right away.
    Ready,
    /// The bytes were accepted, but the sink is over its high-water mark;
    /// call [`Sink::wait_ready`] before writing again.
    Backpressure,
}

/// Append-only byte consumer.
pub trait Sink {
    /// Accepts `buf` in full and reports whether more data is welcome.
    fn try_write(&mut self, buf: &[u8]) -> io::Result<Flow>;

    /// Blocks until the sink has drained below its high-water mark.
    fn wait_ready(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Signals end of stream. No writes follow.
    fn close(&mut self) -> io::Result<()>;
}

impl Sink for Vec<u8> {
    fn try_write(&mut self, buf: &[u8]) -> io::Result<Flow> {
        self.extend_from_slice(buf);
        Ok(Flow::Ready)
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Adapts any [`Write`] into a sink that never applies back-pressure.
pub struct WriteSink<W: Write> {
    inner: W,
}

impl<W: Write> WriteSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl WriteSink<io::BufWriter<std::fs::File>> {
    /// Creates (or truncates) a file and streams into it.
    pub fn create(path: impl AsRef<std::path::Path>) -> io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(io::BufWriter::new(file)))
    }
}

impl<W: Write> Sink for WriteSink<W> {
    fn try_write(&mut self, buf: &[u8]) -> io::Result<Flow> {
        self.inner.write_all(buf)?;
        Ok(Flow::Ready)
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Buffers writes in memory and signals back-pressure once more than
/// `high_water_mark` bytes are waiting; draining pushes them to the inner
/// writer.
pub struct BoundedSink<W: Write> {
    inner: W,
    pending: Vec<u8>,
    high_water_mark: usize,
    drains: usize,
}

impl<W: Write> BoundedSink<W> {
    pub fn new(inner: W, high_water_mark: usize) -> Self {
        Self {
            inner,
            pending: Vec::with_capacity(high_water_mark),
            high_water_mark,
            drains: 0,
        }
    }

    /// Bytes accepted but not yet handed to the inner writer.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// How many times the sink was drained on request.
    pub fn drain_count(&self) -> usize {
        self.drains
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn drain(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            self.inner.write_all(&self.pending)?;
            self.pending.clear();
        }
        Ok(())
    }
}

impl<W: Write> Sink for BoundedSink<W> {
    fn try_write(&mut self, buf: &[u8]) -> io::Result<Flow> {
        self.pending.extend_from_slice(buf);
        if self.pending.len() > self.high_water_mark {
            Ok(Flow::Backpressure)
        } else {
            Ok(Flow::Ready)
        }
    }

    fn wait_ready(&mut self) -> io::Result<()> {
        self.drains += 1;
        self.drain()
    }

    fn close(&mut self) -> io::Result<()> {
        self.drain()?;
        self.inner.flush()
    }
}
