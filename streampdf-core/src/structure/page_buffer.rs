use crate::error::{PdfError, Result};
use std::fmt;

/// Window of pages currently held in memory, addressed by global index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    /// Global index of the first buffered page.
    pub start: usize,
    /// Number of buffered pages.
    pub count: usize,
}

impl PageRange {
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.start + self.count
    }

    /// Global index the next added page will receive.
    pub fn end(&self) -> usize {
        self.start + self.count
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(
                f,
                "no pages are buffered (next page index is {})",
                self.start
            )
        } else {
            write!(
                f,
                "current buffer covers pages {} to {}",
                self.start,
                self.start + self.count - 1
            )
        }
    }
}

/// Ordered window of pages awaiting flush.
///
/// A page keeps its global index for its whole life: the buffer position of
/// page `k` is `k - start`, and `start` only grows as pages are flushed.
#[derive(Debug)]
pub struct PageBuffer<P> {
    pages: Vec<P>,
    start: usize,
}

impl<P> Default for PageBuffer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> PageBuffer<P> {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            start: 0,
        }
    }

    /// Appends a page and returns its global index.
    pub fn push(&mut self, page: P) -> usize {
        self.pages.push(page);
        self.start + self.pages.len() - 1
    }

    pub fn range(&self) -> PageRange {
        PageRange {
            start: self.start,
            count: self.pages.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Looks up a buffered page by its global index.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut P> {
        let range = self.range();
        if !range.contains(index) {
            return Err(PdfError::PageOutOfRange {
                index,
                buffered: range,
            });
        }
        Ok(&mut self.pages[index - self.start])
    }

    /// Detaches every buffered page and advances the window past them.
    ///
    /// The buffer is already empty when this returns, so pages pushed while
    /// the detached ones are being written land in the next window.
    pub fn take_all(&mut self) -> Vec<P> {
        let pages = std::mem::take(&mut self.pages);
        self.start += pages.len();
        pages
    }
}
