//! Document configuration

use crate::error::{PdfError, Result};
use crate::page::PageOptions;
use crate::pdf_version;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options fixed for the lifetime of a [`Document`](crate::Document).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DocumentConfig {
    /// Version written in the header, e.g. "1.7"
    pub pdf_version: String,
    /// Flate-compress stream bodies (requires the `compression` feature)
    pub compress_streams: bool,
    /// Keep pages in memory until [`flush_pages`](crate::Document::flush_pages)
    /// or `end()`, so earlier pages can be revisited
    pub buffer_pages: bool,
    /// Create an outlines root; when off, outline calls do nothing
    pub outlines: bool,
    /// Add a page with `default_page` options as soon as the document opens
    pub auto_first_page: bool,
    pub default_page: PageOptions,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            pdf_version: "1.7".to_string(),
            compress_streams: cfg!(feature = "compression"),
            buffer_pages: false,
            outlines: true,
            auto_first_page: false,
            default_page: PageOptions::default(),
        }
    }
}

impl DocumentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pdf_version(mut self, version: impl Into<String>) -> Self {
        self.pdf_version = version.into();
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress_streams = compress;
        self
    }

    pub fn with_buffer_pages(mut self, buffer: bool) -> Self {
        self.buffer_pages = buffer;
        self
    }

    pub fn with_outlines(mut self, outlines: bool) -> Self {
        self.outlines = outlines;
        self
    }

    pub fn with_auto_first_page(mut self, auto: bool) -> Self {
        self.auto_first_page = auto;
        self
    }

    pub fn with_default_page(mut self, options: PageOptions) -> Self {
        self.default_page = options;
        self
    }

    /// Rejects header versions this writer does not produce.
    pub fn validate(&self) -> Result<()> {
        if !pdf_version::SUPPORTED_VERSIONS.contains(&self.pdf_version.as_str()) {
            return Err(PdfError::UnsupportedVersion(self.pdf_version.clone()));
        }
        Ok(())
    }
}
