use crate::structure::PageRange;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("switch_to_page({index}) out of bounds, {buffered}")]
    PageOutOfRange { index: usize, buffered: PageRange },

    #[error("No current page: add a page before writing content")]
    NoCurrentPage,

    #[error("Invalid page number: {0}")]
    InvalidPageNumber(usize),

    #[error("Invalid object reference: {0} 0 R was never created")]
    UnknownReference(u32),

    #[error("Invalid object reference: {0} 0 R was already written")]
    ReferenceAlreadyResolved(u32),

    #[error("Document has ended: no further pages, outlines or content are accepted")]
    DocumentEnded,

    #[error("Document has been finalized: the trailer is already written")]
    AlreadyFinalized,

    #[error("Output stream is closed")]
    StreamClosed,

    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    #[error("Invalid PDF structure: {0}")]
    InvalidStructure(String),

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("Deprecated entry point: {0}")]
    Deprecated(&'static str),
}

impl PdfError {
    /// Whether the error signals a broken create/write protocol rather than a
    /// condition the caller can correct and retry.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            PdfError::UnknownReference(_)
                | PdfError::ReferenceAlreadyResolved(_)
                | PdfError::AlreadyFinalized
                | PdfError::StreamClosed
        )
    }
}

pub type Result<T> = std::result::Result<T, PdfError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_page_out_of_range_reports_window() {
        let error = PdfError::PageOutOfRange {
            index: 7,
            buffered: PageRange { start: 2, count: 3 },
        };
        assert_eq!(
            error.to_string(),
            "switch_to_page(7) out of bounds, current buffer covers pages 2 to 4"
        );
    }

    #[test]
    fn test_page_out_of_range_with_empty_buffer() {
        let error = PdfError::PageOutOfRange {
            index: 0,
            buffered: PageRange { start: 5, count: 0 },
        };
        assert_eq!(
            error.to_string(),
            "switch_to_page(0) out of bounds, no pages are buffered (next page index is 5)"
        );
    }

    #[test]
    fn test_pdf_error_from_io_error() {
        let io_error = IoError::new(ErrorKind::BrokenPipe, "consumer went away");
        let pdf_error = PdfError::from(io_error);

        match pdf_error {
            PdfError::Io(ref err) => assert_eq!(err.kind(), ErrorKind::BrokenPipe),
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_protocol_violations() {
        assert!(PdfError::UnknownReference(9).is_protocol_violation());
        assert!(PdfError::ReferenceAlreadyResolved(1).is_protocol_violation());
        assert!(PdfError::AlreadyFinalized.is_protocol_violation());
        assert!(!PdfError::NoCurrentPage.is_protocol_violation());
        assert!(!PdfError::PageOutOfRange {
            index: 0,
            buffered: PageRange { start: 0, count: 0 },
        }
        .is_protocol_violation());
    }

    #[test]
    fn test_error_chain_display() {
        let errors = [
            (
                "Invalid object reference: 12 0 R was never created",
                PdfError::UnknownReference(12),
            ),
            (
                "Invalid object reference: 3 0 R was already written",
                PdfError::ReferenceAlreadyResolved(3),
            ),
            ("Unsupported PDF version: 9.9", PdfError::UnsupportedVersion("9.9".to_string())),
            (
                "Deprecated entry point: use Document::new with a sink",
                PdfError::Deprecated("use Document::new with a sink"),
            ),
        ];

        for (expected, error) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PdfError>();
    }
}
