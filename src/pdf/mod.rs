//! PDF access: the text-extraction boundary.
//!
//! Everything that can fail lives here. The engine itself consumes plain
//! [`Token`](crate::model::Token) slices; this module produces them from
//! PDF bytes via lopdf, walking page content streams with position
//! tracking.

mod words;

pub use words::TokenExtractor;

use crate::error::{Error, Result};

/// PDF magic bytes.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Whether a byte buffer looks like a PDF document.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.len() > PDF_MAGIC.len() && data.starts_with(PDF_MAGIC)
}

/// Reject non-PDF uploads before handing bytes to the parser.
pub fn check_pdf_bytes(data: &[u8]) -> Result<()> {
    if is_pdf_bytes(data) {
        Ok(())
    } else {
        Err(Error::UnknownFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\ntest"));
        assert!(!is_pdf_bytes(b"Not a PDF file"));
        assert!(!is_pdf_bytes(b""));
        assert!(!is_pdf_bytes(b"%PDF-"));
    }

    #[test]
    fn test_check_pdf_bytes_error() {
        let result = check_pdf_bytes(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }
}
