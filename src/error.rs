//! Error types for the gradex library.
//!
//! Only the document-access boundary can fail: a corrupt, encrypted or
//! non-PDF upload surfaces as one of the variants below. The extraction
//! engine itself is infallible — malformed content degrades to partial or
//! empty output, never to an error.

use std::io;
use thiserror::Error;

/// Result type alias for gradex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while acquiring tokens from a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the input file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing the PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting positioned text from a page.
    #[error("Token extraction error: {0}")]
    TokenExtract(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error serializing the extraction report.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
