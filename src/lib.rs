//! # gradex
//!
//! Layout-aware extraction of student result records from result-gazette
//! PDFs.
//!
//! Gazette documents carry no machine-readable schema — only positioned
//! text rendered from a print layout that shifts release to release.
//! gradex reconstructs visual lines from positioned tokens, detects record
//! boundaries amid look-alike rows, fills fields through an ordered
//! fallback-capable rule set, aligns score tables to the subject
//! catalogue, and deduplicates the assembled records.
//!
//! ## Quick Start
//!
//! ```no_run
//! use gradex::{extract_file, ExtractionReport, JsonFormat};
//!
//! fn main() -> gradex::Result<()> {
//!     let records = extract_file("gazette.pdf")?;
//!     let report = ExtractionReport::new(records);
//!     println!("{}", report.to_json(JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! The engine itself is pure: given a token stream (from the bundled PDF
//! boundary or from any other source), [`extract_records`] never fails —
//! an empty or unparseable document yields an empty list.

pub mod engine;
pub mod error;
pub mod model;
pub mod pdf;
pub mod report;

pub use engine::{Engine, EngineConfig, TableLayout};
pub use error::{Error, Result};
pub use model::{
    CatalogueEntry, EnrolmentStatus, Gender, Outcome, StudentRecord, SubjectMark, Token,
};
pub use pdf::TokenExtractor;
pub use report::{ExtractionReport, JsonFormat};

use std::path::Path;

/// Extract student records from a PDF file.
///
/// # Example
///
/// ```no_run
/// let records = gradex::extract_file("gazette.pdf").unwrap();
/// println!("found {} students", records.len());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Vec<StudentRecord>> {
    extract_file_with_config(path, EngineConfig::default())
}

/// Extract student records from a PDF file with a custom configuration.
pub fn extract_file_with_config<P: AsRef<Path>>(
    path: P,
    config: EngineConfig,
) -> Result<Vec<StudentRecord>> {
    let tokens = TokenExtractor::open(path)?.extract()?;
    Ok(Engine::with_config(config).extract(&tokens))
}

/// Extract student records from PDF bytes.
pub fn extract_bytes(data: &[u8]) -> Result<Vec<StudentRecord>> {
    extract_bytes_with_config(data, EngineConfig::default())
}

/// Extract student records from PDF bytes with a custom configuration.
pub fn extract_bytes_with_config(
    data: &[u8],
    config: EngineConfig,
) -> Result<Vec<StudentRecord>> {
    let tokens = TokenExtractor::from_bytes(data)?.extract()?;
    Ok(Engine::with_config(config).extract(&tokens))
}

/// Run the extraction engine over a pre-extracted token stream.
///
/// This is the pure core: no I/O, no failure modes. Use it when tokens
/// come from a source other than the bundled PDF boundary.
pub fn extract_records(tokens: &[Token], config: &EngineConfig) -> Vec<StudentRecord> {
    Engine::with_config(config.clone()).extract(tokens)
}

/// Builder for configuring and running an extraction.
///
/// # Example
///
/// ```no_run
/// use gradex::Gradex;
///
/// let report = Gradex::new()
///     .with_seat_length(9)
///     .sequential()
///     .extract_file("gazette.pdf")?;
/// println!("{} students", report.students_found);
/// # Ok::<(), gradex::Error>(())
/// ```
pub struct Gradex {
    config: EngineConfig,
    parallel: bool,
}

impl Gradex {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            parallel: true,
        }
    }

    /// Replace the whole engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the seat-number digit count.
    pub fn with_seat_length(mut self, length: usize) -> Self {
        self.config = self.config.with_seat_length(length);
        self
    }

    /// Set the line clustering tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.config = self.config.with_line_tolerance(tolerance);
        self
    }

    /// Disable parallel page extraction.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Extract from a PDF file and wrap the records in a report.
    pub fn extract_file<P: AsRef<Path>>(self, path: P) -> Result<ExtractionReport> {
        let data = std::fs::read(path)?;
        self.extract_bytes(&data)
    }

    /// Extract from PDF bytes and wrap the records in a report.
    pub fn extract_bytes(self, data: &[u8]) -> Result<ExtractionReport> {
        let mut extractor = TokenExtractor::from_bytes(data)?;
        if !self.parallel {
            extractor = extractor.sequential();
        }
        let tokens = extractor.extract()?;
        let records = Engine::with_config(self.config).extract(&tokens);
        Ok(ExtractionReport::new(records))
    }
}

impl Default for Gradex {
    fn default() -> Self {
        Self::new()
    }
}
