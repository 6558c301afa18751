//! The record-extraction engine.
//!
//! A pure pipeline from positioned tokens to student records: line
//! reconstruction, anchor detection, field extraction, subject alignment,
//! assembly and deduplication. Each stage consumes the previous stage's
//! output and nothing mutates backwards. The engine never fails — a
//! malformed or empty document yields an empty record list.

mod anchors;
mod assemble;
mod config;
mod fields;
mod lines;
mod subjects;

pub use anchors::{AnchorDetector, RecordSpan, SpanScan};
pub use assemble::Assembler;
pub use config::EngineConfig;
pub use fields::{FieldExtractor, FillPolicy};
pub use lines::{reconstruct, Line};
pub use subjects::{SubjectAligner, TableLayout};

use crate::model::{StudentRecord, Token};

/// The layout-aware extraction engine.
///
/// Construction compiles the rule tables once; [`Engine::extract`] may then
/// be called for any number of documents. One invocation is single-threaded
/// and side-effect-free, so independent documents can run on independent
/// threads without synchronization.
pub struct Engine {
    config: EngineConfig,
    detector: AnchorDetector,
    fields: FieldExtractor,
    aligner: SubjectAligner,
    assembler: Assembler,
}

impl Engine {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with a custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            detector: AnchorDetector::new(&config),
            fields: FieldExtractor::new(&config),
            aligner: SubjectAligner::new(&config),
            assembler: Assembler::new(&config),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Extract all student records from a page-ordered token stream.
    ///
    /// Pages must arrive in document order: a subject catalogue discovered
    /// on an early page governs alignment on later pages that do not
    /// repeat it. Zero tokens is a valid input and yields zero records.
    pub fn extract(&self, tokens: &[Token]) -> Vec<StudentRecord> {
        let lines = lines::reconstruct(tokens, self.config.line_tolerance);
        let scan = self.detector.scan(&lines);
        let catalogue = self.aligner.discover_catalogue(&scan.outside);
        let layout = self.aligner.detect_layout(&scan.spans, &catalogue);

        log::debug!(
            "{} lines, {} spans, {} catalogue entries, layout {:?}",
            lines.len(),
            scan.spans.len(),
            catalogue.len(),
            layout
        );

        let mut records = Vec::new();
        for span in &scan.spans {
            let mut record = StudentRecord::new(&span.seat_number);
            self.fields.fill(span, &mut record);
            record.subjects = self.aligner.align(layout, span, &catalogue);
            if let Some(record) = self.assembler.finish(record) {
                records.push(record);
            }
        }

        self.assembler.dedupe(records)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
