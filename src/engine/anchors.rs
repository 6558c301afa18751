//! Anchor detection and record-span delimitation.
//!
//! A two-state machine walks the reconstructed lines. An anchor is a
//! seat-length numeric run at the left margin followed by an uppercase
//! word; it closes the open span (if any) and opens the next one. Lines
//! that match the numeric-prefix pattern but carry course-header
//! vocabulary or a parenthesized numeric header are look-alikes, not
//! anchors — the margin check, the stoplist and the header pattern are
//! evaluated together as a single decision per line.

use regex::Regex;

use super::config::EngineConfig;
use super::lines::Line;

/// The line range owned by one student record.
#[derive(Debug, Clone)]
pub struct RecordSpan {
    /// Seat number captured from the anchor line.
    pub seat_number: String,
    /// Anchor-line text after the seat number (name and same-line fields).
    pub anchor_rest: String,
    /// Body lines between this anchor and the next.
    pub lines: Vec<Line>,
}

impl RecordSpan {
    /// All span texts in order: the anchor remainder, then body lines.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.anchor_rest.as_str()).chain(self.lines.iter().map(|l| l.text.as_str()))
    }
}

/// Result of one scan: the delimited spans plus every line that fell
/// outside all spans (catalogue discovery feeds on the latter).
#[derive(Debug, Default)]
pub struct SpanScan {
    pub spans: Vec<RecordSpan>,
    pub outside: Vec<Line>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    Inside,
}

/// Scans lines for record anchors.
pub struct AnchorDetector {
    anchor: Regex,
    paren_header: Regex,
    stoplist: Vec<String>,
    left_margin: f32,
}

impl AnchorDetector {
    /// Build a detector from the engine configuration.
    pub fn new(config: &EngineConfig) -> Self {
        // Exactly seat_length digits, then a mandatory uppercase word.
        let anchor = Regex::new(&format!(
            r"^(\d{{{len}}})\s+([A-Z][A-Z.\-]*(?:\s.*)?)$",
            len = config.seat_length
        ))
        .unwrap();

        Self {
            anchor,
            paren_header: Regex::new(r"\(\s*\d+\s*\)").unwrap(),
            stoplist: config
                .anchor_stoplist
                .iter()
                .map(|w| w.to_uppercase())
                .collect(),
            left_margin: config.left_margin,
        }
    }

    /// Walk all lines, delimiting record spans.
    ///
    /// A span stays open until the next confirmed anchor; end of stream
    /// force-closes the last one, so a tail record is always captured.
    pub fn scan(&self, lines: &[Line]) -> SpanScan {
        let mut scan = SpanScan::default();
        let mut state = State::Outside;
        let mut current: Option<RecordSpan> = None;

        for line in lines {
            if let Some((seat, rest)) = self.match_anchor(line) {
                if let Some(span) = current.take() {
                    scan.spans.push(span);
                }
                log::debug!("anchor {} at page {} y {:.1}", seat, line.page, line.top);
                current = Some(RecordSpan {
                    seat_number: seat,
                    anchor_rest: rest,
                    lines: Vec::new(),
                });
                state = State::Inside;
                continue;
            }

            match state {
                State::Outside => scan.outside.push(line.clone()),
                State::Inside => current.as_mut().unwrap().lines.push(line.clone()),
            }
        }

        if let Some(span) = current.take() {
            scan.spans.push(span);
        }

        scan
    }

    /// Test one line against the anchor pattern, margin threshold and
    /// non-record vocabulary in a single decision.
    fn match_anchor(&self, line: &Line) -> Option<(String, String)> {
        if line.x0 > self.left_margin {
            return None;
        }

        let caps = self.anchor.captures(line.text.trim())?;

        if self.is_non_record(&line.text) {
            log::debug!("rejected look-alike anchor: {}", line.text);
            return None;
        }

        Some((caps[1].to_string(), caps[2].trim().to_string()))
    }

    fn is_non_record(&self, text: &str) -> bool {
        let upper = text.to_uppercase();
        self.stoplist.iter().any(|word| upper.contains(word)) || self.paren_header.is_match(text)
    }
}
