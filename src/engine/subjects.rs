//! Subject table alignment.
//!
//! Gazette layouts print per-subject scores in one of two shapes. In the
//! header-prefixed shape every score row carries its own subject code and
//! name; rows are consumed in document order. In the catalogue-positional
//! shape the subject list is printed once, outside the records, and each
//! record carries only a flat run of score groups that map onto the
//! catalogue by position. The shapes form a closed set selected by a
//! detection step, not by per-document special cases.

use std::collections::HashSet;

use regex::Regex;

use crate::model::{CatalogueEntry, SubjectMark};

use super::anchors::RecordSpan;
use super::config::EngineConfig;
use super::lines::Line;

/// The two supported score-table shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// Code and name printed beside every score tuple.
    HeaderPrefixed,
    /// Scores map positionally onto a document-level catalogue.
    CataloguePositional,
}

/// One flat score group found inside a record span.
#[derive(Debug, Clone, PartialEq)]
struct ScoreGroup {
    internal: Option<u32>,
    external: Option<u32>,
    total: Option<u32>,
    grade: String,
    credit: u32,
}

/// Discovers the subject catalogue and aligns score rows to it.
pub struct SubjectAligner {
    catalogue_line: Regex,
    paren_tail: Regex,
    grade_token: Regex,
    score_group: Regex,
    code_digits: (usize, usize),
    seat_length: usize,
}

impl SubjectAligner {
    /// Build an aligner from the engine configuration.
    pub fn new(config: &EngineConfig) -> Self {
        let (min, max) = config.subject_code_digits;
        Self {
            catalogue_line: Regex::new(&format!(r"^(\d{{{min},{max}}})\s+(.+)$")).unwrap(),
            paren_tail: Regex::new(r"\s*\(\s*\d+\s*\)\s*$").unwrap(),
            grade_token: Regex::new(r"^(?:O|A\+|B\+|C\+|D\+|AB|[A-F]|P)$").unwrap(),
            score_group: Regex::new(
                r"\b((?:\d{1,3}|AB|NA|--)(?:\s+(?:\d{1,3}|AB|NA|--)){0,2})\s+(O|A\+|B\+|C\+|D\+|AB|[A-F]|P)\s+(\d{1,2})\b",
            )
            .unwrap(),
            code_digits: config.subject_code_digits,
            seat_length: config.seat_length,
        }
    }

    /// Discover the subject catalogue from lines outside all record spans.
    ///
    /// The first discovery of a code wins, so a catalogue printed on an
    /// early page governs later pages that do not repeat it.
    pub fn discover_catalogue(&self, outside: &[Line]) -> Vec<CatalogueEntry> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        for line in outside {
            if let Some(entry) = self.parse_catalogue_line(&line.text) {
                if seen.insert(entry.code.clone()) {
                    entries.push(entry);
                }
            }
        }
        entries
    }

    /// Choose the alignment strategy for this document.
    pub fn detect_layout(
        &self,
        spans: &[RecordSpan],
        catalogue: &[CatalogueEntry],
    ) -> TableLayout {
        let has_prefixed_rows = spans
            .iter()
            .any(|span| span.texts().any(|text| self.parse_subject_row(text).is_some()));

        if has_prefixed_rows {
            TableLayout::HeaderPrefixed
        } else if !catalogue.is_empty() {
            TableLayout::CataloguePositional
        } else {
            TableLayout::HeaderPrefixed
        }
    }

    /// Produce the ordered subject marks for one record span.
    pub fn align(
        &self,
        layout: TableLayout,
        span: &RecordSpan,
        catalogue: &[CatalogueEntry],
    ) -> Vec<SubjectMark> {
        match layout {
            TableLayout::HeaderPrefixed => span
                .texts()
                .filter_map(|text| self.parse_subject_row(text))
                .collect(),
            TableLayout::CataloguePositional => {
                let groups = self.collect_score_groups(span);
                if groups.len() > catalogue.len() {
                    log::debug!(
                        "seat {}: {} score groups for {} catalogue entries, extras dropped",
                        span.seat_number,
                        groups.len(),
                        catalogue.len()
                    );
                }
                catalogue
                    .iter()
                    .enumerate()
                    .map(|(k, entry)| match groups.get(k) {
                        Some(group) => SubjectMark {
                            code: entry.code.clone(),
                            name: entry.name.clone(),
                            internal: group.internal,
                            external: group.external,
                            total: group.total,
                            grade: Some(group.grade.clone()),
                            credit: Some(group.credit),
                        },
                        // Fewer groups than entries: trailing subjects keep
                        // absent scores rather than truncating the catalogue.
                        None => SubjectMark::unscored(entry),
                    })
                    .collect()
            }
        }
    }

    fn parse_catalogue_line(&self, text: &str) -> Option<CatalogueEntry> {
        let caps = self.catalogue_line.captures(text.trim())?;
        let code = &caps[1];
        if code.len() == self.seat_length {
            return None;
        }
        // A full score row is a table row, not a catalogue header.
        if self.parse_subject_row(text).is_some() {
            return None;
        }
        let name = self.paren_tail.replace(caps[2].trim(), "");
        if !name.chars().any(|c| c.is_alphabetic()) {
            return None;
        }
        Some(CatalogueEntry::new(code, name.trim()))
    }

    /// Parse one header-prefixed score row: code, name, then a tuple of up
    /// to (internal, external, total, grade, credit). Shorter tuples fill
    /// right to left: total first, then external, then internal.
    fn parse_subject_row(&self, text: &str) -> Option<SubjectMark> {
        let toks: Vec<&str> = text.split_whitespace().collect();
        if toks.len() < 5 {
            return None;
        }

        let code = toks[0];
        if !self.is_subject_code(code) {
            return None;
        }

        let credit_tok = toks[toks.len() - 1];
        if credit_tok.len() > 2 {
            return None;
        }
        let credit: u32 = credit_tok.parse().ok()?;

        let grade = toks[toks.len() - 2];
        if !self.grade_token.is_match(grade) {
            return None;
        }

        // Walk backwards over up to three score tokens before the grade.
        let mut scores = Vec::new();
        let mut name_end = toks.len() - 2;
        while scores.len() < 3 && name_end > 1 && is_score_token(toks[name_end - 1]) {
            scores.push(toks[name_end - 1]);
            name_end -= 1;
        }
        if scores.is_empty() || name_end < 2 {
            return None;
        }

        let name = toks[1..name_end].join(" ");
        if !name.chars().any(|c| c.is_alphabetic()) {
            return None;
        }

        // scores[0] is the token nearest the grade.
        let total = parse_score(scores[0]);
        let external = scores.get(1).and_then(|t| parse_score(t));
        let internal = scores.get(2).and_then(|t| parse_score(t));

        Some(SubjectMark {
            code: code.to_string(),
            name,
            internal,
            external,
            total,
            grade: Some(grade.to_string()),
            credit: Some(credit),
        })
    }

    fn collect_score_groups(&self, span: &RecordSpan) -> Vec<ScoreGroup> {
        let mut groups = Vec::new();
        for text in span.texts() {
            for caps in self.score_group.captures_iter(text) {
                let scores: Vec<&str> = caps[1].split_whitespace().collect();
                let total = scores.last().and_then(|t| parse_score(t));
                let external = scores
                    .len()
                    .checked_sub(2)
                    .and_then(|i| parse_score(scores[i]));
                let internal = scores
                    .len()
                    .checked_sub(3)
                    .and_then(|i| parse_score(scores[i]));
                groups.push(ScoreGroup {
                    internal,
                    external,
                    total,
                    grade: caps[2].to_string(),
                    credit: caps[3].parse().unwrap_or(0),
                });
            }
        }
        groups
    }

    fn is_subject_code(&self, tok: &str) -> bool {
        let (min, max) = self.code_digits;
        tok.len() >= min
            && tok.len() <= max
            && tok.len() != self.seat_length
            && tok.chars().all(|c| c.is_ascii_digit())
    }
}

/// Score tokens are small numbers or absence markers.
fn is_score_token(tok: &str) -> bool {
    matches!(tok, "AB" | "NA" | "--") || (tok.len() <= 3 && tok.chars().all(|c| c.is_ascii_digit()))
}

/// Absence markers map to `None`, never to zero.
fn parse_score(tok: &str) -> Option<u32> {
    tok.parse().ok()
}
