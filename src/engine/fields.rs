//! Scalar field extraction.
//!
//! Fields are filled by an ordered table of rules, each carrying a primary
//! pattern, optional fallback patterns for noisy spellings, and a fill
//! policy. The table replaces cascading per-field branches: adding a field
//! variant means adding a rule, not touching control flow.

use regex::Regex;

use crate::model::{EnrolmentStatus, Gender, Outcome, StudentRecord};

use super::anchors::RecordSpan;
use super::config::EngineConfig;

/// How a rule fills its field across the lines of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPolicy {
    /// The first matching line wins; later matches are ignored. Re-applying
    /// the extractor never changes a field filled this way.
    FirstMatch,
    /// Every line is tried; the latest candidate that passes the validator
    /// wins. An invalid candidate never overrides a valid one.
    BestMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Gender,
    Status,
    Institution,
    Outcome,
    TotalMarks,
    GradePoints,
}

struct FieldRule {
    target: Target,
    /// Primary pattern first, fallbacks after. Each pattern captures the
    /// field value in group 1.
    patterns: Vec<Regex>,
    policy: FillPolicy,
}

impl FieldRule {
    fn new(target: Target, policy: FillPolicy, patterns: &[&str]) -> Self {
        Self {
            target,
            policy,
            patterns: patterns.iter().map(|p| Regex::new(p).unwrap()).collect(),
        }
    }

    /// First capture on one line: patterns are tried in priority order and
    /// the first that matches supplies the line's candidate.
    fn capture(&self, text: &str) -> Option<String> {
        for pattern in &self.patterns {
            if let Some(caps) = pattern.captures(text) {
                return Some(caps[1].to_string());
            }
        }
        None
    }
}

/// Fills scalar record fields from a record span.
pub struct FieldExtractor {
    rules: Vec<FieldRule>,
    grade_point_range: (f32, f32),
    name_token_cutoff: usize,
    name_noise: Vec<String>,
}

impl FieldExtractor {
    /// Build the standard rule table for the configuration.
    pub fn new(config: &EngineConfig) -> Self {
        let rules = vec![
            FieldRule::new(
                Target::Gender,
                FillPolicy::FirstMatch,
                &[r"\b(FEMALE|MALE)\b", r"(?i)\b(female|male)\b"],
            ),
            FieldRule::new(
                Target::Status,
                FillPolicy::FirstMatch,
                &[
                    r"\b(Regular|Repeater|External)\b",
                    r"(?i)\b(regular|repeater|rptr|external|ex[-\s]?student)\b",
                ],
            ),
            FieldRule::new(
                Target::Institution,
                FillPolicy::FirstMatch,
                &[
                    r"\b([A-Z]{2,4}\d{6,})\b",
                    r"(?i)\bcollege\s*[:#]?\s*([A-Z0-9]{4,})\b",
                ],
            ),
            FieldRule::new(
                Target::Outcome,
                FillPolicy::FirstMatch,
                &[
                    r"\b(PASS(?:ES|ED)?|FAIL(?:S|ED)?)\b",
                    r"(?i)\b(pass(?:es|ed)?|fail(?:s|ed)?)\b",
                    r"\b(ATKT|ABSENT|WITHHELD|RLE)\b",
                ],
            ),
            FieldRule::new(
                Target::TotalMarks,
                FillPolicy::BestMatch,
                &[
                    r"\bGRAND\s+TOTAL\b\D*?(\d{2,4})\b",
                    r"\bTOTAL\b\D*?(\d{2,4})\b",
                ],
            ),
            FieldRule::new(
                Target::GradePoints,
                FillPolicy::BestMatch,
                &[
                    r"(?i)\b(?:SGPA|CGPA|GPA|GRADE\s*POINTS?)\s*[:=]?\s*(\d{1,2}\.\d{1,2})\b",
                    r"\b(\d{1,2}\.\d{1,2})\b",
                ],
            ),
        ];

        Self {
            rules,
            grade_point_range: config.grade_point_range,
            name_token_cutoff: config.name_token_cutoff,
            name_noise: config.name_noise.iter().map(|w| w.to_uppercase()).collect(),
        }
    }

    /// Fill the name and every scalar field of `record` from `span`.
    pub fn fill(&self, span: &RecordSpan, record: &mut StudentRecord) {
        self.fill_name(span, record);
        for rule in &self.rules {
            self.apply_rule(rule, span, record);
        }
    }

    fn apply_rule(&self, rule: &FieldRule, span: &RecordSpan, record: &mut StudentRecord) {
        match rule.policy {
            FillPolicy::FirstMatch => {
                if is_filled(rule.target, record) {
                    return;
                }
                for text in span.texts() {
                    if let Some(value) = rule.capture(text) {
                        if commit(rule.target, &value, record) {
                            return;
                        }
                    }
                }
            }
            FillPolicy::BestMatch => {
                let mut candidate = None;
                for text in span.texts() {
                    if let Some(value) = rule.capture(text) {
                        if self.validate(rule.target, &value) {
                            candidate = Some(value);
                        } else {
                            log::debug!(
                                "seat {}: rejected {:?} candidate {:?}",
                                record.seat_number,
                                rule.target,
                                value
                            );
                        }
                    }
                }
                if let Some(value) = candidate {
                    commit(rule.target, &value, record);
                }
            }
        }
    }

    fn validate(&self, target: Target, value: &str) -> bool {
        match target {
            Target::TotalMarks => value.parse::<u32>().is_ok(),
            Target::GradePoints => {
                let (min, max) = self.grade_point_range;
                value
                    .parse::<f32>()
                    .map(|v| v >= min && v <= max)
                    .unwrap_or(false)
            }
            _ => true,
        }
    }

    /// Reconstruct the candidate name.
    ///
    /// The name is the leading run of uppercase word tokens on the anchor
    /// line. When that run is shorter than two tokens the name has wrapped:
    /// following lines made solely of uppercase word tokens, digit-free and
    /// carrying no noise keywords, are absorbed. The token-count cutoff
    /// bounds the absorption so unrelated uppercase noise is never consumed
    /// indefinitely.
    fn fill_name(&self, span: &RecordSpan, record: &mut StudentRecord) {
        if !record.name.is_empty() {
            return;
        }

        let mut tokens: Vec<&str> = Vec::new();
        for word in span.anchor_rest.split_whitespace() {
            if tokens.len() >= self.name_token_cutoff || !is_name_token(word) {
                break;
            }
            tokens.push(word);
        }

        if tokens.len() < 2 {
            for line in &span.lines {
                if tokens.len() >= self.name_token_cutoff || !self.is_name_continuation(&line.text)
                {
                    break;
                }
                for word in line.text.split_whitespace() {
                    if tokens.len() >= self.name_token_cutoff {
                        break;
                    }
                    tokens.push(word);
                }
            }
        }

        record.name = tokens.join(" ");
    }

    fn is_name_continuation(&self, text: &str) -> bool {
        let mut words = text.split_whitespace().peekable();
        if words.peek().is_none() {
            return false;
        }
        words.all(|w| is_name_token(w) && !self.name_noise.contains(&w.to_uppercase()))
    }
}

/// A name token is an uppercase word with no digits.
fn is_name_token(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_uppercase())
        && word
            .chars()
            .all(|c| c.is_ascii_uppercase() || matches!(c, '.' | '-' | '\''))
}

fn is_filled(target: Target, record: &StudentRecord) -> bool {
    match target {
        Target::Gender => record.gender.is_some(),
        Target::Status => record.status.is_some(),
        Target::Institution => record.institution.is_some(),
        Target::Outcome => record.outcome.is_some(),
        Target::TotalMarks => record.total_marks.is_some(),
        Target::GradePoints => record.grade_points.is_some(),
    }
}

/// Parse and store a captured value. Returns false when the keyword does
/// not map to a field value, so first-match scanning continues.
fn commit(target: Target, value: &str, record: &mut StudentRecord) -> bool {
    match target {
        Target::Gender => match Gender::from_keyword(value) {
            Some(gender) => {
                record.gender = Some(gender);
                true
            }
            None => false,
        },
        Target::Status => match EnrolmentStatus::from_keyword(value) {
            Some(status) => {
                record.status = Some(status);
                true
            }
            None => false,
        },
        Target::Institution => {
            record.institution = Some(value.to_string());
            true
        }
        Target::Outcome => {
            record.outcome = Some(Outcome::from_keyword(value));
            true
        }
        Target::TotalMarks => match value.parse() {
            Ok(total) => {
                record.total_marks = Some(total);
                true
            }
            Err(_) => false,
        },
        Target::GradePoints => match value.parse() {
            Ok(points) => {
                record.grade_points = Some(points);
                true
            }
            Err(_) => false,
        },
    }
}
