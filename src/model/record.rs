//! Student record types.

use serde::{Deserialize, Serialize};

/// Gender as printed on the gazette, where present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Map a matched keyword to a gender value.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_uppercase().as_str() {
            "MALE" | "M" => Some(Gender::Male),
            "FEMALE" | "F" => Some(Gender::Female),
            "TRANSGENDER" | "T" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// Enrolment status of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrolmentStatus {
    Regular,
    Repeater,
    External,
}

impl EnrolmentStatus {
    /// Map a matched keyword to a status value.
    pub fn from_keyword(word: &str) -> Option<Self> {
        let word = word.to_uppercase();
        match word.as_str() {
            "REGULAR" => Some(EnrolmentStatus::Regular),
            "REPEATER" | "RPTR" => Some(EnrolmentStatus::Repeater),
            "EXTERNAL" => Some(EnrolmentStatus::External),
            _ if word.starts_with("EX") => Some(EnrolmentStatus::External),
            _ => None,
        }
    }
}

/// Overall result outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    /// Any printed verdict that is neither a pass nor a fail (ATKT, absent,
    /// result withheld and similar).
    Other,
}

impl Outcome {
    /// Map a matched keyword to an outcome value.
    pub fn from_keyword(word: &str) -> Self {
        let word = word.to_uppercase();
        if word.starts_with("PASS") {
            Outcome::Pass
        } else if word.starts_with("FAIL") {
            Outcome::Fail
        } else {
            Outcome::Other
        }
    }
}

/// One entry of the subject catalogue: code plus printed name.
///
/// Catalogue ordering is significant; it is the alignment key for score
/// rows in catalogue-positional documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    /// Subject code as printed (numeric string).
    pub code: String,
    /// Subject name as printed.
    pub name: String,
}

impl CatalogueEntry {
    /// Create a new catalogue entry.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Scores for one subject of one student.
///
/// Missing scores are represented as `None`, never coerced to zero. An
/// entirely unscored mark still carries the subject code and name so that
/// the subject list always mirrors the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectMark {
    /// Subject code, copied from the catalogue or the score row.
    pub code: String,
    /// Subject name, copied from the catalogue or the score row.
    pub name: String,
    /// Internal-assessment score.
    pub internal: Option<u32>,
    /// External-examination score.
    pub external: Option<u32>,
    /// Total score for the subject.
    pub total: Option<u32>,
    /// Letter grade as printed (`B+`, `O`, `AB`, ...).
    pub grade: Option<String>,
    /// Credit weight of the subject.
    pub credit: Option<u32>,
}

impl SubjectMark {
    /// A mark with no scores, for catalogue entries whose score group is
    /// missing from the record span.
    pub fn unscored(entry: &CatalogueEntry) -> Self {
        Self {
            code: entry.code.clone(),
            name: entry.name.clone(),
            internal: None,
            external: None,
            total: None,
            grade: None,
            credit: None,
        }
    }

    /// Whether any score component is present.
    pub fn has_score(&self) -> bool {
        self.internal.is_some() || self.external.is_some() || self.total.is_some()
    }
}

/// One extracted student record.
///
/// The seat number is the primary key; it is unique across the output of
/// one extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Seat (roll) number, a fixed-length numeric string.
    pub seat_number: String,
    /// Candidate name, normalized and noise-stripped.
    pub name: String,
    /// Gender, where printed.
    pub gender: Option<Gender>,
    /// Enrolment status, where printed.
    pub status: Option<EnrolmentStatus>,
    /// Institution or college code, where printed.
    pub institution: Option<String>,
    /// Overall result outcome, where printed.
    pub outcome: Option<Outcome>,
    /// Aggregate total marks.
    pub total_marks: Option<u32>,
    /// Grade-point average, valid in [0, 10].
    pub grade_points: Option<f32>,
    /// Per-subject marks in catalogue order.
    pub subjects: Vec<SubjectMark>,
}

impl StudentRecord {
    /// Create an empty record for a seat number.
    pub fn new(seat_number: impl Into<String>) -> Self {
        Self {
            seat_number: seat_number.into(),
            name: String::new(),
            gender: None,
            status: None,
            institution: None,
            outcome: None,
            total_marks: None,
            grade_points: None,
            subjects: Vec::new(),
        }
    }

    /// Completeness measure used by deduplication: the number of filled
    /// scalar fields plus the number of subjects carrying at least one
    /// score.
    pub fn completeness(&self) -> usize {
        let scalars = [
            self.gender.is_some(),
            self.status.is_some(),
            self.institution.is_some(),
            self.outcome.is_some(),
            self.total_marks.is_some(),
            self.grade_points.is_some(),
        ]
        .iter()
        .filter(|&&filled| filled)
        .count();

        scalars + self.subjects.iter().filter(|m| m.has_score()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_keywords() {
        assert_eq!(Gender::from_keyword("MALE"), Some(Gender::Male));
        assert_eq!(Gender::from_keyword("female"), Some(Gender::Female));
        assert_eq!(Gender::from_keyword("MALI"), None);
    }

    #[test]
    fn test_status_keywords() {
        assert_eq!(
            EnrolmentStatus::from_keyword("Regular"),
            Some(EnrolmentStatus::Regular)
        );
        assert_eq!(
            EnrolmentStatus::from_keyword("RPTR"),
            Some(EnrolmentStatus::Repeater)
        );
        assert_eq!(
            EnrolmentStatus::from_keyword("Ex-Student"),
            Some(EnrolmentStatus::External)
        );
        assert_eq!(EnrolmentStatus::from_keyword("PASS"), None);
    }

    #[test]
    fn test_outcome_keywords() {
        assert_eq!(Outcome::from_keyword("PASS"), Outcome::Pass);
        assert_eq!(Outcome::from_keyword("Passes"), Outcome::Pass);
        assert_eq!(Outcome::from_keyword("FAILS"), Outcome::Fail);
        assert_eq!(Outcome::from_keyword("ATKT"), Outcome::Other);
    }

    #[test]
    fn test_completeness_counts_scored_subjects() {
        let entry = CatalogueEntry::new("1162111", "Financial Accounting - II");
        let mut record = StudentRecord::new("262112705");
        assert_eq!(record.completeness(), 0);

        record.outcome = Some(Outcome::Pass);
        record.total_marks = Some(382);
        record.subjects.push(SubjectMark::unscored(&entry));
        assert_eq!(record.completeness(), 2);

        record.subjects[0].total = Some(36);
        assert_eq!(record.completeness(), 3);
    }
}
