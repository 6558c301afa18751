//! JSON envelope for extraction results.
//!
//! The surrounding service returns `{status, students_found, students}`
//! for an upload; this type is that envelope. Zero records is a valid
//! outcome, not an error.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::StudentRecord;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonFormat {
    /// Indented, human-readable.
    Pretty,
    /// Single-line, minimal.
    Compact,
}

/// The serialized extraction result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Always `"ok"` once the engine has run.
    pub status: String,
    /// Number of extracted records.
    pub students_found: usize,
    /// The records themselves.
    pub students: Vec<StudentRecord>,
}

impl ExtractionReport {
    /// Wrap a record list in the response envelope.
    pub fn new(students: Vec<StudentRecord>) -> Self {
        Self {
            status: "ok".to_string(),
            students_found: students.len(),
            students,
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        let json = match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(self),
            JsonFormat::Compact => serde_json::to_string(self),
        };
        json.map_err(|e| Error::Serialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudentRecord;

    #[test]
    fn test_empty_report_is_ok() {
        let report = ExtractionReport::new(vec![]);
        assert_eq!(report.status, "ok");
        assert_eq!(report.students_found, 0);
    }

    #[test]
    fn test_report_counts_records() {
        let mut record = StudentRecord::new("262112705");
        record.name = "MOHIT BHARAT MALI".to_string();
        let report = ExtractionReport::new(vec![record]);
        assert_eq!(report.students_found, 1);
    }

    #[test]
    fn test_report_serializes() {
        let report = ExtractionReport::new(vec![]);
        let json = report.to_json(JsonFormat::Compact).unwrap();
        assert!(json.contains("\"students_found\":0"));

        let pretty = report.to_json(JsonFormat::Pretty).unwrap();
        assert!(pretty.contains("\"status\": \"ok\""));
    }
}
