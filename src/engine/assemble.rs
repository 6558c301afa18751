//! Record assembly, validation and deduplication.
//!
//! A closed span becomes a record only if it still has a seat number and a
//! non-empty name after noise stripping; anything else was a false-positive
//! anchor and is dropped silently. Seat numbers are unique in the output:
//! the first-seen record wins unless a later one is strictly more complete.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use crate::model::StudentRecord;

use super::config::EngineConfig;

/// Finalizes records on span closure and deduplicates across the document.
pub struct Assembler {
    name_noise: Vec<String>,
}

impl Assembler {
    /// Build an assembler from the engine configuration.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            name_noise: config.name_noise.iter().map(|w| w.to_uppercase()).collect(),
        }
    }

    /// NFKC-normalize a raw name, strip noise keywords and collapse
    /// whitespace.
    pub fn normalize_name(&self, raw: &str) -> String {
        let normalized: String = raw.nfkc().collect();
        normalized
            .split_whitespace()
            .filter(|word| !self.name_noise.contains(&word.to_uppercase()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Finalize one record. Returns `None` when the span was not a valid
    /// record (missing seat number or empty post-strip name).
    pub fn finish(&self, mut record: StudentRecord) -> Option<StudentRecord> {
        record.name = self.normalize_name(&record.name);

        if record.seat_number.is_empty() || record.name.is_empty() {
            log::debug!(
                "dropping span with seat {:?}: no extractable name",
                record.seat_number
            );
            return None;
        }

        Some(record)
    }

    /// Deduplicate by seat number, preserving first-seen output order.
    ///
    /// A later duplicate replaces the kept record only when it is strictly
    /// more complete, so the policy is a total order for identical input.
    pub fn dedupe(&self, records: Vec<StudentRecord>) -> Vec<StudentRecord> {
        let mut by_seat: HashMap<String, usize> = HashMap::new();
        let mut out: Vec<StudentRecord> = Vec::new();

        for record in records {
            match by_seat.get(&record.seat_number) {
                Some(&slot) => {
                    if record.completeness() > out[slot].completeness() {
                        log::debug!(
                            "seat {}: replacing duplicate with a more complete record",
                            record.seat_number
                        );
                        out[slot] = record;
                    }
                }
                None => {
                    by_seat.insert(record.seat_number.clone(), out.len());
                    out.push(record);
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Outcome;

    fn assembler() -> Assembler {
        Assembler::new(&EngineConfig::default())
    }

    #[test]
    fn test_noise_words_stripped_from_name() {
        let name = assembler().normalize_name("MOHIT BHARAT MALI MALE REGULAR");
        assert_eq!(name, "MOHIT BHARAT MALI");
    }

    #[test]
    fn test_nfkc_normalization() {
        // Fullwidth letters fold to ASCII under NFKC.
        let name = assembler().normalize_name("ＭＯＨＩＴ MALI");
        assert_eq!(name, "MOHIT MALI");
    }

    #[test]
    fn test_nameless_record_dropped() {
        let mut record = StudentRecord::new("262112705");
        record.name = "FEMALE REGULAR".to_string();
        assert!(assembler().finish(record).is_none());
    }

    #[test]
    fn test_valid_record_kept() {
        let mut record = StudentRecord::new("262112705");
        record.name = "MOHIT BHARAT MALI".to_string();
        let finished = assembler().finish(record).unwrap();
        assert_eq!(finished.name, "MOHIT BHARAT MALI");
    }

    #[test]
    fn test_dedupe_first_seen_wins_on_tie() {
        let mut first = StudentRecord::new("262112705");
        first.name = "MOHIT BHARAT MALI".to_string();
        let mut second = StudentRecord::new("262112705");
        second.name = "DIFFERENT NAME".to_string();

        let out = assembler().dedupe(vec![first.clone(), second]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "MOHIT BHARAT MALI");
    }

    #[test]
    fn test_dedupe_more_complete_record_wins() {
        let mut sparse = StudentRecord::new("262112705");
        sparse.name = "MOHIT BHARAT MALI".to_string();
        let mut complete = sparse.clone();
        complete.outcome = Some(Outcome::Pass);
        complete.total_marks = Some(382);

        let out = assembler().dedupe(vec![sparse, complete.clone()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0], complete);
    }

    #[test]
    fn test_dedupe_preserves_first_seen_order() {
        let mut a = StudentRecord::new("262112705");
        a.name = "A".to_string();
        let mut b = StudentRecord::new("262112706");
        b.name = "B".to_string();
        let mut a_dup = StudentRecord::new("262112705");
        a_dup.name = "A".to_string();

        let out = assembler().dedupe(vec![a, b, a_dup]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].seat_number, "262112705");
        assert_eq!(out[1].seat_number, "262112706");
    }
}
