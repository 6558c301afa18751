//! End-to-end tests for the extraction engine over synthetic token streams.

use gradex::{
    extract_records, EngineConfig, EnrolmentStatus, ExtractionReport, Gender, JsonFormat, Outcome,
    Token,
};

/// Lay out a line of text as word tokens at the given position.
fn line_tokens(text: &str, x0: f32, top: f32, page: u32) -> Vec<Token> {
    let mut x = x0;
    text.split_whitespace()
        .map(|word| {
            let width = word.len() as f32 * 6.0;
            let token = Token::new(word, x, x + width, top, top + 10.0, page);
            x += width + 6.0;
            token
        })
        .collect()
}

fn gazette(lines: &[(&str, f32, f32, u32)]) -> Vec<Token> {
    lines
        .iter()
        .flat_map(|&(text, x0, top, page)| line_tokens(text, x0, top, page))
        .collect()
}

#[test]
fn test_reference_scenario() {
    let tokens = gazette(&[
        ("262112705 MOHIT BHARAT MALI Regular MALE MU0341120123", 20.0, 100.0, 0),
        ("1162111 Financial Accounting - II 36 B+ 4", 20.0, 115.0, 0),
        ("TOTAL 382 PASS 7.45", 20.0, 130.0, 0),
    ]);

    let records = extract_records(&tokens, &EngineConfig::default());
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.seat_number, "262112705");
    assert_eq!(record.name, "MOHIT BHARAT MALI");
    assert_eq!(record.status, Some(EnrolmentStatus::Regular));
    assert_eq!(record.gender, Some(Gender::Male));
    assert_eq!(record.institution.as_deref(), Some("MU0341120123"));
    assert_eq!(record.outcome, Some(Outcome::Pass));
    assert_eq!(record.total_marks, Some(382));
    assert_eq!(record.grade_points, Some(7.45));

    assert_eq!(record.subjects.len(), 1);
    let mark = &record.subjects[0];
    assert_eq!(mark.code, "1162111");
    assert_eq!(mark.name, "Financial Accounting - II");
    assert_eq!(mark.total, Some(36));
    assert_eq!(mark.grade.as_deref(), Some("B+"));
    assert_eq!(mark.credit, Some(4));
}

#[test]
fn test_empty_stream_is_success_with_zero_records() {
    let records = extract_records(&[], &EngineConfig::default());
    assert!(records.is_empty());

    let report = ExtractionReport::new(records);
    assert_eq!(report.status, "ok");
    assert_eq!(report.students_found, 0);
}

#[test]
fn test_zero_token_pages_are_skipped() {
    // Page 1 contributes nothing; pages 0 and 2 carry the data.
    let tokens = gazette(&[
        ("262112705 MOHIT BHARAT MALI", 20.0, 100.0, 0),
        ("TOTAL 382 PASS 7.45", 20.0, 115.0, 0),
        ("262112706 SNEHA RAMESH PATIL", 20.0, 100.0, 2),
        ("TOTAL 310 PASS 6.20", 20.0, 115.0, 2),
    ]);

    let records = extract_records(&tokens, &EngineConfig::default());
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].seat_number, "262112705");
    assert_eq!(records[1].seat_number, "262112706");
}

#[test]
fn test_tail_record_captured_at_end_of_stream() {
    let tokens = gazette(&[("262112705 MOHIT BHARAT MALI Regular MALE", 20.0, 100.0, 0)]);

    let records = extract_records(&tokens, &EngineConfig::default());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "MOHIT BHARAT MALI");
}

#[test]
fn test_course_header_line_never_opens_a_record() {
    // Numeric left-aligned prefix plus course-header vocabulary: the
    // anchor tie-break must reject it even though the pattern matches.
    let tokens = gazette(&[
        ("116211100 COURSE STRUCTURE AND SCHEME", 20.0, 80.0, 0),
        ("262112705 MOHIT BHARAT MALI", 20.0, 100.0, 0),
        ("TOTAL 382 PASS 7.45", 20.0, 115.0, 0),
    ]);

    let records = extract_records(&tokens, &EngineConfig::default());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].seat_number, "262112705");
}

#[test]
fn test_duplicate_seats_collapse_deterministically() {
    let tokens = gazette(&[
        ("262112705 MOHIT BHARAT MALI", 20.0, 100.0, 0),
        ("262112705 MOHIT BHARAT MALI", 20.0, 130.0, 0),
        ("TOTAL 382 PASS 7.45", 20.0, 145.0, 0),
    ]);

    let records = extract_records(&tokens, &EngineConfig::default());
    assert_eq!(records.len(), 1);
    // The second span carries the scores, so it is the more complete one.
    assert_eq!(records[0].total_marks, Some(382));
}

#[test]
fn test_subject_order_follows_catalogue_not_score_order() {
    let config = EngineConfig::default();
    let tokens = gazette(&[
        ("1162111 FINANCIAL ACCOUNTING - II", 20.0, 40.0, 0),
        ("1162112 BUSINESS ECONOMICS", 20.0, 52.0, 0),
        ("1162113 BUSINESS LAW", 20.0, 64.0, 0),
        ("262112705 MOHIT BHARAT MALI", 20.0, 100.0, 0),
        ("36 B+ 4 54 A 3 41 B 2", 20.0, 115.0, 0),
    ]);

    let records = extract_records(&tokens, &config);
    assert_eq!(records.len(), 1);
    let subjects = &records[0].subjects;
    assert_eq!(subjects.len(), 3);
    assert_eq!(subjects[0].code, "1162111");
    assert_eq!(subjects[1].code, "1162112");
    assert_eq!(subjects[2].code, "1162113");
    assert_eq!(subjects[0].total, Some(36));
    assert_eq!(subjects[1].total, Some(54));
    assert_eq!(subjects[2].total, Some(41));
}

#[test]
fn test_missing_score_groups_leave_absent_scores() {
    let tokens = gazette(&[
        ("1162111 FINANCIAL ACCOUNTING - II", 20.0, 40.0, 0),
        ("1162112 BUSINESS ECONOMICS", 20.0, 52.0, 0),
        ("262112705 MOHIT BHARAT MALI", 20.0, 100.0, 0),
        ("36 B+ 4", 20.0, 115.0, 0),
    ]);

    let records = extract_records(&tokens, &EngineConfig::default());
    assert_eq!(records.len(), 1);
    let subjects = &records[0].subjects;
    assert_eq!(subjects.len(), 2);
    assert_eq!(subjects[0].total, Some(36));
    assert!(subjects[1].total.is_none());
    assert!(subjects[1].grade.is_none());
}

#[test]
fn test_wrapped_name_absorbed_from_continuation_line() {
    let tokens = gazette(&[
        ("262112705 SNEHA", 20.0, 100.0, 0),
        ("RAMESH PATIL", 20.0, 112.0, 0),
        ("TOTAL 310 PASS 6.20", 20.0, 127.0, 0),
    ]);

    let records = extract_records(&tokens, &EngineConfig::default());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "SNEHA RAMESH PATIL");
    assert_eq!(records[0].total_marks, Some(310));
}

#[test]
fn test_custom_seat_length() {
    let config = EngineConfig::default().with_seat_length(6);
    let tokens = gazette(&[
        ("123456 MOHIT BHARAT MALI", 20.0, 100.0, 0),
        ("TOTAL 382 PASS 7.45", 20.0, 115.0, 0),
    ]);

    let records = extract_records(&tokens, &config);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].seat_number, "123456");
}

#[test]
fn test_report_round_trips_through_json() {
    let tokens = gazette(&[
        ("262112705 MOHIT BHARAT MALI Regular MALE", 20.0, 100.0, 0),
        ("TOTAL 382 PASS 7.45", 20.0, 115.0, 0),
    ]);

    let records = extract_records(&tokens, &EngineConfig::default());
    let report = ExtractionReport::new(records);
    let json = report.to_json(JsonFormat::Compact).unwrap();

    let parsed: ExtractionReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.students_found, 1);
    assert_eq!(parsed.students[0].seat_number, "262112705");
    assert_eq!(parsed.students[0].gender, Some(Gender::Male));
}

#[test]
fn test_report_written_to_disk_parses_back() {
    let tokens = gazette(&[
        ("262112705 MOHIT BHARAT MALI", 20.0, 100.0, 0),
        ("TOTAL 382 PASS 7.45", 20.0, 115.0, 0),
    ]);
    let report = ExtractionReport::new(extract_records(&tokens, &EngineConfig::default()));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    std::fs::write(&path, report.to_json(JsonFormat::Pretty).unwrap()).unwrap();

    let parsed: ExtractionReport =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.students_found, 1);
    assert_eq!(parsed.students[0].total_marks, Some(382));
}

#[test]
fn test_extraction_is_deterministic() {
    let tokens = gazette(&[
        ("1162111 FINANCIAL ACCOUNTING - II", 20.0, 40.0, 0),
        ("262112705 MOHIT BHARAT MALI Regular MALE", 20.0, 100.0, 0),
        ("36 B+ 4", 20.0, 115.0, 0),
        ("TOTAL 382 PASS 7.45", 20.0, 130.0, 0),
    ]);

    let config = EngineConfig::default();
    let first = extract_records(&tokens, &config);
    let second = extract_records(&tokens, &config);
    assert_eq!(first, second);
}
