//! Benchmarks for gradex extraction performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks run the engine over synthetic gazette token streams.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gradex::{extract_records, EngineConfig, Token};

/// Lay out a line of text as word tokens at the given position.
fn line_tokens(text: &str, top: f32, page: u32) -> Vec<Token> {
    let mut x = 20.0;
    text.split_whitespace()
        .map(|word| {
            let width = word.len() as f32 * 6.0;
            let token = Token::new(word, x, x + width, top, top + 10.0, page);
            x += width + 6.0;
            token
        })
        .collect()
}

/// Build a synthetic gazette with the given number of student records,
/// fifty to a page.
fn synthetic_gazette(record_count: usize) -> Vec<Token> {
    let mut tokens = Vec::new();

    for i in 0..record_count {
        let page = (i / 50) as u32;
        let base = (i % 50) as f32 * 60.0 + 40.0;
        let seat = 262112000 + i as u64;

        tokens.extend(line_tokens(
            &format!("{} MOHIT BHARAT MALI Regular MALE MU0341120123", seat),
            base,
            page,
        ));
        tokens.extend(line_tokens(
            "1162111 Financial Accounting - II 36 B+ 4",
            base + 12.0,
            page,
        ));
        tokens.extend(line_tokens(
            "1162112 Business Economics 28 42 70 A 3",
            base + 24.0,
            page,
        ));
        tokens.extend(line_tokens("TOTAL 382 PASS 7.45", base + 36.0, page));
    }

    tokens
}

fn bench_extract(c: &mut Criterion) {
    let config = EngineConfig::default();

    let small = synthetic_gazette(10);
    c.bench_function("extract_10_records", |b| {
        b.iter(|| extract_records(black_box(&small), &config))
    });

    let large = synthetic_gazette(500);
    c.bench_function("extract_500_records", |b| {
        b.iter(|| extract_records(black_box(&large), &config))
    });
}

fn bench_line_reconstruction_heavy(c: &mut Criterion) {
    // A page with dense, shuffled positions stresses the line bucketing.
    let mut tokens = Vec::new();
    for row in 0..200 {
        for col in 0..12 {
            tokens.push(Token::new(
                format!("T{}x{}", row, col),
                20.0 + col as f32 * 45.0,
                50.0 + col as f32 * 45.0,
                40.0 + row as f32 * 11.0,
                50.0 + row as f32 * 11.0,
                0,
            ));
        }
    }

    let config = EngineConfig::default();
    c.bench_function("dense_page_no_records", |b| {
        b.iter(|| extract_records(black_box(&tokens), &config))
    });
}

criterion_group!(benches, bench_extract, bench_line_reconstruction_heavy);
criterion_main!(benches);
