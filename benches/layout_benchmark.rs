//! Benchmarks for the question layout pipeline.
//!
//! Run with: cargo bench
//!
//! Pages are synthetic: word fragments laid out like a GATE booklet, with
//! white in-memory bitmaps standing in for rendered pages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use unexam::parser::{crop_regions, group_words_into_lines, segment_questions};
use unexam::{parse_with_backend, ExamConfig, Line, MemoryBackend, MemoryPage, PageSize, Word};

const QUESTIONS_PER_PAGE: usize = 4;

/// Word fragments of one page: a few questions, several words per line.
fn page_words() -> Vec<Word> {
    let mut words = Vec::new();
    let mut top = 60.0;
    for q in 0..QUESTIONS_PER_PAGE {
        let marker = format!("#{}", q + 1);
        let rows: [&[&str]; 5] = [
            &["Q", &marker, "Multiple", "Choice", "Type"],
            &["Award:", "2", "Penalty:", "0.66"],
            &["Find", "the", "rank", "of", "the", "given", "matrix."],
            &["(A)", "1", "(B)", "2", "(C)", "3", "(D)", "4"],
            &["Correct", "Answer:", "C", "Not", "Attempted"],
        ];
        for row in rows {
            let mut left = 72.0;
            for text in row {
                let right = left + text.len() as f32 * 5.0;
                words.push(Word::new(*text, left, top, right, top + 11.0));
                left = right + 4.0;
            }
            top += 18.0;
        }
        top += 80.0;
    }
    words
}

fn line_stream(pages: usize) -> Vec<Line> {
    let words = page_words();
    (0..pages)
        .flat_map(|page| group_words_into_lines(&words, page, PageSize::a4()))
        .collect()
}

fn bench_line_grouping(c: &mut Criterion) {
    let words = page_words();
    c.bench_function("group_words_into_lines", |b| {
        b.iter(|| group_words_into_lines(black_box(&words), 0, PageSize::a4()));
    });
}

fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");

    for pages in [1, 20, 100] {
        let lines = line_stream(pages);
        group.bench_function(format!("{}_pages", pages), |b| {
            b.iter(|| {
                let ranges = segment_questions(black_box(&lines));
                for range in &ranges {
                    black_box(crop_regions(range.lines(&lines)));
                }
            });
        });
    }

    group.finish();
}

fn bench_full_parse(c: &mut Criterion) {
    let mut backend = MemoryBackend::new();
    for _ in 0..5 {
        let mut page = MemoryPage::blank(PageSize::a4(), 200.0 / 72.0);
        page.words = page_words();
        backend.push_page(page);
    }
    let config = ExamConfig::new("bench.pdf");

    c.bench_function("parse_5_pages", |b| {
        b.iter(|| parse_with_backend(black_box(&backend), &config).unwrap());
    });
}

criterion_group!(benches, bench_line_grouping, bench_segmentation, bench_full_parse);
criterion_main!(benches);
