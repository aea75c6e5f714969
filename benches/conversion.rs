//! Benchmarks for the conversion pipeline.
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use leetdown::dom::parse_html;
use leetdown::markdown::{
    ConvertOptions, GlossaryPair, LabelAllocator, NoFetch, append_glossary, convert,
    convert_html,
};
use leetdown::testcase::{combine_unique, segment};

const TWO_SUM_HTML: &str = include_str!("../tests/fixtures/two_sum.html");
const DEFAULT_BLOB: &str = include_str!("../tests/fixtures/two_sum_default.txt");
const CUSTOM_BLOB: &str = include_str!("../tests/fixtures/two_sum_custom.txt");

/// A long description built by repeating the fixture body.
fn large_html() -> String {
    let body = TWO_SUM_HTML
        .split_once("<body>")
        .and_then(|(_, rest)| rest.split_once("</body>"))
        .map(|(body, _)| body)
        .unwrap_or(TWO_SUM_HTML);
    format!("<html><body>{}</body></html>", body.repeat(50))
}

// ============================================================================
// Markdown Benchmarks
// ============================================================================

fn bench_parse_html(c: &mut Criterion) {
    c.bench_function("parse_html", |b| {
        b.iter(|| parse_html(black_box(TWO_SUM_HTML)));
    });
}

fn bench_convert(c: &mut Criterion) {
    let dom = parse_html(TWO_SUM_HTML);
    let options = ConvertOptions::default();
    c.bench_function("convert_two_sum", |b| {
        b.iter(|| convert(&dom, dom.body(), &options, &mut NoFetch));
    });
}

fn bench_convert_large(c: &mut Criterion) {
    let html = large_html();
    let options = ConvertOptions::default();
    c.bench_function("convert_html_large", |b| {
        b.iter(|| convert_html(black_box(&html), &options, &mut NoFetch));
    });
}

fn bench_glossary(c: &mut Criterion) {
    let markdown = convert_html(&large_html(), &ConvertOptions::default(), &mut NoFetch).markdown;
    let mut labels = LabelAllocator::new();
    let pairs: Vec<GlossaryPair> = ["indices", "solution", "element", "algorithm", "order"]
        .into_iter()
        .map(|term| GlossaryPair::new(term, "Definition.", &mut labels))
        .collect();
    c.bench_function("append_glossary", |b| {
        b.iter(|| append_glossary(black_box(&markdown), &pairs));
    });
}

// ============================================================================
// Testcase Benchmarks
// ============================================================================

fn bench_segment(c: &mut Criterion) {
    let blob = DEFAULT_BLOB.repeat(200);
    c.bench_function("segment", |b| {
        b.iter(|| segment(black_box(&blob), &["nums", "target"]));
    });
}

fn bench_combine_unique(c: &mut Criterion) {
    c.bench_function("combine_unique", |b| {
        b.iter(|| combine_unique(&["nums", "target"], black_box(DEFAULT_BLOB), CUSTOM_BLOB));
    });
}

criterion_group!(
    benches,
    bench_parse_html,
    bench_convert,
    bench_convert_large,
    bench_glossary,
    bench_segment,
    bench_combine_unique,
);
criterion_main!(benches);
