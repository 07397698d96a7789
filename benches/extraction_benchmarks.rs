//! Performance benchmarks for the crew per-diem engine.
//!
//! This benchmark suite measures the text-to-result path on synthetic duty
//! reports:
//! - Segment extraction from one page
//! - Rotation building over a month of segments
//! - Full batch analysis of 1, 12 and 60 monthly reports
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::path::Path;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use crew_per_diem::calculation::build_rotations;
use crew_per_diem::config::ConfigLoader;
use crew_per_diem::engine::MissionAnalyzer;
use crew_per_diem::extraction::{PlainTextPageSource, SourceDocument, extract_segments};
use crew_per_diem::models::{ReportingPeriod, sort_segments};

const STOPOVERS: [&str; 5] = ["JFK", "NRT", "YYZ", "LOS", "FRA"];

/// Creates the config loader from the shipped configuration directory.
fn load_config() -> ConfigLoader {
    ConfigLoader::load(Path::new(env!("CARGO_MANIFEST_DIR")).join("config"))
        .expect("Failed to load config")
}

/// Creates one month of duty: seven rotations of two legs each, plus header
/// and footer noise.
fn create_page(month: u32) -> String {
    let mut page = format!("AIR FRANCE - RELEVE EP5 - {:02}/2024\n", month);
    page.push_str("N TYPE IMMAT VOL DEP JJ|HH.MM ARR JJ|HH.MM\n");
    for i in 0..7u32 {
        let out_day = 1 + i * 4;
        let back_day = out_day + 2;
        let stopover = STOPOVERS[i as usize % STOPOVERS.len()];
        page.push_str(&format!(
            "{} B77W FGSQA AF{:03} CDG {:02}|10.50 {} {:02}|18.25\n",
            i * 2 + 1,
            i * 2,
            out_day,
            stopover,
            out_day
        ));
        page.push_str(&format!(
            "{} B77W FGSQB AF{:03} {} {:02}|22.10 CDG {:02}|06.45\n",
            i * 2 + 2,
            i * 2 + 1,
            stopover,
            back_day,
            back_day + 1
        ));
    }
    page.push_str("TOTAL HEURES DE VOL 112.40\n");
    page
}

/// Creates `count` monthly reports, cycling through the twelve months.
fn create_documents(count: usize) -> Vec<SourceDocument> {
    (0..count)
        .map(|i| {
            let month = (i % 12) as u32 + 1;
            SourceDocument::new(format!("ep5_{:02}2024_{}.txt", month, i), create_page(month))
        })
        .collect()
}

/// Benchmark: Segment extraction from a single page.
fn bench_extract_page(c: &mut Criterion) {
    let page = create_page(6);
    let period = ReportingPeriod::new(2024, 6).expect("valid period");

    c.bench_function("extract_page", |b| {
        b.iter(|| black_box(extract_segments(black_box(&page), period, "ep5_062024.txt")))
    });
}

/// Benchmark: Sorting and rotation building over one month of segments.
fn bench_build_rotations(c: &mut Criterion) {
    let period = ReportingPeriod::new(2024, 6).expect("valid period");
    let segments = extract_segments(&create_page(6), period, "ep5_062024.txt");
    let home_bases = vec!["CDG".to_string(), "ORY".to_string()];

    c.bench_function("build_rotations", |b| {
        b.iter(|| {
            let mut sorted = segments.clone();
            sort_segments(&mut sorted);
            black_box(build_rotations(&sorted, &home_bases, 2024))
        })
    });
}

/// Benchmark: Full batch analysis, per-diem files included.
fn bench_batches(c: &mut Criterion) {
    let config = load_config();

    let mut group = c.benchmark_group("batch_analysis");
    for count in [1usize, 12, 60] {
        let documents = create_documents(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &documents, |b, documents| {
            b.iter(|| {
                let mut analyzer = MissionAnalyzer::new(&config, PlainTextPageSource);
                black_box(analyzer.analyse(documents))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_extract_page, bench_build_rotations, bench_batches);
criterion_main!(benches);
