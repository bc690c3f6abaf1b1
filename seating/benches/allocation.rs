//! Allocation benchmarks
//!
//! - Full request streams through the `Store` on the reference venue
//! - Placement on a crowded grid, where most groups fall back to scattering
//!
//! Run with: `cargo bench --bench allocation`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use seatplan::{process_lines, seating_store, TheaterLayout};

/// Deterministic request stream: small parties with the odd large one
fn request_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let seats = match i % 7 {
                0 => 12,
                3 => 1,
                _ => i % 5 + 2,
            };
            format!("R{i:04} {seats}")
        })
        .collect()
}

/// Benchmark a whole run from parsed lines to final state
fn benchmark_request_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_stream");

    for count in [10_usize, 50, 200] {
        let lines = request_lines(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &lines, |b, lines| {
            b.iter(|| {
                let mut store = seating_store(TheaterLayout::default());
                process_lines(&mut store, black_box(lines)).expect("send");
                black_box(store.into_state());
            });
        });
    }

    group.finish();
}

/// Benchmark a large venue where buffers fragment the rows
fn benchmark_fragmented_venue(c: &mut Criterion) {
    let mut group = c.benchmark_group("fragmented_venue");
    let layout = TheaterLayout::new(60, 80, 1, 3);
    let lines = request_lines(1_000);

    group.bench_function("1000_requests_60x80", |b| {
        b.iter(|| {
            let mut store = seating_store(layout);
            process_lines(&mut store, black_box(&lines)).expect("send");
            black_box(store.into_state());
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_request_stream, benchmark_fragmented_venue);
criterion_main!(benches);
