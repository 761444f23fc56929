//! Benchmarks for brute-force object location.
//!
//! Benchmark groups:
//! - `locator_scan`: full scans over synthetic documents of growing size
//! - `locator_stream_heavy`: documents dominated by stream payloads

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use salvor_core::document::locator::locate_objects;
use salvor_core::parser::SliceCursor;

// =============================================================================
// Data Generation
// =============================================================================

/// A document with `n` small dictionary objects.
fn generate_objects(n: usize) -> Vec<u8> {
    let mut data = b"%PDF-1.7\n".to_vec();
    for i in 1..=n {
        data.extend_from_slice(
            format!("{i} 0 obj\n<< /Type /Page /Parent 1 0 R /MediaBox [0 0 612 792] >>\nendobj\n")
                .as_bytes(),
        );
    }
    data.extend_from_slice(b"trailer\n<< /Size 1 >>\n%%EOF\n");
    data
}

/// A document with `n` objects each carrying `payload` bytes of stream data.
fn generate_streams(n: usize, payload: usize) -> Vec<u8> {
    let mut data = b"%PDF-1.7\n".to_vec();
    let body: Vec<u8> = (0..payload).map(|i| b"0123456789 obj e"[i % 16]).collect();
    for i in 1..=n {
        data.extend_from_slice(format!("{i} 0 obj\n<< /Length {payload} >>\nstream\n").as_bytes());
        data.extend_from_slice(&body);
        data.extend_from_slice(b"\nendstream\nendobj\n");
    }
    data.extend_from_slice(b"%%EOF\n");
    data
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("locator_scan");
    for n in [100, 1_000, 10_000] {
        let data = generate_objects(n);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter(|| {
                let mut cursor = SliceCursor::new(data.as_slice());
                black_box(locate_objects(&mut cursor).unwrap())
            });
        });
    }
    group.finish();
}

fn bench_stream_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("locator_stream_heavy");
    for payload in [1_024, 16_384] {
        let data = generate_streams(64, payload);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(payload), &data, |b, data| {
            b.iter(|| {
                let mut cursor = SliceCursor::new(data.as_slice());
                black_box(locate_objects(&mut cursor).unwrap())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scan, bench_stream_heavy);
criterion_main!(benches);
