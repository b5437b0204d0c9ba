//! TLK codec benchmarks.
//!
//! Covers both pipeline directions over synthetic tables of increasing
//! size. The decode side is dominated by the pre-scan (one tree walk per
//! payload bit), so throughput is measured against the encoded byte size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tlktool_tlk::{decode, encode, TlkEntry};

const VOCABULARY: &[&str] = &[
    "the", "of", "and", "to", "a", "in", "is", "you", "that", "it", "commander", "galaxy",
    "reaper", "citadel", "normandy", "shepard", "mission", "squad", "fleet", "relay",
];

fn generate_entries(count: usize) -> Vec<TlkEntry> {
    (0..count)
        .map(|i| {
            let mut line = String::new();
            for k in 0..8 {
                if k > 0 {
                    line.push(' ');
                }
                line.push_str(VOCABULARY[(i * 7 + k * 3) % VOCABULARY.len()]);
            }
            TlkEntry::text(i as i32, i as u32, line)
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for count in [100, 1000, 5000] {
        let entries = generate_entries(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &entries, |b, entries| {
            b.iter(|| encode(black_box(entries)).unwrap())
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for count in [100, 1000, 5000] {
        let bytes = encode(&generate_entries(count)).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &bytes, |b, bytes| {
            b.iter(|| decode(black_box(bytes)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
