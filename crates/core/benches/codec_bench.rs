use criterion::{black_box, criterion_group, criterion_main, Criterion};

use huffpack_core::{artifact, Alphabet, Encoder, Symbol};

/// Highly compressible text: a short repeating pattern.
fn generate_low_entropy(size: usize) -> Vec<Symbol> {
    let pattern: Vec<Symbol> = "abcdefgABCDEFG12345".encode_utf16().collect();
    pattern.iter().copied().cycle().take(size).collect()
}

/// Every byte value in turn, so all codes are 8 bits long.
fn generate_high_entropy(size: usize) -> Vec<Symbol> {
    (0..=255u16).cycle().take(size).collect()
}

const BENCH_DATA_SIZE: usize = 65536;

fn bench_codec(c: &mut Criterion) {
    let low = generate_low_entropy(BENCH_DATA_SIZE);
    let high = generate_high_entropy(BENCH_DATA_SIZE);

    let stored_low = artifact::compress(&low, Alphabet::UTF16).unwrap();
    let stored_high = artifact::compress(&high, Alphabet::UTF16).unwrap();
    let encoder = Encoder::default();

    let mut group = c.benchmark_group("Huffman Codec");
    group.throughput(criterion::Throughput::Elements(BENCH_DATA_SIZE as u64));

    group.bench_function("Encode (Low Entropy)", |b| {
        b.iter(|| black_box(encoder.encode(black_box(&low))))
    });
    group.bench_function("Encode (High Entropy)", |b| {
        b.iter(|| black_box(encoder.encode(black_box(&high))))
    });
    group.bench_function("Compress (High Entropy)", |b| {
        b.iter(|| black_box(artifact::compress(black_box(&high), Alphabet::UTF16)))
    });

    group.bench_function("Decompress (Low Entropy)", |b| {
        b.iter(|| black_box(artifact::decompress(black_box(&stored_low))))
    });
    group.bench_function("Decompress (High Entropy)", |b| {
        b.iter(|| black_box(artifact::decompress(black_box(&stored_high))))
    });

    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
