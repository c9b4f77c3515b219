use criterion::{black_box, criterion_group, criterion_main, Criterion};
use seratocrate::{decode, decode_lenient, encode};

fn sample_paths(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("/Users/dj/Music/Library/Artist {}/Album {}/{:02} Track.mp3", i % 97, i % 13, i % 20))
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let paths = sample_paths(1000);
    c.bench_function("encode_1000_tracks", |b| b.iter(|| encode(black_box(&paths)).unwrap()));
}

fn bench_decode(c: &mut Criterion) {
    let raw = encode(&sample_paths(1000)).unwrap();
    c.bench_function("decode_1000_tracks", |b| b.iter(|| decode(black_box(&raw)).unwrap()));
    c.bench_function("decode_lenient_1000_tracks", |b| b.iter(|| decode_lenient(black_box(&raw))));
}

fn bench_scan_damaged(c: &mut Criterion) {
    let mut raw = encode(&sample_paths(1000)).unwrap();
    raw.truncate(raw.len() - 5);
    c.bench_function("scan_damaged_1000_tracks", |b| b.iter(|| decode_lenient(black_box(&raw))));
}

criterion_group!(benches, bench_encode, bench_decode, bench_scan_damaged);
criterion_main!(benches);
