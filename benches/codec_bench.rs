use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wadmake::codec::{decode_slice, encode_to_vec};
use wadmake::{Lump, Wad, WadKind};

fn sample_wad(lumps: usize, lump_size: usize) -> Wad {
    let mut wad = Wad::new(WadKind::Pwad);
    for i in 0..lumps {
        wad.directory.insert(Lump::new(format!("L{i:07}"), vec![i as u8; lump_size]));
    }
    wad
}

fn bench_encode(c: &mut Criterion) {
    let many_small = sample_wad(10_000, 64);
    let few_large = sample_wad(16, 1024 * 1024);

    c.bench_function("encode_10k_small_lumps", |b| b.iter(|| encode_to_vec(black_box(&many_small))));
    c.bench_function("encode_16x1mb_lumps", |b| b.iter(|| encode_to_vec(black_box(&few_large))));
}

fn bench_decode(c: &mut Criterion) {
    let many_small = encode_to_vec(&sample_wad(10_000, 64)).unwrap();
    let few_large = encode_to_vec(&sample_wad(16, 1024 * 1024)).unwrap();

    c.bench_function("decode_10k_small_lumps", |b| b.iter(|| decode_slice(black_box(&many_small))));
    c.bench_function("decode_16x1mb_lumps", |b| b.iter(|| decode_slice(black_box(&few_large))));
}

fn bench_find(c: &mut Criterion) {
    let wad = sample_wad(10_000, 0);

    c.bench_function("find_last_of_10k", |b| {
        b.iter(|| wad.directory.find(black_box("L0009999"), 1))
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_find);
criterion_main!(benches);
