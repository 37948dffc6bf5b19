//! Identifier Layer Benchmarks
//!
//! Measures performance of identifier operations including:
//! - Virtual ID registration and resolution
//! - Composite ID encoding and decoding
//! - Parent derivation from event IDs

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use morgen_core::ids::{codec, VirtualIdRegistry};

/// Benchmark registry operations
fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");

    group.bench_function("register_new", |b| {
        b.iter_with_setup(VirtualIdRegistry::new, |registry| {
            black_box(registry.register("6954a6179c9d703795f281ce"))
        })
    });

    group.bench_function("register_existing", |b| {
        let registry = VirtualIdRegistry::new();
        registry.register("6954a6179c9d703795f281ce");
        b.iter(|| black_box(registry.register("6954a6179c9d703795f281ce")))
    });

    group.bench_function("resolve", |b| {
        let registry = VirtualIdRegistry::new();
        let virtual_id = registry.register("6954a6179c9d703795f281ce");
        b.iter(|| black_box(registry.resolve(&virtual_id).unwrap()))
    });

    group.finish();
}

/// Benchmark composite codec operations
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let calendar_id = codec::encode_tuple(&["6954a6179c9d703795f281ce", "a@test.com"]);
    let event_id = codec::encode_tuple(&["a@test.com", "uid1", "6954a6179c9d703795f281ce"]);

    group.bench_function("encode_tuple", |b| {
        b.iter(|| {
            black_box(codec::encode_tuple(&[
                "6954a6179c9d703795f281ce",
                "a@test.com",
            ]))
        })
    });

    group.bench_function("decode_tuple", |b| {
        b.iter(|| black_box(codec::decode_tuple(&calendar_id).unwrap()))
    });

    group.bench_function("ids_from_event", |b| {
        b.iter(|| black_box(codec::ids_from_event(&event_id).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_registry, bench_codec);
criterion_main!(benches);
