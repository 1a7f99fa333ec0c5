//! Benchmarks for dense-array slicing and cached field access.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use xamr::{Dataset, DenseArray, MemoryHierarchy, MemoryProvider, Selector, SpatialBounds};

fn bench_slice(c: &mut Criterion) {
    let array = DenseArray::from_fn(vec![64, 64, 64], |idx| (idx[0] + idx[1] + idx[2]) as f64);

    c.bench_function("slice_plane_64", |b| {
        b.iter(|| {
            array
                .slice(black_box(&[
                    Selector::At(32),
                    Selector::all(),
                    Selector::all(),
                ]))
                .unwrap()
        })
    });

    c.bench_function("slice_subcube_64", |b| {
        b.iter(|| {
            array
                .slice(black_box(&[
                    Selector::from(16..48),
                    Selector::from(16..48),
                    Selector::from(16..48),
                ]))
                .unwrap()
        })
    });
}

fn bench_field_access(c: &mut Criterion) {
    let hierarchy = MemoryHierarchy::builder(0.0, &[64, 64, 64])
        .field_fn("temperature", |p| p[0] + 2.0 * p[1] - p[2])
        .build()
        .unwrap();
    let provider = MemoryProvider::new().with_hierarchy("plt00000", hierarchy);
    let ds = Dataset::open("plt00000", &provider).unwrap();
    let temp = ds.field("temperature").unwrap();

    // First touch warms the cache; the loop measures cached access.
    temp.values().unwrap();
    c.bench_function("cached_values_64", |b| {
        b.iter(|| black_box(&temp).values().unwrap())
    });

    let region = temp
        .spatial_select(SpatialBounds::new().x(0.25..=0.75).y(0.25..=0.75).z(0.25..=0.75))
        .unwrap();
    c.bench_function("cached_spatial_select_64", |b| {
        b.iter(|| black_box(&region).values().unwrap())
    });
}

criterion_group!(benches, bench_slice, bench_field_access);
criterion_main!(benches);
