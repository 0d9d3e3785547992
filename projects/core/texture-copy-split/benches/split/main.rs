use core::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use texture_copy_split::{
    plan_texture_copy, split_2d, split_3d, BlockInfo, BufferLayout, Extent3D, Origin3D,
    TextureDimension, D3D12_TEXTURE_DATA_PLACEMENT_ALIGNMENT,
};

#[cfg(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
))]
use pprof::criterion::{Output, PProfProfiler};

const PLACEMENT: u32 = D3D12_TEXTURE_DATA_PLACEMENT_ALIGNMENT;
const RGBA8: BlockInfo = BlockInfo::new(4, 1, 1);
const BC1: BlockInfo = BlockInfo::new(8, 4, 4);

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Texture Copy Split");

    // Offsets covering every path: aligned, widened footprint, wrapped rows.
    let offsets: [u64; 4] = [0, 4, 32, 1020];

    group.bench_function("split_2d_rgba8", |b| {
        b.iter(|| {
            for &offset in &offsets {
                black_box(split_2d(
                    black_box(Origin3D::new(64, 48, 0)),
                    black_box(Extent3D::new(256, 64, 1)),
                    RGBA8,
                    black_box(offset),
                    1024,
                    PLACEMENT,
                ));
            }
        })
    });

    // Empty first row with even and odd heights hits both 3D fix-ups.
    group.bench_function("split_3d_empty_first_row", |b| {
        b.iter(|| {
            for height in [4u32, 3] {
                black_box(split_3d(
                    black_box(Origin3D::ZERO),
                    black_box(Extent3D::new(64, height, 32)),
                    RGBA8,
                    black_box(256 + 32),
                    256,
                    height,
                    PLACEMENT,
                ));
            }
        })
    });

    group.bench_function("plan_bc1_array_256_layers", |b| {
        b.iter(|| {
            let plan = plan_texture_copy(
                TextureDimension::D2,
                black_box(Origin3D::ZERO),
                black_box(Extent3D::new(512, 512, 256)),
                BC1,
                black_box(BufferLayout::new(264, 1024, 129)),
                PLACEMENT,
            );
            plan.regions().count()
        })
    });

    group.finish();
}

#[cfg(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
))]
criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = criterion_benchmark
}

#[cfg(not(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
)))]
criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = criterion_benchmark
}

criterion_main!(benches);
