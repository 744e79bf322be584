// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_pack::{PackMode, PackShape, PackedLayout, SortMode};
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Size;

fn gen_sizes(count: usize) -> Vec<Size> {
    (0..count)
        .map(|i| {
            let w = 8.0 + (i % 9) as f64 * 6.0;
            let h = 6.0 + (i % 5) as f64 * 7.0;
            Size::new(w, h)
        })
        .collect()
}

fn bench_circles(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_circles");
    for &n in &[64usize, 256, 1024] {
        let sizes = gen_sizes(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("elliptical_n{}", n), |b| {
            let mut layout = PackedLayout::new();
            layout.set_has_circular_nodes(true);
            b.iter(|| black_box(layout.arrange(&sizes)))
        });
        group.bench_function(format!("spiral_n{}", n), |b| {
            let mut layout = PackedLayout::new();
            layout
                .set_has_circular_nodes(true)
                .set_shape(PackShape::Spiral);
            b.iter(|| black_box(layout.arrange(&sizes)))
        });
    }
    group.finish();
}

fn bench_rects(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_rects");
    for &n in &[64usize, 256, 1024] {
        let sizes = gen_sizes(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("rectangular_n{}", n), |b| {
            let mut layout = PackedLayout::new();
            layout.set_shape(PackShape::Rectangular);
            b.iter(|| black_box(layout.arrange(&sizes)))
        });
        group.bench_function(format!("elliptical_sorted_n{}", n), |b| {
            let mut layout = PackedLayout::new();
            layout.set_sort_mode(SortMode::Area);
            b.iter(|| black_box(layout.arrange(&sizes)))
        });
    }
    group.finish();
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_fit");
    let sizes = gen_sizes(256);
    group.bench_function("rect_fit_256", |b| {
        let mut layout = PackedLayout::new();
        layout
            .set_shape(PackShape::Rectangular)
            .set_mode(PackMode::Fit)
            .set_size(Size::new(600.0, 600.0));
        b.iter(|| black_box(layout.arrange(&sizes)))
    });
    group.bench_function("circle_expand_256", |b| {
        let mut layout = PackedLayout::new();
        layout
            .set_has_circular_nodes(true)
            .set_mode(PackMode::ExpandToFit)
            .set_size(Size::new(900.0, 900.0));
        b.iter(|| black_box(layout.arrange(&sizes)))
    });
    group.finish();
}

criterion_group!(benches, bench_circles, bench_rects, bench_fit);
criterion_main!(benches);
