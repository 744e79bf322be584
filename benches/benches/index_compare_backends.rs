// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_index::{Aabb2D, Index, QuadIndex};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Aabb2D> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Aabb2D::from_xywh(x0, y0, cell, cell));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_rects(count: usize, max_w: f64, max_h: f64, rect_w: f64, rect_h: f64) -> Vec<Aabb2D> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let x0 = rng.next_f64() * (max_w - rect_w).max(1.0);
        let y0 = rng.next_f64() * (max_h - rect_h).max(1.0);
        out.push(Aabb2D::from_xywh(x0, y0, rect_w, rect_h));
    }
    out
}

// Degenerate boxes the way the rect packer stores its perimeter: alternating
// zero-height and zero-width segments marching outward.
fn gen_segment_rects(count: usize) -> Vec<Aabb2D> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    for i in 0..count {
        let x0 = rng.next_f64() * 1000.0;
        let y0 = rng.next_f64() * 1000.0;
        let len = 5.0 + rng.next_f64() * 40.0;
        if i % 2 == 0 {
            out.push(Aabb2D::new(x0, y0, x0 + len, y0));
        } else {
            out.push(Aabb2D::new(x0, y0, x0, y0 + len));
        }
    }
    out
}

fn bench_flatvec(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatvec");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("insert_query_rect_n{}", n), |b| {
            b.iter_batched(
                Index::<u32>::new,
                |mut idx| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = idx.insert(r, i as u32);
                    }
                    let hits: usize = idx
                        .query_rect(Aabb2D::from_xywh(100.0, 100.0, 400.0, 400.0))
                        .count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_quadtree(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("insert_query_rect_n{}", n), |b| {
            b.iter_batched(
                QuadIndex::<u32>::new,
                |mut idx| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = idx.insert(r, i as u32);
                    }
                    let hits: usize = idx
                        .query_rect(Aabb2D::from_xywh(100.0, 100.0, 400.0, 400.0))
                        .count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    let rects = gen_random_rects(4096, 2000.0, 2000.0, 12.0, 12.0);
    group.bench_function("insert_query_rect_random", |b| {
        b.iter_batched(
            QuadIndex::<u32>::new,
            |mut idx| {
                for (i, r) in rects.iter().copied().enumerate() {
                    let _ = idx.insert(r, i as u32);
                }
                let hits: usize = idx
                    .query_rect(Aabb2D::from_xywh(800.0, 800.0, 400.0, 400.0))
                    .count();
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_quadtree_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_segments");
    let rects = gen_segment_rects(4096);
    group.bench_function("insert_query_degenerate", |b| {
        b.iter_batched(
            QuadIndex::<u32>::new,
            |mut idx| {
                for (i, r) in rects.iter().copied().enumerate() {
                    let _ = idx.insert(r, i as u32);
                }
                let hits: usize = idx
                    .query_rect(Aabb2D::from_xywh(400.0, 400.0, 200.0, 200.0))
                    .count();
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_update_heavy_quadtree(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_update_heavy");
    let rects = gen_grid_rects(64, 10.0);
    group.bench_function("update_move_all", |b| {
        b.iter_batched(
            || {
                let mut idx = QuadIndex::<u32>::new();
                let mut keys = Vec::new();
                for (i, r) in rects.iter().copied().enumerate() {
                    keys.push(idx.insert(r, i as u32));
                }
                (idx, keys)
            },
            |(mut idx, keys)| {
                for (j, k) in keys.into_iter().enumerate() {
                    let dx = (j % 5) as f64 - 2.0;
                    let dy = ((j * 7) % 5) as f64 - 2.0;
                    idx.update(k, Aabb2D::from_xywh(10.0 * j as f64 + dx, dy, 10.0, 10.0));
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_query_heavy_quadtree(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_query_heavy");
    let rects = gen_grid_rects(128, 8.0);
    group.bench_function("build_then_many_queries", |b| {
        b.iter_batched(
            || {
                let mut idx = QuadIndex::<u32>::new();
                for (i, r) in rects.iter().copied().enumerate() {
                    let _ = idx.insert(r, i as u32);
                }
                idx
            },
            |idx| {
                let mut total = 0usize;
                for q in 0..256 {
                    let x = (q % 64) as f64 * 8.0;
                    let y = (q / 64) as f64 * 8.0;
                    total += idx
                        .query_rect(Aabb2D::from_xywh(x, y, 64.0, 64.0))
                        .count();
                }
                black_box(total);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_flatvec,
    bench_quadtree,
    bench_quadtree_segments,
    bench_update_heavy_quadtree,
    bench_query_heavy_quadtree,
);
criterion_main!(benches);
