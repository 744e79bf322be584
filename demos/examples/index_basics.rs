// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial index basics.
//!
//! Insert a few boxes, move one, query, and read the per-axis extremes.
//!
//! Run:
//! - `cargo run -p canopy_demos --example index_basics`

use canopy_index::{Aabb2D, QuadIndex};

fn main() {
    let mut idx: QuadIndex<&str> = QuadIndex::new();
    let a = idx.insert(Aabb2D::from_xywh(0.0, 0.0, 40.0, 30.0), "a");
    let _b = idx.insert(Aabb2D::from_xywh(50.0, 0.0, 40.0, 30.0), "b");
    let _c = idx.insert(Aabb2D::from_xywh(0.0, 40.0, 90.0, 20.0), "c");

    // Updates are visible to the next query.
    idx.update(a, Aabb2D::from_xywh(100.0, 0.0, 40.0, 30.0));

    let hits: Vec<&str> = idx
        .query_rect(Aabb2D::from_xywh(95.0, 10.0, 20.0, 10.0))
        .map(|(_, p)| p)
        .collect();
    println!("hits at x=95..115: {hits:?}");
    assert_eq!(hits, ["a"]);

    let ext = idx.extremes().unwrap();
    println!(
        "extremes: min_x={} max_x={} min_y={} max_y={}",
        ext.min_x.1, ext.max_x.1, ext.min_y.1, ext.max_y.1
    );
}
