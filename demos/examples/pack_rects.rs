// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle packing demo.
//!
//! Pack sixty rectangles of mixed sizes into a 500 x 350 target, shrinking
//! spacing until they fit, and print the arrangement as an SVG document on
//! stdout.
//!
//! Run:
//! - `cargo run -p canopy_demos --example pack_rects > rects.svg`

use canopy_pack::{PackMode, PackShape, PackedLayout, SortMode};
use kurbo::Size;

fn main() {
    let sizes: Vec<Size> = (0..60)
        .map(|i| {
            let w = 20.0 + f64::from(i % 8) * 9.0;
            let h = 14.0 + f64::from(i % 5) * 11.0;
            Size::new(w, h)
        })
        .collect();

    let mut layout = PackedLayout::new();
    layout
        .set_shape(PackShape::Rectangular)
        .set_mode(PackMode::Fit)
        .set_size(Size::new(500.0, 350.0))
        .set_sort_mode(SortMode::Area)
        .set_spacing(3.0);
    let arr = layout.arrange(&sizes);

    eprintln!(
        "packed {} rects into {:.1} x {:.1} with spacing {:.2}",
        arr.placements().len(),
        arr.actual_bounds.width(),
        arr.actual_bounds.height(),
        arr.actual_spacing
    );

    let b = arr.actual_bounds;
    println!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
        b.x0 - 2.0,
        b.y0 - 2.0,
        b.width() + 4.0,
        b.height() + 4.0
    );
    for p in arr.placements() {
        let r = p.rect;
        println!(
            r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="hsl({}, 55%, 75%)" stroke="black"/>"#,
            r.x0,
            r.y0,
            r.width(),
            r.height(),
            (p.index * 31) % 360
        );
    }
    println!("</svg>");
}
