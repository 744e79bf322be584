// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circle packing demo.
//!
//! Pack fifty circles of mixed sizes and print the arrangement as an SVG
//! document on stdout.
//!
//! Run:
//! - `cargo run -p canopy_demos --example pack_circles > circles.svg`

use canopy_pack::{PackedLayout, SortMode};
use kurbo::Size;

fn main() {
    let sizes: Vec<Size> = (0..50)
        .map(|i| {
            let d = 10.0 + f64::from(i % 7) * 6.0;
            Size::new(d, d)
        })
        .collect();

    let mut layout = PackedLayout::new();
    layout
        .set_has_circular_nodes(true)
        .set_sort_mode(SortMode::MaxSide)
        .set_spacing(2.0);
    let arr = layout.arrange(&sizes);

    let mut b = arr.actual_bounds;
    if let Some(e) = arr.enclosing_circle() {
        // The enclosure circumscribes the items, so widen the view to it.
        b = b.union(kurbo::Rect::from_center_size(
            e.center,
            Size::new(e.radius * 2.0, e.radius * 2.0),
        ));
    }
    println!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
        b.x0 - 2.0,
        b.y0 - 2.0,
        b.width() + 4.0,
        b.height() + 4.0
    );
    for p in arr.placements() {
        let c = p.rect.center();
        let r = p.rect.width().max(p.rect.height()) / 2.0;
        println!(
            r#"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="hsl({}, 60%, 70%)" stroke="black"/>"#,
            c.x,
            c.y,
            r,
            (p.index * 47) % 360
        );
    }
    if let Some(e) = arr.enclosing_circle() {
        println!(
            r#"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="none" stroke="red" stroke-dasharray="4 4"/>"#,
            e.center.x, e.center.y, e.radius
        );
    }
    println!("</svg>");
}
